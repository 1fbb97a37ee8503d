use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::data_type::DataType;

/// Represents a single cell value stored in the engine.
///
/// This enum wraps all supported cell types into a single type that can be
/// passed around the engine and used as an index key. Columns are
/// homogeneous, so values are only ever meaningfully compared against values
/// of the same variant.
#[derive(Debug, Clone)]
pub enum Value {
    /// A boolean value (`false` orders before `true`).
    Bool(bool),
    /// A 64-bit signed integer value.
    Int(i64),
    /// A 64-bit floating-point value.
    Double(f64),
    /// A whitespace-free string value, wrapped in an [Arc] for cheap cloning
    /// between the row store and index buckets.
    Str(Arc<str>),
}

impl Value {
    /// Returns the inner boolean value if this is a [Value::Bool].
    /// Otherwise, returns `None`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the inner integer value if this is a [Value::Int].
    /// Otherwise, returns `None`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the inner double value if this is a [Value::Double].
    /// Otherwise, returns `None`.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns a reference to the inner string slice if this is a [Value::Str].
    /// Otherwise, returns `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the logical [DataType] corresponding to this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Bool(_) => DataType::Bool,
            Self::Int(_) => DataType::Int,
            Self::Double(_) => DataType::Double,
            Self::Str(_) => DataType::Str,
        }
    }

    /// Rank used to keep the ordering total across variants. Columns are
    /// homogeneous, so two values of different variants never meet through a
    /// legitimate query path.
    fn tag_rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Int(_) => 1,
            Self::Double(_) => 2,
            Self::Str(_) => 3,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            // total_cmp so the ordering agrees with the bit-pattern Hash/Eq
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            _ => self.tag_rank().cmp(&other.tag_rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag_rank().hash(state);
        match self {
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Double(f) => f.to_bits().hash(state),
            Self::Str(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Double(d) => write!(f, "{}", d),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────
    // Test 1 : accessors
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Double(3.14).as_double(), Some(3.14));
        assert_eq!(Value::Str("hi".into()).as_str(), Some("hi"));

        assert_eq!(Value::Int(1).as_bool(), None);
        assert_eq!(Value::Str("42".into()).as_int(), None);
        assert_eq!(Value::Int(1).as_double(), None);
        assert_eq!(Value::Bool(true).as_str(), None);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 2 : data_type
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_data_type() {
        assert_eq!(Value::Bool(false).data_type(), DataType::Bool);
        assert_eq!(Value::Int(1).data_type(), DataType::Int);
        assert_eq!(Value::Double(1.0).data_type(), DataType::Double);
        assert_eq!(Value::Str("x".into()).data_type(), DataType::Str);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 3 : ordering within one variant
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_same_tag_ordering() {
        assert!(Value::Bool(false) < Value::Bool(true));
        assert!(Value::Int(-3) < Value::Int(12));
        assert!(Value::Double(1.5) < Value::Double(2.0));
        assert!(Value::Str("alice".into()) < Value::Str("bob".into()));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 4 : equality
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_value_equality() {
        assert_eq!(Value::Int(10), Value::Int(10));
        assert_ne!(Value::Int(10), Value::Int(20));
        assert_eq!(Value::Double(1.5), Value::Double(1.5));
        assert_eq!(Value::Str("abc".into()), Value::Str("abc".into()));
        assert_ne!(Value::Bool(true), Value::Bool(false));
        assert_ne!(Value::Int(1), Value::Double(1.0));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 5 : Hash agrees with Eq (usable as a map key)
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_hash_map_key() {
        use std::collections::HashMap;

        let mut map: HashMap<Value, usize> = HashMap::new();
        map.insert(Value::Double(2.5), 1);
        map.insert(Value::Str("alice".into()), 2);

        assert_eq!(map.get(&Value::Double(2.5)), Some(&1));
        assert_eq!(map.get(&Value::Str("alice".into())), Some(&2));
        assert_eq!(map.get(&Value::Double(2.6)), None);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 6 : Display
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_display() {
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Int(-7).to_string(), "-7");
        assert_eq!(Value::Double(2.5).to_string(), "2.5");
        assert_eq!(Value::Str("alice".into()).to_string(), "alice");
    }

    // ─────────────────────────────────────────────────────────────
    // Test 7 : clone
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_clone() {
        let v1 = Value::Str("hello".into());
        let v2 = v1.clone();

        assert_eq!(v1, v2);
    }
}
