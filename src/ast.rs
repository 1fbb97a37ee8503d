use std::cmp::Ordering;
use std::fmt;

use crate::index::IndexKind;
use crate::table::ColumnDef;
use crate::value::Value;

/// A fully parsed command, ready for execution.
#[derive(Debug, PartialEq)]
pub enum Command {
    Create {
        table: String,
        columns: Vec<ColumnDef>,
    },
    Insert {
        table: String,
        rows: Vec<Vec<Value>>,
    },
    Remove {
        table: String,
    },
    Print {
        table: String,
        columns: Vec<String>,
        /// `None` is the ALL form; `Some` carries the WHERE predicate.
        filter: Option<Predicate>,
    },
    Delete {
        table: String,
        predicate: Predicate,
    },
    Join {
        left: String,
        right: String,
        left_column: String,
        right_column: String,
        projections: Vec<(JoinSide, String)>,
    },
    Generate {
        table: String,
        kind: IndexKind,
        column: String,
    },
    /// A `#` comment line; no effect.
    Comment,
    Quit,
}

/// A single-column comparison against a typed literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub op: ComparisonOp,
    pub value: Value,
}

/// The closed set of comparison operators.
///
/// One evaluation function instead of per-operator predicate objects; the
/// caller guarantees both operands carry the same tag (columns are typed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Less,
    Equal,
    Greater,
}

impl ComparisonOp {
    /// Resolves an operator token (`<`, `=`, `>`).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" => Some(Self::Less),
            "=" => Some(Self::Equal),
            ">" => Some(Self::Greater),
            _ => None,
        }
    }

    /// Evaluates `lhs <op> rhs`.
    pub fn compare(self, lhs: &Value, rhs: &Value) -> bool {
        match self {
            Self::Less => lhs.cmp(rhs) == Ordering::Less,
            Self::Equal => lhs == rhs,
            Self::Greater => lhs.cmp(rhs) == Ordering::Greater,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Less => write!(f, "<"),
            Self::Equal => write!(f, "="),
            Self::Greater => write!(f, ">"),
        }
    }
}

/// Which side of a join a projected column is read from (`1` or `2` in the
/// command grammar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSide {
    Left,
    Right,
}
