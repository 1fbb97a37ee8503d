use std::fmt;
use std::sync::Arc;

use crate::error::EngineError;
use crate::value::Value;

/// Represents the supported data types in a table schema.
/// These types define the structure of columns and the expected format of
/// literals in the command stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// A boolean value (`true` or `false`).
    Bool,
    /// A 64-bit signed integer.
    Int,
    /// A 64-bit floating-point number.
    Double,
    /// A whitespace-free character string.
    Str,
}

impl DataType {
    /// Resolves a column type keyword (`string`, `bool`, `int`, `double`).
    pub fn from_keyword(token: &str) -> Result<Self, EngineError> {
        match token {
            "string" => Ok(Self::Str),
            "bool" => Ok(Self::Bool),
            "int" => Ok(Self::Int),
            "double" => Ok(Self::Double),
            _ => Err(EngineError::InvalidLiteral {
                expected: "column type",
                token: token.to_string(),
            }),
        }
    }

    /// Parses a literal token into a [Value] of this type.
    ///
    /// # Example
    /// ```
    /// use rowql::{DataType, Value};
    /// assert_eq!(DataType::Int.parse_literal("42").unwrap(), Value::Int(42));
    /// assert_eq!(DataType::Bool.parse_literal("true").unwrap(), Value::Bool(true));
    /// ```
    pub fn parse_literal(self, token: &str) -> Result<Value, EngineError> {
        match self {
            Self::Bool => match token {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(EngineError::InvalidLiteral {
                    expected: "bool",
                    token: token.to_string(),
                }),
            },
            Self::Int => token
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| EngineError::InvalidLiteral {
                    expected: "int",
                    token: token.to_string(),
                }),
            Self::Double => token
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|_| EngineError::InvalidLiteral {
                    expected: "double",
                    token: token.to_string(),
                }),
            Self::Str => Ok(Value::Str(Arc::from(token))),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Double => write!(f, "double"),
            Self::Str => write!(f, "string"),
        }
    }
}
