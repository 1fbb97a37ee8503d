//! An in-memory, single-user tabular engine driven by a line-oriented
//! command language.
//!
//! Tables hold typed rows addressed by position; each table may carry at
//! most one secondary index (hash or ordered) to accelerate equality and
//! range selections and joins. The [repl::Repl] loop reads commands, the
//! [parser::Parser] types every literal from the target schema, and the
//! [database::Database] executes them.

pub mod ast;
pub mod data_type;
pub mod database;
pub mod error;
pub mod index;
pub mod parser;
pub mod repl;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use ast::{Command, ComparisonOp, JoinSide, Predicate};
pub use data_type::DataType;
pub use database::{Database, JoinResult, QueryResult};
pub use error::{EngineError, Result};
pub use index::{IndexKind, TableIndex};
pub use repl::Repl;
pub use table::{ColumnDef, Schema, Table};
pub use value::Value;
