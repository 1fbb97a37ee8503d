use thiserror::Error;

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;

/// The error type for every command the engine can refuse.
///
/// All variants except [EngineError::Io] are non-fatal: the command loop
/// reports them, discards the rest of the offending command, and keeps
/// accepting input. No failed command mutates table or index state.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A create command named a table that is already present.
    #[error("Cannot create already existing table {0}")]
    TableExists(String),

    /// A command referenced a table that does not exist.
    #[error("{0} does not name a table in the database")]
    TableNotFound(String),

    /// A command referenced a column unknown to the target table.
    #[error("{column} does not name a column in {table}")]
    ColumnNotFound {
        /// Table the lookup ran against.
        table: String,
        /// The unknown column name.
        column: String,
    },

    /// The leading keyword of a command was not recognized.
    #[error("unrecognized command")]
    UnrecognizedCommand,

    /// A literal token could not be parsed as the expected type.
    #[error("expected {expected} literal, found {token:?}")]
    InvalidLiteral {
        /// What the grammar called for at this position.
        expected: &'static str,
        /// The offending token.
        token: String,
    },

    /// The input ended in the middle of a command.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Failure reading the command stream. Fatal.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
