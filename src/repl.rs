use std::io::{BufRead, Write};

use tracing::debug;

use crate::ast::{Command, JoinSide, Predicate};
use crate::database::Database;
use crate::error::{EngineError, Result};
use crate::parser::Parser;
use crate::table::{ColumnDef, Schema};
use crate::tokenizer::Tokenizer;
use crate::value::Value;

/// The interactive command loop: prompt, parse, execute, report.
///
/// Generic over the input and output streams so the whole loop can be driven
/// from an in-memory script in tests. Every command's status line goes to
/// `out`; in quiet mode the row output of print and join is suppressed while
/// the status lines (and their counts) stay exact.
pub struct Repl<R, W> {
    db: Database,
    tokens: Tokenizer<R>,
    out: W,
    quiet: bool,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(input: R, out: W, quiet: bool) -> Self {
        Self {
            db: Database::new(),
            tokens: Tokenizer::new(input),
            out,
            quiet,
        }
    }

    /// Runs the loop until quit or end of input.
    ///
    /// User errors are reported and the rest of the offending line is
    /// discarded; only I/O failure on the streams ends the loop early.
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.out, "% ")?;
            self.out.flush()?;

            let command = match Parser::new(&mut self.tokens).parse(&self.db) {
                Ok(Some(command)) => command,
                Ok(None) => return Ok(()),
                Err(EngineError::Io(e)) => return Err(e.into()),
                Err(e) => {
                    self.report(e)?;
                    continue;
                }
            };

            match command {
                Command::Quit => {
                    writeln!(self.out, "Thanks for querying!")?;
                    return Ok(());
                }
                Command::Comment => continue,
                command => match self.execute(command) {
                    Ok(()) => {}
                    Err(EngineError::Io(e)) => return Err(e.into()),
                    Err(e) => self.report(e)?,
                },
            }
        }
    }

    fn report(&mut self, error: EngineError) -> Result<()> {
        debug!(%error, "command failed");
        writeln!(self.out, "Error: {error}")?;
        self.tokens.discard_line();
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Create { table, columns } => self.create(table, columns),
            Command::Insert { table, rows } => self.insert(table, rows),
            Command::Remove { table } => {
                self.db.drop_table(&table)?;
                writeln!(self.out, "Table {table} deleted")?;
                Ok(())
            }
            Command::Print {
                table,
                columns,
                filter,
            } => self.print(table, columns, filter),
            Command::Delete { table, predicate } => {
                let removed = self.db.delete_rows(&table, &predicate)?;
                writeln!(self.out, "Deleted {removed} rows from {table}")?;
                Ok(())
            }
            Command::Join {
                left,
                right,
                left_column,
                right_column,
                projections,
            } => self.join(left, right, left_column, right_column, projections),
            Command::Generate {
                table,
                kind,
                column,
            } => {
                self.db.generate_index(&table, kind, &column)?;
                writeln!(
                    self.out,
                    "Created {kind} index for table {table} on column {column}"
                )?;
                Ok(())
            }
            Command::Comment | Command::Quit => Ok(()),
        }
    }

    fn create(&mut self, table: String, columns: Vec<ColumnDef>) -> Result<()> {
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        let names = names.join(" ");
        self.db.create_table(table.clone(), Schema { columns })?;
        writeln!(self.out, "New table {table} with column(s) {names} created")?;
        Ok(())
    }

    fn insert(&mut self, table: String, rows: Vec<Vec<Value>>) -> Result<()> {
        let n = rows.len();
        let start = self.db.insert_rows(&table, rows)?;
        // An empty batch reports an end position one before its start.
        let end = start as i64 + n as i64 - 1;
        writeln!(
            self.out,
            "Added {n} rows to {table} from position {start} to {end}"
        )?;
        Ok(())
    }

    fn print(
        &mut self,
        table: String,
        columns: Vec<String>,
        filter: Option<Predicate>,
    ) -> Result<()> {
        let result = self.db.select(&table, &columns, filter.as_ref(), !self.quiet)?;
        if !self.quiet {
            writeln!(self.out, "{}", result.columns.join(" "))?;
            for row in &result.rows {
                let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                writeln!(self.out, "{}", cells.join(" "))?;
            }
        }
        writeln!(
            self.out,
            "Printed {} matching rows from {table}",
            result.matched
        )?;
        Ok(())
    }

    fn join(
        &mut self,
        left: String,
        right: String,
        left_column: String,
        right_column: String,
        projections: Vec<(JoinSide, String)>,
    ) -> Result<()> {
        let result = self.db.join(
            &left,
            &right,
            &left_column,
            &right_column,
            &projections,
            !self.quiet,
        )?;
        if !self.quiet {
            writeln!(self.out, "{}", result.columns.join(" "))?;
            for row in &result.rows {
                let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                writeln!(self.out, "{}", cells.join(" "))?;
            }
        }
        writeln!(
            self.out,
            "Printed {} rows from joining {left} to {right}",
            result.matched
        )?;
        Ok(())
    }
}
