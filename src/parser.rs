use std::io::BufRead;

use crate::ast::{Command, ComparisonOp, JoinSide, Predicate};
use crate::data_type::DataType;
use crate::database::Database;
use crate::error::{EngineError, Result};
use crate::index::IndexKind;
use crate::table::{ColumnDef, Table};
use crate::tokenizer::Tokenizer;

/// Turns the token stream into one [Command] per call.
///
/// The parser is schema-aware: row literals and WHERE literals are typed
/// from the target column's declared type, so table and column lookups
/// happen here, at the same token positions the command language defines.
/// Filler keywords (`INTO`, `FROM`, `WHERE`, ...) are consumed positionally
/// without validation.
pub struct Parser<'a, R> {
    tokens: &'a mut Tokenizer<R>,
}

impl<'a, R: BufRead> Parser<'a, R> {
    pub fn new(tokens: &'a mut Tokenizer<R>) -> Self {
        Self { tokens }
    }

    /// Parses the next command, or `Ok(None)` at end of input.
    ///
    /// On a user error (unknown table/column, malformed literal) the command
    /// is abandoned; the caller discards the rest of its line. The one
    /// exception is an insert into an unknown table, where the parser itself
    /// steps over the announced row block.
    pub fn parse(&mut self, db: &Database) -> Result<Option<Command>> {
        let Some(keyword) = self.tokens.next_token()? else {
            return Ok(None);
        };

        if keyword.starts_with('#') {
            self.tokens.discard_line();
            return Ok(Some(Command::Comment));
        }

        let command = match keyword.to_ascii_lowercase().as_str() {
            "create" => self.parse_create()?,
            "insert" => self.parse_insert(db)?,
            "remove" => Command::Remove {
                table: self.expect()?,
            },
            "print" => self.parse_print(db)?,
            "delete" => self.parse_delete(db)?,
            "join" => self.parse_join(db)?,
            "generate" => self.parse_generate(db)?,
            "quit" => Command::Quit,
            _ => return Err(EngineError::UnrecognizedCommand),
        };
        Ok(Some(command))
    }

    // --- token helpers ---

    fn expect(&mut self) -> Result<String> {
        self.tokens
            .next_token()?
            .ok_or(EngineError::UnexpectedEof)
    }

    /// Consumes a positional keyword without checking it, the way the
    /// command language treats `INTO`, `FROM`, `WHERE` and friends.
    fn skip_keyword(&mut self) -> Result<()> {
        self.expect().map(|_| ())
    }

    fn expect_count(&mut self) -> Result<usize> {
        let token = self.expect()?;
        token.parse().map_err(|_| EngineError::InvalidLiteral {
            expected: "count",
            token,
        })
    }

    fn expect_op(&mut self) -> Result<ComparisonOp> {
        let token = self.expect()?;
        ComparisonOp::from_token(&token).ok_or(EngineError::InvalidLiteral {
            expected: "comparison operator",
            token,
        })
    }

    // --- command grammars ---

    /// `create <name> <N> <type>×N <colName>×N`
    fn parse_create(&mut self) -> Result<Command> {
        let table = self.expect()?;
        let n = self.expect_count()?;

        let mut types = Vec::with_capacity(n);
        for _ in 0..n {
            types.push(DataType::from_keyword(&self.expect()?)?);
        }
        let mut columns = Vec::with_capacity(n);
        for data_type in types {
            columns.push(ColumnDef {
                name: self.expect()?,
                data_type,
            });
        }
        Ok(Command::Create { table, columns })
    }

    /// `insert INTO <name> <N> ROWS <row>×N`
    fn parse_insert(&mut self, db: &Database) -> Result<Command> {
        self.skip_keyword()?; // INTO
        let table = self.expect()?;
        let n = self.expect_count()?;
        self.skip_keyword()?; // ROWS

        let Ok(target) = db.table(&table) else {
            // The announced row block still has to be consumed so the loop
            // resumes at the next command.
            self.tokens.skip_lines(n)?;
            return Err(EngineError::TableNotFound(table));
        };
        let types: Vec<DataType> = target
            .schema
            .columns
            .iter()
            .map(|c| c.data_type)
            .collect();

        let mut rows = Vec::with_capacity(n);
        for _ in 0..n {
            let mut row = Vec::with_capacity(types.len());
            for data_type in &types {
                row.push(data_type.parse_literal(&self.expect()?)?);
            }
            rows.push(row);
        }
        Ok(Command::Insert { table, rows })
    }

    /// `print FROM <name> <N> <colName>×N (ALL | WHERE <col> <op> <value>)`
    fn parse_print(&mut self, db: &Database) -> Result<Command> {
        self.skip_keyword()?; // FROM
        let table = self.expect()?;
        let target = db.table(&table)?;

        let n = self.expect_count()?;
        let mut columns = Vec::with_capacity(n);
        for _ in 0..n {
            let column = self.expect()?;
            target.col_position(&column)?;
            columns.push(column);
        }

        // Anything other than ALL is the WHERE form.
        let filter = if self.expect()? == "ALL" {
            None
        } else {
            Some(self.parse_predicate(target)?)
        };

        Ok(Command::Print {
            table,
            columns,
            filter,
        })
    }

    /// `delete FROM <name> WHERE <col> <op> <value>`
    fn parse_delete(&mut self, db: &Database) -> Result<Command> {
        self.skip_keyword()?; // FROM
        let table = self.expect()?;
        let target = db.table(&table)?;
        self.skip_keyword()?; // WHERE
        let predicate = self.parse_predicate(target)?;
        Ok(Command::Delete { table, predicate })
    }

    /// `<col> <op> <value>`, the literal typed from the column.
    fn parse_predicate(&mut self, table: &Table) -> Result<Predicate> {
        let column = self.expect()?;
        let ordinal = table.col_position(&column)?;
        let data_type = table.schema.columns[ordinal].data_type;
        let op = self.expect_op()?;
        let value = data_type.parse_literal(&self.expect()?)?;
        Ok(Predicate { column, op, value })
    }

    /// `join <t1> AND <t2> WHERE <c1> = <c2> PRINT <N> (<col> <1|2>)×N`
    fn parse_join(&mut self, db: &Database) -> Result<Command> {
        let left = self.expect()?;
        let left_table = db.table(&left)?;
        self.skip_keyword()?; // AND
        let right = self.expect()?;
        let right_table = db.table(&right)?;

        self.skip_keyword()?; // WHERE
        let left_column = self.expect()?;
        left_table.col_position(&left_column)?;
        self.skip_keyword()?; // =
        let right_column = self.expect()?;
        right_table.col_position(&right_column)?;

        self.skip_keyword()?; // PRINT
        let n = self.expect_count()?;
        let mut projections = Vec::with_capacity(n);
        for _ in 0..n {
            let column = self.expect()?;
            let side = if self.expect()? == "1" {
                JoinSide::Left
            } else {
                JoinSide::Right
            };
            match side {
                JoinSide::Left => left_table.col_position(&column)?,
                JoinSide::Right => right_table.col_position(&column)?,
            };
            projections.push((side, column));
        }

        Ok(Command::Join {
            left,
            right,
            left_column,
            right_column,
            projections,
        })
    }

    /// `generate FOR <name> (hash|<other>) INDEX ON <col>`
    fn parse_generate(&mut self, db: &Database) -> Result<Command> {
        self.skip_keyword()?; // FOR
        let table = self.expect()?;
        let target = db.table(&table)?;
        let kind = IndexKind::from_keyword(&self.expect()?);
        self.skip_keyword()?; // INDEX
        self.skip_keyword()?; // ON
        let column = self.expect()?;
        target.col_position(&column)?;
        Ok(Command::Generate {
            table,
            kind,
            column,
        })
    }
}
