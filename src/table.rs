use tracing::debug;

use crate::ast::ComparisonOp;
use crate::data_type::DataType;
use crate::error::{EngineError, Result};
use crate::index::{IndexKind, TableIndex};
use crate::value::Value;

/// Column definition in the schema
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

#[derive(Debug, Clone)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    /// Ordinal position of a column, fixed at creation.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == column)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// The outcome of a selection: how many rows matched, and (unless the caller
/// suppressed row output) which ones, in emission order.
#[derive(Debug)]
pub struct Selection {
    pub matched: usize,
    pub row_ids: Vec<usize>,
}

/// A named table: schema, row store, and at most one secondary index.
///
/// A row's id is its current position in the row store. Ids are reassigned
/// by compaction whenever a delete removes earlier rows, which is why any
/// delete that removed rows forces a full index rebuild.
pub struct Table {
    pub name: String,
    pub schema: Schema,
    rows: Vec<Vec<Value>>,
    index: TableIndex,
}

impl Table {
    pub fn new(name: String, schema: Schema) -> Self {
        Self {
            name,
            schema,
            rows: Vec::new(),
            index: TableIndex::None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn index(&self) -> &TableIndex {
        &self.index
    }

    /// Resolves a column name to its ordinal.
    ///
    /// # Errors
    /// Returns [EngineError::ColumnNotFound] naming this table.
    pub fn col_position(&self, column: &str) -> Result<usize> {
        self.schema
            .position(column)
            .ok_or_else(|| EngineError::ColumnNotFound {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Appends a batch of rows, assigning each the next row id in order, and
    /// extends the active index incrementally. Returns the id of the first
    /// appended row.
    ///
    /// Rows must already satisfy the schema (the parser types every literal
    /// from the declared column type).
    pub fn append_rows(&mut self, rows: Vec<Vec<Value>>) -> usize {
        let start = self.rows.len();
        self.rows.reserve(rows.len());
        for row in rows {
            debug_assert_eq!(row.len(), self.schema.column_count());
            debug_assert!(
                row.iter()
                    .zip(&self.schema.columns)
                    .all(|(v, c)| v.data_type() == c.data_type)
            );
            let id = self.rows.len();
            if let Some(col) = self.index.column() {
                self.index.insert(&row[col], id);
            }
            self.rows.push(row);
        }
        start
    }

    /// Evaluates `column <op> value` over the table.
    ///
    /// With an index keyed on the target column, the operator is tested once
    /// per distinct key and whole buckets are counted on a match; otherwise
    /// the row store is scanned in row-id order. With `collect_rows == false`
    /// only the count is computed.
    pub fn select(
        &self,
        column: &str,
        op: ComparisonOp,
        value: &Value,
        collect_rows: bool,
    ) -> Result<Selection> {
        let col = self.col_position(column)?;
        let mut matched = 0;
        let mut row_ids = Vec::new();

        if self.index.column() == Some(col) {
            self.index.matching_buckets(op, value, |bucket| {
                matched += bucket.len();
                if collect_rows {
                    row_ids.extend_from_slice(bucket);
                }
            });
        } else {
            for (id, row) in self.rows.iter().enumerate() {
                if op.compare(&row[col], value) {
                    matched += 1;
                    if collect_rows {
                        row_ids.push(id);
                    }
                }
            }
        }

        Ok(Selection { matched, row_ids })
    }

    /// The ALL form of a selection: every row, in row-id order.
    pub fn select_all(&self, collect_rows: bool) -> Selection {
        Selection {
            matched: self.rows.len(),
            row_ids: if collect_rows {
                (0..self.rows.len()).collect()
            } else {
                Vec::new()
            },
        }
    }

    /// Removes every row satisfying `column <op> value`, compacting the row
    /// store in place (surviving rows keep their relative order and shift
    /// down to fill gaps). Returns the number of rows removed.
    ///
    /// Compaction reassigns row ids, so a delete that removed anything
    /// rebuilds the active index from scratch; a delete that matched nothing
    /// leaves it untouched.
    pub fn delete_where(&mut self, column: &str, op: ComparisonOp, value: &Value) -> Result<usize> {
        let col = self.col_position(column)?;
        let before = self.rows.len();
        self.rows.retain(|row| !op.compare(&row[col], value));
        let removed = before - self.rows.len();
        if removed > 0 {
            self.rebuild_index();
        }
        Ok(removed)
    }

    /// The generate-index entry point.
    ///
    /// Requesting the representation already active on the same column is a
    /// no-op; any other request replaces whatever existed with a fresh build
    /// over the current rows. A table never holds both representations.
    pub fn generate_index(&mut self, kind: IndexKind, column: &str) -> Result<()> {
        let col = self.col_position(column)?;
        if self.index.kind() == Some(kind) && self.index.column() == Some(col) {
            return Ok(());
        }
        debug!(table = %self.name, %kind, column, "building index");
        self.index = TableIndex::build(kind, col, &self.rows);
        Ok(())
    }

    fn rebuild_index(&mut self) {
        if let (Some(kind), Some(col)) = (self.index.kind(), self.index.column()) {
            debug!(table = %self.name, %kind, "rebuilding index after delete");
            self.index = TableIndex::build(kind, col, &self.rows);
        }
    }
}
