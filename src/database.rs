use std::collections::HashMap;

use tracing::debug;

use crate::ast::{JoinSide, Predicate};
use crate::error::{EngineError, Result};
use crate::index::IndexKind;
use crate::table::{Schema, Selection, Table};
use crate::value::Value;

/// The main entry point for the in-memory engine.
/// It owns the name→table registry and orchestrates queries that span
/// tables. No ambient state: independent instances are fully isolated.
#[derive(Default)]
pub struct Database {
    tables: HashMap<String, Table>,
}

/// The result of a selection: projected column names, the projected rows
/// (empty when row output was suppressed), and the match count.
#[derive(Debug)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub matched: usize,
}

/// The result of a join, shaped like [QueryResult]; `matched` counts row
/// pairs whether or not rows were collected.
#[derive(Debug)]
pub struct JoinResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub matched: usize,
}

impl Database {
    /// Creates a new, empty engine instance.
    pub fn new() -> Self {
        Self {
            tables: HashMap::default(),
        }
    }

    /// Creates a new table.
    ///
    /// # Errors
    /// Returns [EngineError::TableExists] if the name is already taken.
    ///
    /// # Example
    /// ```
    /// use rowql::{ColumnDef, DataType, Database, Schema};
    /// let mut db = Database::new();
    /// let schema = Schema {
    ///     columns: vec![ColumnDef { name: "id".into(), data_type: DataType::Int }],
    /// };
    /// db.create_table("users".into(), schema).unwrap();
    /// assert!(db.get_table("users").is_some());
    /// ```
    pub fn create_table(&mut self, name: String, schema: Schema) -> Result<()> {
        if self.tables.contains_key(&name) {
            return Err(EngineError::TableExists(name));
        }
        let table = Table::new(name.clone(), schema);
        self.tables.insert(name, table);
        Ok(())
    }

    /// Removes a table and its index.
    ///
    /// # Errors
    /// Returns [EngineError::TableNotFound] if the table does not exist.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        match self.tables.remove(name) {
            Some(_) => Ok(()),
            None => Err(EngineError::TableNotFound(name.to_string())),
        }
    }

    /// Retrieves a reference to a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Returns a list of all table names currently stored.
    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.keys().map(|k| k.as_str()).collect()
    }

    /// Like [Database::get_table] but failing with [EngineError::TableNotFound].
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| EngineError::TableNotFound(name.to_string()))
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| EngineError::TableNotFound(name.to_string()))
    }

    /// Appends a batch of typed rows, returning the id of the first one.
    /// Either the whole batch is appended or (table unknown) none of it.
    pub fn insert_rows(&mut self, name: &str, rows: Vec<Vec<Value>>) -> Result<usize> {
        Ok(self.table_mut(name)?.append_rows(rows))
    }

    /// Evaluates a selection against one table and projects the requested
    /// columns. `filter == None` selects every row. With
    /// `collect_rows == false` only the count is produced.
    pub fn select(
        &self,
        table: &str,
        columns: &[String],
        filter: Option<&Predicate>,
        collect_rows: bool,
    ) -> Result<QueryResult> {
        let table = self.table(table)?;
        let ordinals = columns
            .iter()
            .map(|c| table.col_position(c))
            .collect::<Result<Vec<_>>>()?;

        let Selection { matched, row_ids } = match filter {
            Some(p) => table.select(&p.column, p.op, &p.value, collect_rows)?,
            None => table.select_all(collect_rows),
        };

        let rows = row_ids
            .iter()
            .map(|&id| {
                let row = &table.rows()[id];
                ordinals.iter().map(|&c| row[c].clone()).collect()
            })
            .collect();

        Ok(QueryResult {
            columns: columns.to_vec(),
            rows,
            matched,
        })
    }

    /// Removes every row of `table` matching the predicate. Returns the
    /// number of rows removed; the table's index is rebuilt by the deletion
    /// path whenever that count is nonzero.
    pub fn delete_rows(&mut self, table: &str, predicate: &Predicate) -> Result<usize> {
        let table = self.table_mut(table)?;
        let removed = table.delete_where(&predicate.column, predicate.op, &predicate.value)?;
        debug!(table = %table.name, removed, "delete finished");
        Ok(removed)
    }

    /// Generates (or replaces) the index of `table`; see
    /// [Table::generate_index] for the replacement policy.
    pub fn generate_index(&mut self, table: &str, kind: IndexKind, column: &str) -> Result<()> {
        self.table_mut(table)?.generate_index(kind, column)
    }

    /// Equality join: every pair of rows where the left row's `left_column`
    /// value equals the right row's `right_column` value, emitted left-major
    /// and in right-bucket order within one left row.
    ///
    /// If the right table already carries a hash index on the join column it
    /// is probed in place; otherwise a temporary hash mapping is built for
    /// the duration of the join. Both produce the same rows as the
    /// nested-loop baseline ([Database::join_nested_loop]).
    pub fn join(
        &self,
        left: &str,
        right: &str,
        left_column: &str,
        right_column: &str,
        projections: &[(JoinSide, String)],
        collect_rows: bool,
    ) -> Result<JoinResult> {
        let (left, right, left_col, right_col, ordinals) =
            self.resolve_join(left, right, left_column, right_column, projections)?;

        let (matched, rows) = if let Some(map) = right.index().hash_buckets_on(right_col) {
            debug!(left = %left.name, right = %right.name, "join probing existing hash index");
            probe_join(left, right, left_col, |v| map.get(v), &ordinals, collect_rows)
        } else {
            debug!(left = %left.name, right = %right.name, "join building temporary hash");
            let mut temp: HashMap<&Value, Vec<usize>> = HashMap::new();
            for (id, row) in right.rows().iter().enumerate() {
                temp.entry(&row[right_col]).or_default().push(id);
            }
            probe_join(left, right, left_col, |v| temp.get(v), &ordinals, collect_rows)
        };

        Ok(JoinResult {
            columns: projections.iter().map(|(_, c)| c.clone()).collect(),
            rows,
            matched,
        })
    }

    /// The O(|left|·|right|) join baseline: compare every row pair directly.
    /// Same output as [Database::join]; kept as the semantic reference and
    /// for measurement.
    pub fn join_nested_loop(
        &self,
        left: &str,
        right: &str,
        left_column: &str,
        right_column: &str,
        projections: &[(JoinSide, String)],
        collect_rows: bool,
    ) -> Result<JoinResult> {
        let (left, right, left_col, right_col, ordinals) =
            self.resolve_join(left, right, left_column, right_column, projections)?;

        let mut matched = 0;
        let mut rows = Vec::new();
        for lrow in left.rows() {
            for rrow in right.rows() {
                if lrow[left_col] == rrow[right_col] {
                    matched += 1;
                    if collect_rows {
                        rows.push(project_pair(lrow, rrow, &ordinals));
                    }
                }
            }
        }

        Ok(JoinResult {
            columns: projections.iter().map(|(_, c)| c.clone()).collect(),
            rows,
            matched,
        })
    }

    fn resolve_join<'a>(
        &'a self,
        left: &str,
        right: &str,
        left_column: &str,
        right_column: &str,
        projections: &[(JoinSide, String)],
    ) -> Result<(&'a Table, &'a Table, usize, usize, Vec<(JoinSide, usize)>)> {
        let left = self.table(left)?;
        let right = self.table(right)?;
        let left_col = left.col_position(left_column)?;
        let right_col = right.col_position(right_column)?;
        let ordinals = projections
            .iter()
            .map(|(side, column)| {
                let ordinal = match side {
                    JoinSide::Left => left.col_position(column)?,
                    JoinSide::Right => right.col_position(column)?,
                };
                Ok((*side, ordinal))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok((left, right, left_col, right_col, ordinals))
    }
}

fn project_pair(lrow: &[Value], rrow: &[Value], ordinals: &[(JoinSide, usize)]) -> Vec<Value> {
    ordinals
        .iter()
        .map(|&(side, c)| match side {
            JoinSide::Left => lrow[c].clone(),
            JoinSide::Right => rrow[c].clone(),
        })
        .collect()
}

/// Shared probe loop for both the persistent-index and temporary-hash join
/// paths: left rows in row-id order, each matching right bucket in its
/// stored order.
fn probe_join<'m>(
    left: &Table,
    right: &Table,
    left_col: usize,
    lookup: impl Fn(&Value) -> Option<&'m Vec<usize>>,
    ordinals: &[(JoinSide, usize)],
    collect_rows: bool,
) -> (usize, Vec<Vec<Value>>) {
    let mut matched = 0;
    let mut rows = Vec::new();
    for lrow in left.rows() {
        if let Some(bucket) = lookup(&lrow[left_col]) {
            matched += bucket.len();
            if collect_rows {
                for &rid in bucket {
                    rows.push(project_pair(lrow, &right.rows()[rid], ordinals));
                }
            }
        }
    }
    (matched, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ComparisonOp;
    use crate::data_type::DataType;
    use crate::table::ColumnDef;

    fn simple_schema() -> Schema {
        Schema {
            columns: vec![
                ColumnDef {
                    name: "id".into(),
                    data_type: DataType::Int,
                },
                ColumnDef {
                    name: "name".into(),
                    data_type: DataType::Str,
                },
            ],
        }
    }

    fn int_schema(column: &str) -> Schema {
        Schema {
            columns: vec![ColumnDef {
                name: column.into(),
                data_type: DataType::Int,
            }],
        }
    }

    fn int_rows(values: &[i64]) -> Vec<Vec<Value>> {
        values.iter().map(|&v| vec![Value::Int(v)]).collect()
    }

    #[test]
    fn test_create_and_drop_table() {
        let mut db = Database::new();

        assert!(db.create_table("users".into(), simple_schema()).is_ok());
        assert!(db.get_table("users").is_some());

        assert!(db.drop_table("users").is_ok());
        assert!(db.get_table("users").is_none());
    }

    #[test]
    fn test_duplicate_table_error() {
        let mut db = Database::new();

        assert!(db.create_table("users".into(), simple_schema()).is_ok());
        let err = db.create_table("users".into(), simple_schema()).unwrap_err();

        assert!(matches!(err, EngineError::TableExists(name) if name == "users"));
    }

    #[test]
    fn test_drop_nonexistent_table() {
        let mut db = Database::new();

        let err = db.drop_table("unknown").unwrap_err();
        assert!(matches!(err, EngineError::TableNotFound(_)));
    }

    #[test]
    fn test_list_tables() {
        let mut db = Database::new();

        db.create_table("users".into(), simple_schema()).unwrap();
        db.create_table("posts".into(), simple_schema()).unwrap();

        let mut tables = db.list_tables();
        tables.sort_unstable();

        assert_eq!(tables, vec!["posts", "users"]);
    }

    #[test]
    fn test_insert_into_missing_table_appends_nothing() {
        let mut db = Database::new();
        let err = db.insert_rows("ghost", int_rows(&[1, 2])).unwrap_err();
        assert!(matches!(err, EngineError::TableNotFound(_)));
        assert!(db.list_tables().is_empty());
    }

    #[test]
    fn test_select_projection_and_filter() {
        let mut db = Database::new();
        db.create_table("users".into(), simple_schema()).unwrap();
        db.insert_rows(
            "users",
            vec![
                vec![Value::Int(1), Value::Str("alice".into())],
                vec![Value::Int(2), Value::Str("bob".into())],
                vec![Value::Int(3), Value::Str("carol".into())],
            ],
        )
        .unwrap();

        let filter = Predicate {
            column: "id".into(),
            op: ComparisonOp::Greater,
            value: Value::Int(1),
        };
        let result = db
            .select("users", &["name".into()], Some(&filter), true)
            .unwrap();

        assert_eq!(result.columns, vec!["name"]);
        assert_eq!(result.matched, 2);
        assert_eq!(result.rows[0], vec![Value::Str("bob".into())]);
        assert_eq!(result.rows[1], vec![Value::Str("carol".into())]);
    }

    #[test]
    fn test_select_all_suppressed_rows() {
        let mut db = Database::new();
        db.create_table("users".into(), simple_schema()).unwrap();
        db.insert_rows("users", vec![vec![Value::Int(1), Value::Str("a".into())]])
            .unwrap();

        let result = db.select("users", &["id".into()], None, false).unwrap();
        assert_eq!(result.matched, 1);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_select_unknown_column() {
        let mut db = Database::new();
        db.create_table("users".into(), simple_schema()).unwrap();

        let err = db
            .select("users", &["height".into()], None, true)
            .unwrap_err();
        assert!(
            matches!(err, EngineError::ColumnNotFound { table, column }
                if table == "users" && column == "height")
        );
    }

    #[test]
    fn test_delete_rows() {
        let mut db = Database::new();
        db.create_table("nums".into(), int_schema("n")).unwrap();
        db.insert_rows("nums", int_rows(&[10, 50, 100, 20])).unwrap();

        let removed = db
            .delete_rows(
                "nums",
                &Predicate {
                    column: "n".into(),
                    op: ComparisonOp::Greater,
                    value: Value::Int(40),
                },
            )
            .unwrap();

        assert_eq!(removed, 2);
        let result = db.select("nums", &["n".into()], None, true).unwrap();
        assert_eq!(
            result.rows,
            vec![vec![Value::Int(10)], vec![Value::Int(20)]]
        );
    }

    fn join_fixture() -> Database {
        let mut db = Database::new();
        db.create_table("a".into(), int_schema("id")).unwrap();
        db.create_table("b".into(), int_schema("id")).unwrap();
        db.insert_rows("a", int_rows(&[1, 2, 3])).unwrap();
        db.insert_rows("b", int_rows(&[2, 3, 4])).unwrap();
        db
    }

    #[test]
    fn test_join_two_tables() {
        let db = join_fixture();
        let result = db
            .join(
                "a",
                "b",
                "id",
                "id",
                &[(JoinSide::Left, "id".into())],
                true,
            )
            .unwrap();

        assert_eq!(result.matched, 2);
        assert_eq!(result.rows, vec![vec![Value::Int(2)], vec![Value::Int(3)]]);
    }

    #[test]
    fn test_join_same_result_with_prebuilt_index() {
        let mut db = join_fixture();
        db.generate_index("b", IndexKind::Hash, "id").unwrap();

        let result = db
            .join(
                "a",
                "b",
                "id",
                "id",
                &[(JoinSide::Left, "id".into())],
                true,
            )
            .unwrap();

        assert_eq!(result.matched, 2);
        assert_eq!(result.rows, vec![vec![Value::Int(2)], vec![Value::Int(3)]]);
    }

    #[test]
    fn test_join_matches_nested_loop() {
        let mut db = Database::new();
        db.create_table("l".into(), int_schema("k")).unwrap();
        db.create_table("r".into(), int_schema("k")).unwrap();
        db.insert_rows("l", int_rows(&[1, 2, 2, 3, 5])).unwrap();
        db.insert_rows("r", int_rows(&[2, 2, 3, 3, 3, 9])).unwrap();

        let proj = [(JoinSide::Left, "k".to_string()), (JoinSide::Right, "k".to_string())];
        let hash = db.join("l", "r", "k", "k", &proj, true).unwrap();
        let nested = db.join_nested_loop("l", "r", "k", "k", &proj, true).unwrap();

        assert_eq!(hash.matched, nested.matched);
        let mut hash_rows = hash.rows;
        let mut nested_rows = nested.rows;
        hash_rows.sort();
        nested_rows.sort();
        assert_eq!(hash_rows, nested_rows);
    }

    #[test]
    fn test_join_projects_both_sides() {
        let mut db = Database::new();
        db.create_table("people".into(), simple_schema()).unwrap();
        db.create_table("scores".into(), {
            Schema {
                columns: vec![
                    ColumnDef {
                        name: "id".into(),
                        data_type: DataType::Int,
                    },
                    ColumnDef {
                        name: "score".into(),
                        data_type: DataType::Int,
                    },
                ],
            }
        })
        .unwrap();
        db.insert_rows(
            "people",
            vec![
                vec![Value::Int(1), Value::Str("alice".into())],
                vec![Value::Int(2), Value::Str("bob".into())],
            ],
        )
        .unwrap();
        db.insert_rows(
            "scores",
            vec![
                vec![Value::Int(2), Value::Int(90)],
                vec![Value::Int(2), Value::Int(75)],
            ],
        )
        .unwrap();

        let result = db
            .join(
                "people",
                "scores",
                "id",
                "id",
                &[
                    (JoinSide::Left, "name".into()),
                    (JoinSide::Right, "score".into()),
                ],
                true,
            )
            .unwrap();

        assert_eq!(result.columns, vec!["name", "score"]);
        assert_eq!(result.matched, 2);
        // Bucket order within one left row follows right-table insertion.
        assert_eq!(
            result.rows,
            vec![
                vec![Value::Str("bob".into()), Value::Int(90)],
                vec![Value::Str("bob".into()), Value::Int(75)],
            ]
        );
    }

    #[test]
    fn test_join_count_only() {
        let db = join_fixture();
        let result = db
            .join("a", "b", "id", "id", &[(JoinSide::Left, "id".into())], false)
            .unwrap();

        assert_eq!(result.matched, 2);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_join_unknown_column_touches_nothing() {
        let db = join_fixture();
        let err = db
            .join("a", "b", "id", "missing", &[], true)
            .unwrap_err();
        assert!(matches!(err, EngineError::ColumnNotFound { .. }));
    }
}
