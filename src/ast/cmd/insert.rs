use serde::{Deserialize, Serialize};

use crate::ast::cmd::Statement;
use crate::ast::{Operand, TableRef};

/// A row of `column -> value` pairs in insertion order.
pub type Row = Vec<(String, Operand)>;

/// `insert [ignore] into table (cols) values (...), (...)`; also used for
/// `replace`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    pub table: TableRef,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub ignore: bool,
}

impl Insert {
    pub fn table(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            database: None,
            rows: Vec::new(),
            ignore: false,
        }
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Append one row. Column names of the first row drive the column list.
    pub fn values<I, K, V>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Operand>,
    {
        self.rows
            .push(row.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// Same rows as a `replace` statement.
    pub fn replace(self) -> Statement {
        Statement::Replace(self)
    }
}
