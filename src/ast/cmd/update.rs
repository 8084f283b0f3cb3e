use serde::{Deserialize, Serialize};

use crate::ast::cmd::QueryBase;
use crate::ast::{Operand, TableRef};

/// `update table [joins] set col = ?, ... [where] [order by] [limit n]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Update {
    #[serde(flatten)]
    pub base: QueryBase,
    #[serde(default)]
    pub values: Vec<(String, Operand)>,
}

impl Update {
    pub fn table(table: impl Into<TableRef>) -> Self {
        Self {
            base: QueryBase::new(table),
            values: Vec::new(),
        }
    }

    /// Set one column. Setting a column twice keeps the latest value in the
    /// original position.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Operand>) -> Self {
        let column = column.into();
        let value = value.into();
        match self.values.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.values.push((column, value)),
        }
        self
    }

    pub fn set_all<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Operand>,
    {
        for (column, value) in values {
            self = self.set(column, value);
        }
        self
    }
}
