use serde::{Deserialize, Serialize};

use crate::ast::cmd::QueryBase;
use crate::ast::TableRef;

/// `delete [targets] from table [joins] [where] [order by] [limit n]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    #[serde(flatten)]
    pub base: QueryBase,
    /// Comma separated tables to delete from in a multi-table delete.
    #[serde(default)]
    pub targets: Option<String>,
}

impl Delete {
    pub fn table(table: impl Into<TableRef>) -> Self {
        Self {
            base: QueryBase::new(table),
            targets: None,
        }
    }

    pub fn targets(mut self, targets: impl Into<String>) -> Self {
        self.targets = Some(targets.into());
        self
    }
}
