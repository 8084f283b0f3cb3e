use serde::{Deserialize, Serialize};

use crate::ast::{AliasMap, ConditionTree, Expr, Join, SortDirection, TableRef};
use crate::error::{ForgeError, ForgeResult};

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

pub use self::delete::Delete;
pub use self::insert::Insert;
pub use self::select::{Field, Select};
pub use self::update::Update;

/// Attributes shared by select, update and delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryBase {
    /// Target table; a select without one renders no `from`.
    #[serde(default)]
    pub table: Option<TableRef>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub joins: Vec<Join>,
    #[serde(default)]
    pub wheres: ConditionTree,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    /// Prefix for bare column names in conditions and orders.
    #[serde(default)]
    pub field_prefix: Option<String>,
    /// Aliases introduced while building, including spliced-in joins.
    #[serde(default)]
    pub aliases: AliasMap,
}

impl QueryBase {
    pub fn new(table: impl Into<TableRef>) -> Self {
        let table = table.into();
        let mut base = Self::default();
        base.register(&table);
        base.table = Some(table);
        base
    }

    /// Record the alias of `table` when it has one. Strings that fail to
    /// parse are left for the translator to report.
    pub(crate) fn register(&mut self, table: &TableRef) {
        match table {
            TableRef::Name(raw) => {
                if let Ok(parsed) = TableRef::parse(raw) {
                    self.aliases.register_ref(&parsed);
                }
            }
            other => self.aliases.register_ref(other),
        }
    }
}

/// One `order by` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub expr: Expr,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Table-only statements: drop, truncate, show columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStatement {
    pub table: TableRef,
    #[serde(default)]
    pub database: Option<String>,
}

impl TableStatement {
    pub fn new(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            database: None,
        }
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

const KINDS: [&str; 9] = [
    "select", "insert", "replace", "update", "delete", "drop", "truncate", "show", "exists",
];

/// The AST root, one variant per statement kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    Select(Select),
    Insert(Insert),
    Replace(Insert),
    Update(Update),
    Delete(Delete),
    Drop(TableStatement),
    Truncate(TableStatement),
    Show(TableStatement),
    Exists(Box<Select>),
}

impl Statement {
    pub fn drop(table: impl Into<TableRef>) -> Self {
        Statement::Drop(TableStatement::new(table))
    }

    pub fn truncate(table: impl Into<TableRef>) -> Self {
        Statement::Truncate(TableStatement::new(table))
    }

    /// `show columns from table`
    pub fn show(table: impl Into<TableRef>) -> Self {
        Statement::Show(TableStatement::new(table))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Select(_) => "select",
            Statement::Insert(_) => "insert",
            Statement::Replace(_) => "replace",
            Statement::Update(_) => "update",
            Statement::Delete(_) => "delete",
            Statement::Drop(_) => "drop",
            Statement::Truncate(_) => "truncate",
            Statement::Show(_) => "show",
            Statement::Exists(_) => "exists",
        }
    }

    /// Decode a statement from its JSON form. An unrecognized `kind` is
    /// reported as [`ForgeError::UnknownStatement`].
    pub fn from_json(input: &str) -> ForgeResult<Self> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        let kind = value
            .get("kind")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        if !KINDS.contains(&kind) {
            return Err(ForgeError::UnknownStatement(if kind.is_empty() {
                "<missing kind>".to_string()
            } else {
                kind.to_string()
            }));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> ForgeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<Select> for Statement {
    fn from(s: Select) -> Self {
        Statement::Select(s)
    }
}

impl From<Insert> for Statement {
    fn from(i: Insert) -> Self {
        Statement::Insert(i)
    }
}

impl From<Update> for Statement {
    fn from(u: Update) -> Self {
        Statement::Update(u)
    }
}

impl From<Delete> for Statement {
    fn from(d: Delete) -> Self {
        Statement::Delete(d)
    }
}

impl From<&str> for TableRef {
    fn from(s: &str) -> Self {
        TableRef::Name(s.trim().to_string())
    }
}

impl From<String> for TableRef {
    fn from(s: String) -> Self {
        TableRef::Name(s.trim().to_string())
    }
}
