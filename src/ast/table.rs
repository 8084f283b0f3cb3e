use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::ast::Select;
use crate::error::ForgeResult;
use crate::parser::parse_table_name;

/// A table source: plain or dotted name, aliased name, or aliased subquery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableRef {
    Subquery { alias: String, select: Box<Select> },
    Aliased { name: String, alias: String },
    Name(String),
}

impl TableRef {
    /// Parse `table`, `db.table`, `table as t` or `table t`.
    pub fn parse(input: &str) -> ForgeResult<Self> {
        let parsed = parse_table_name(input)?;
        let name = match parsed.database {
            Some(db) => format!("{}.{}", db, parsed.name),
            None => parsed.name,
        };
        Ok(match parsed.alias {
            Some(alias) => TableRef::Aliased { name, alias },
            None => TableRef::Name(name),
        })
    }

    /// Builder strings parsed into their structured form; other variants
    /// are returned as they are.
    pub fn resolved(&self) -> ForgeResult<Cow<'_, TableRef>> {
        match self {
            TableRef::Name(raw) => Ok(Cow::Owned(Self::parse(raw)?)),
            other => Ok(Cow::Borrowed(other)),
        }
    }

    pub fn subquery(alias: impl Into<String>, select: Select) -> Self {
        TableRef::Subquery {
            alias: alias.into(),
            select: Box::new(select),
        }
    }

    /// Name used by the transform lookup: the alias for subqueries, the
    /// table itself otherwise.
    pub fn canonical(&self) -> &str {
        match self {
            TableRef::Name(name) | TableRef::Aliased { name, .. } => {
                name.rsplit('.').next().unwrap_or(name)
            }
            TableRef::Subquery { alias, .. } => alias,
        }
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableRef::Name(name) => write!(f, "{}", name),
            TableRef::Aliased { name, alias } => write!(f, "{} as {}", name, alias),
            TableRef::Subquery { alias, .. } => write!(f, "(SUBQUERY) as {}", alias),
        }
    }
}

/// `alias -> table` pairs in registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasMap(Vec<(String, String)>);

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias`. Re-registering replaces the earlier target.
    pub fn register(&mut self, alias: impl Into<String>, table: impl Into<String>) {
        let alias = alias.into();
        let table = table.into();
        match self.0.iter_mut().find(|(a, _)| *a == alias) {
            Some(entry) => entry.1 = table,
            None => self.0.push((alias, table)),
        }
    }

    pub fn register_ref(&mut self, table: &TableRef) {
        if let TableRef::Aliased { alias, .. } = table {
            self.register(alias.clone(), table.canonical().to_string());
        }
    }

    /// The real table behind `name`, or `name` itself.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.0
            .iter()
            .find(|(alias, _)| alias == name)
            .map(|(_, table)| table.as_str())
            .unwrap_or(name)
    }

    pub fn merge(&mut self, other: &AliasMap) {
        for (alias, table) in &other.0 {
            self.register(alias.clone(), table.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_ref() {
        assert_eq!(TableRef::parse("users").unwrap(), TableRef::Name("users".into()));
        assert_eq!(
            TableRef::parse("app.users as u").unwrap(),
            TableRef::Aliased {
                name: "app.users".into(),
                alias: "u".into()
            }
        );
        assert_eq!(
            TableRef::parse("users u").unwrap(),
            TableRef::Aliased {
                name: "users".into(),
                alias: "u".into()
            }
        );
        assert!(TableRef::parse("a.b.c").is_err());
    }

    #[test]
    fn test_alias_map() {
        let mut map = AliasMap::new();
        map.register_ref(&TableRef::parse("app.users as u").unwrap());
        map.register("o", "orders");
        assert_eq!(map.resolve("u"), "users");
        assert_eq!(map.resolve("o"), "orders");
        assert_eq!(map.resolve("items"), "items");

        let mut other = AliasMap::new();
        other.register("o", "old_orders");
        map.merge(&other);
        assert_eq!(map.resolve("o"), "old_orders");
    }
}
