use serde::{Deserialize, Serialize};

use crate::ast::cmd::{QueryBase, Statement};
use crate::ast::{
    ConditionTree, Conjunction, Expr, Func, Operand, TableRef, Value, raw,
};
use crate::parser::split_list;

/// One entry of the select list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub expr: Expr,
    #[serde(default)]
    pub alias: Option<String>,
}

impl Field {
    /// Builds a field, splitting a `column as alias` string. A split with
    /// an empty side stays whole so translation reports it as malformed.
    pub fn new(expr: impl Into<Expr>, alias: Option<&str>) -> Self {
        let expr = expr.into();
        let split = match &expr {
            Expr::Column(name) => name
                .split_once(" as ")
                .map(|(column, inline)| (column.trim(), inline.trim()))
                .filter(|(column, inline)| {
                    !column.is_empty() && !inline.is_empty() && !inline.contains(" as ")
                })
                .map(|(column, inline)| (column.to_string(), inline.to_string())),
            _ => None,
        };
        match split {
            Some((column, inline)) => Field {
                expr: Expr::Column(column),
                alias: Some(alias.map_or(inline, str::to_string)),
            },
            None => Field {
                expr,
                alias: alias.map(str::to_string),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    #[serde(flatten)]
    pub base: QueryBase,
    /// Empty means `*`.
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    pub groups: Vec<Expr>,
    #[serde(default = "ConditionTree::having_clause")]
    pub havings: ConditionTree,
    /// Re-key fetched rows by this column.
    #[serde(default)]
    pub forward_key: Option<String>,
    /// Group fetched rows by this column.
    #[serde(default)]
    pub group_results: Option<String>,
}

impl Default for Select {
    fn default() -> Self {
        Self {
            base: QueryBase::default(),
            fields: Vec::new(),
            distinct: false,
            groups: Vec::new(),
            havings: ConditionTree::having_clause(),
            forward_key: None,
            group_results: None,
        }
    }
}

impl Select {
    /// `select * from table`
    pub fn table(table: impl Into<TableRef>) -> Self {
        Self {
            base: QueryBase::new(table),
            ..Self::default()
        }
    }

    /// Select without a `from` clause, e.g. `select now()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the select list with a comma separated list of columns.
    /// `*` and the empty string reset to `*`.
    pub fn fields(mut self, fields: &str) -> Self {
        self.fields.clear();
        for field in split_list(fields) {
            if field == "*" {
                continue;
            }
            self.fields.push(Field::new(field, None));
        }
        self
    }

    /// Replace the select list with `(column, alias)` pairs.
    pub fn fields_aliased<'a, I, E>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (E, Option<&'a str>)>,
        E: Into<Expr>,
    {
        self.fields = fields
            .into_iter()
            .map(|(expr, alias)| Field::new(expr, alias))
            .collect();
        self
    }

    pub fn add_field(mut self, field: impl Into<Expr>) -> Self {
        self.fields.push(Field::new(field, None));
        self
    }

    pub fn add_field_as(mut self, field: impl Into<Expr>, alias: &str) -> Self {
        self.fields.push(Field::new(field, Some(alias)));
        self
    }

    /// Arbitrary function with optional `group_concat` style options.
    pub fn add_field_func(
        mut self,
        name: &str,
        field: impl Into<Expr>,
        options: Option<crate::ast::ConcatOptions>,
        alias: Option<&str>,
    ) -> Self {
        let mut func = Func::new(name).arg(field);
        func.options = options;
        self.fields.push(Field::new(func, alias));
        self
    }

    pub fn add_field_count(self, field: impl Into<Expr>, alias: Option<&str>) -> Self {
        self.aggregate("count", field, alias)
    }

    pub fn add_field_max(self, field: impl Into<Expr>, alias: Option<&str>) -> Self {
        self.aggregate("max", field, alias)
    }

    pub fn add_field_min(self, field: impl Into<Expr>, alias: Option<&str>) -> Self {
        self.aggregate("min", field, alias)
    }

    pub fn add_field_sum(self, field: impl Into<Expr>, alias: Option<&str>) -> Self {
        self.aggregate("sum", field, alias)
    }

    pub fn add_field_avg(self, field: impl Into<Expr>, alias: Option<&str>) -> Self {
        self.aggregate("avg", field, alias)
    }

    pub fn add_field_round(mut self, field: impl Into<Expr>, decimals: u32, alias: Option<&str>) -> Self {
        let func = Func::new("round").arg(field).arg(raw(decimals.to_string()));
        self.fields.push(Field::new(func, alias));
        self
    }

    fn aggregate(mut self, name: &str, field: impl Into<Expr>, alias: Option<&str>) -> Self {
        self.fields.push(Field::new(Func::new(name).arg(field), alias));
        self
    }

    /// Explicitly decrypted column; the alias defaults to the column name.
    pub fn add_field_decrypt(mut self, field: &str, alias: Option<&str>) -> Self {
        let (column, inline) = match field.split_once(" as ") {
            Some((c, a)) => (c.trim(), Some(a.trim())),
            None => (field.trim(), None),
        };
        let alias = alias
            .or(inline)
            .unwrap_or_else(|| column.rsplit('.').next().unwrap_or(column));
        let func = Func::new("aes_decrypt").arg(column);
        self.fields.push(Field::new(func, Some(alias)));
        self
    }

    /// `aes_encrypt(?, ?)` over a bound value.
    pub fn add_field_encrypt(mut self, value: impl Into<Value>, alias: Option<&str>) -> Self {
        let func = Func::new("aes_encrypt").arg(Expr::Bind(value.into()));
        self.fields.push(Field::new(func, alias));
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Comma separated group keys.
    pub fn group_by(mut self, columns: &str) -> Self {
        self.groups.extend(split_list(columns).into_iter().map(Expr::Column));
        self
    }

    pub fn group_by_expr(mut self, expr: impl Into<Expr>) -> Self {
        self.groups.push(expr.into());
        self
    }

    pub fn having(mut self, column: impl Into<Expr>, operator: &str, value: impl Into<Operand>) -> Self {
        self.havings.push(Conjunction::And, column, operator, value);
        self
    }

    pub fn and_having(self, column: impl Into<Expr>, operator: &str, value: impl Into<Operand>) -> Self {
        self.having(column, operator, value)
    }

    pub fn or_having(mut self, column: impl Into<Expr>, operator: &str, value: impl Into<Operand>) -> Self {
        self.havings.push(Conjunction::Or, column, operator, value);
        self
    }

    pub fn having_eq(self, column: impl Into<Expr>, value: impl Into<Operand>) -> Self {
        self.having(column, "=", value)
    }

    pub fn having_in<V: Into<Value>>(self, column: impl Into<Expr>, values: Vec<V>) -> Self {
        if values.is_empty() {
            return self;
        }
        self.having(column, "in", values)
    }

    pub fn having_not_in<V: Into<Value>>(self, column: impl Into<Expr>, values: Vec<V>) -> Self {
        if values.is_empty() {
            return self;
        }
        self.having(column, "not in", values)
    }

    pub fn having_null(self, column: impl Into<Expr>) -> Self {
        self.having(column, "is", raw("NULL"))
    }

    pub fn having_not_null(self, column: impl Into<Expr>) -> Self {
        self.having(column, "is not", raw("NULL"))
    }

    pub fn or_having_null(self, column: impl Into<Expr>) -> Self {
        self.or_having(column, "is", raw("NULL"))
    }

    pub fn or_having_not_null(self, column: impl Into<Expr>) -> Self {
        self.or_having(column, "is not", raw("NULL"))
    }

    /// Nested having group built by `build`.
    pub fn having_group<F>(mut self, build: F) -> Self
    where
        F: FnOnce(ConditionTree) -> ConditionTree,
    {
        let tree = build(ConditionTree::having_clause());
        self.havings.push_group(Conjunction::And, tree);
        self
    }

    pub fn or_having_group<F>(mut self, build: F) -> Self
    where
        F: FnOnce(ConditionTree) -> ConditionTree,
    {
        let tree = build(ConditionTree::having_clause());
        self.havings.push_group(Conjunction::Or, tree);
        self
    }

    pub fn reset_havings(mut self) -> Self {
        self.havings.clear();
        self
    }

    pub fn forward_key(mut self, key: impl Into<String>) -> Self {
        self.forward_key = Some(key.into());
        self
    }

    pub fn group_results(mut self, key: impl Into<String>) -> Self {
        self.group_results = Some(key.into());
        self
    }

    /// Wrap into `select exists(...) as exists`.
    pub fn exists(self) -> Statement {
        Statement::Exists(Box::new(self))
    }

    /// Field aliases, consulted to tell output aliases from columns.
    pub fn output_aliases(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(|f| f.alias.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_split_aliases() {
        let select = Select::table("users").fields("id, name as n, *");
        assert_eq!(
            select.fields,
            vec![
                Field {
                    expr: Expr::Column("id".into()),
                    alias: None
                },
                Field {
                    expr: Expr::Column("name".into()),
                    alias: Some("n".into())
                },
            ]
        );
        assert!(Select::table("users").fields("*").fields.is_empty());
    }

    #[test]
    fn test_having_in_empty_is_noop() {
        let select = Select::table("orders").having_in::<i64>("id", vec![]);
        assert!(select.havings.is_empty());
    }

    #[test]
    fn test_decrypt_field_alias_defaults_to_column() {
        let select = Select::table("users").add_field_decrypt("u.email", None);
        assert_eq!(select.fields[0].alias.as_deref(), Some("email"));
    }
}
