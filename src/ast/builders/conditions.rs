//! Where-clause builder methods shared by every statement that filters.

use crate::ast::{
    ConditionTree, Conjunction, Delete, Expr, JoinClause, Operand, Select, Update, Value, raw,
};
use crate::error::ForgeResult;

/// Fluent where-clause construction.
///
/// Nested groups are built by a callback that receives a fresh tree of the
/// same clause and returns it:
///
/// ```ignore
/// Select::table("users")
///     .where_eq("active", 1)
///     .where_group(|g| g.where_eq("role", "admin").or_where_eq("role", "owner"));
/// ```
pub trait Filter: Sized {
    fn conditions_mut(&mut self) -> &mut ConditionTree;

    /// `column operator value`, joined with `and`.
    fn filter(mut self, column: impl Into<Expr>, operator: &str, value: impl Into<Operand>) -> Self {
        self.conditions_mut()
            .push(Conjunction::And, column, operator, value);
        self
    }

    fn and_filter(self, column: impl Into<Expr>, operator: &str, value: impl Into<Operand>) -> Self {
        self.filter(column, operator, value)
    }

    fn or_filter(mut self, column: impl Into<Expr>, operator: &str, value: impl Into<Operand>) -> Self {
        self.conditions_mut()
            .push(Conjunction::Or, column, operator, value);
        self
    }

    /// Conjunction given as text (`and`, `or`, `where`, `having`).
    fn filter_as(
        mut self,
        conjunction: &str,
        column: impl Into<Expr>,
        operator: &str,
        value: impl Into<Operand>,
    ) -> ForgeResult<Self> {
        let conjunction: Conjunction = conjunction.parse()?;
        self.conditions_mut()
            .push(conjunction, column, operator, value);
        Ok(self)
    }

    fn where_eq(self, column: impl Into<Expr>, value: impl Into<Operand>) -> Self {
        self.filter(column, "=", value)
    }

    fn or_where_eq(self, column: impl Into<Expr>, value: impl Into<Operand>) -> Self {
        self.or_filter(column, "=", value)
    }

    /// No-op for an empty list.
    fn where_in<V: Into<Value>>(self, column: impl Into<Expr>, values: Vec<V>) -> Self {
        if values.is_empty() {
            return self;
        }
        self.filter(column, "in", values)
    }

    /// No-op for an empty list.
    fn where_not_in<V: Into<Value>>(self, column: impl Into<Expr>, values: Vec<V>) -> Self {
        if values.is_empty() {
            return self;
        }
        self.filter(column, "not in", values)
    }

    fn where_between(self, column: impl Into<Expr>, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.filter(column, "between", vec![low.into(), high.into()])
    }

    fn where_null(self, column: impl Into<Expr>) -> Self {
        self.filter(column, "is", raw("NULL"))
    }

    fn where_not_null(self, column: impl Into<Expr>) -> Self {
        self.filter(column, "is not", raw("NULL"))
    }

    fn or_where_null(self, column: impl Into<Expr>) -> Self {
        self.or_filter(column, "is", raw("NULL"))
    }

    fn or_where_not_null(self, column: impl Into<Expr>) -> Self {
        self.or_filter(column, "is not", raw("NULL"))
    }

    fn where_group<F>(self, build: F) -> Self
    where
        F: FnOnce(ConditionTree) -> ConditionTree,
    {
        self.group_with(Conjunction::And, build)
    }

    fn or_where_group<F>(self, build: F) -> Self
    where
        F: FnOnce(ConditionTree) -> ConditionTree,
    {
        self.group_with(Conjunction::Or, build)
    }

    #[doc(hidden)]
    fn group_with<F>(mut self, conjunction: Conjunction, build: F) -> Self
    where
        F: FnOnce(ConditionTree) -> ConditionTree,
    {
        let clause = self.conditions_mut().clause;
        let tree = build(ConditionTree::new(clause));
        self.conditions_mut().push_group(conjunction, tree);
        self
    }

    /// Bulk `column = value` pairs, added as one nested group.
    fn where_map<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Expr>,
        V: Into<Operand>,
    {
        self.where_group(|mut tree| {
            for (column, value) in pairs {
                tree.push(Conjunction::And, column, "=", value);
            }
            tree
        })
    }

    fn reset_wheres(mut self) -> Self {
        self.conditions_mut().clear();
        self
    }
}

impl Filter for ConditionTree {
    fn conditions_mut(&mut self) -> &mut ConditionTree {
        self
    }
}

impl Filter for JoinClause {
    fn conditions_mut(&mut self) -> &mut ConditionTree {
        &mut self.wheres
    }
}

impl Filter for Select {
    fn conditions_mut(&mut self) -> &mut ConditionTree {
        &mut self.base.wheres
    }
}

impl Filter for Update {
    fn conditions_mut(&mut self) -> &mut ConditionTree {
        &mut self.base.wheres
    }
}

impl Filter for Delete {
    fn conditions_mut(&mut self) -> &mut ConditionTree {
        &mut self.base.wheres
    }
}
