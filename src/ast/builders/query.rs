//! Builder methods over the shared select/update/delete attributes.

use crate::ast::cmd::{Order, QueryBase};
use crate::ast::{
    Conjunction, Delete, Expr, Join, JoinClause, JoinCondition, JoinKind, Select, SortDirection,
    TableRef, Update,
};
use crate::error::ForgeResult;
use crate::parser::split_list;

pub trait QueryBuilder: Sized {
    fn base(&self) -> &QueryBase;

    fn base_mut(&mut self) -> &mut QueryBase;

    fn database(mut self, database: impl Into<String>) -> Self {
        self.base_mut().database = Some(database.into());
        self
    }

    /// Table name prepended to bare columns in conditions and orders.
    fn field_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.base_mut().field_prefix = Some(prefix.into());
        self
    }

    /// `kind join table on ( local operator reference )`
    fn join_kind(
        mut self,
        kind: JoinKind,
        table: impl Into<TableRef>,
        local: impl Into<Expr>,
        operator: &str,
        reference: impl Into<Expr>,
    ) -> Self {
        let condition = JoinCondition::On {
            local: local.into(),
            operator: operator.to_string(),
            reference: reference.into(),
        };
        push_join(self.base_mut(), kind, table.into(), condition);
        self
    }

    /// Left join, the default kind.
    fn join(
        self,
        table: impl Into<TableRef>,
        local: impl Into<Expr>,
        operator: &str,
        reference: impl Into<Expr>,
    ) -> Self {
        self.join_kind(JoinKind::Left, table, local, operator, reference)
    }

    fn left_join(
        self,
        table: impl Into<TableRef>,
        local: impl Into<Expr>,
        operator: &str,
        reference: impl Into<Expr>,
    ) -> Self {
        self.join_kind(JoinKind::Left, table, local, operator, reference)
    }

    fn right_join(
        self,
        table: impl Into<TableRef>,
        local: impl Into<Expr>,
        operator: &str,
        reference: impl Into<Expr>,
    ) -> Self {
        self.join_kind(JoinKind::Right, table, local, operator, reference)
    }

    fn inner_join(
        self,
        table: impl Into<TableRef>,
        local: impl Into<Expr>,
        operator: &str,
        reference: impl Into<Expr>,
    ) -> Self {
        self.join_kind(JoinKind::Inner, table, local, operator, reference)
    }

    fn outer_join(
        self,
        table: impl Into<TableRef>,
        local: impl Into<Expr>,
        operator: &str,
        reference: impl Into<Expr>,
    ) -> Self {
        self.join_kind(JoinKind::Outer, table, local, operator, reference)
    }

    /// Join type given as text; anything but inner/left/right/outer fails.
    fn join_type(
        self,
        kind: &str,
        table: impl Into<TableRef>,
        local: impl Into<Expr>,
        operator: &str,
        reference: impl Into<Expr>,
    ) -> ForgeResult<Self> {
        let kind: JoinKind = kind.parse()?;
        Ok(self.join_kind(kind, table, local, operator, reference))
    }

    /// Join whose `on` clause is built by `build`.
    fn join_with<F>(mut self, kind: JoinKind, table: impl Into<TableRef>, build: F) -> Self
    where
        F: FnOnce(JoinClause) -> JoinClause,
    {
        let clause = build(JoinClause::new());
        push_join(self.base_mut(), kind, table.into(), JoinCondition::Clause(clause));
        self
    }

    /// Comma separated columns, all in `direction`.
    fn order_by(mut self, columns: &str, direction: SortDirection) -> Self {
        self.base_mut()
            .orders
            .extend(split_list(columns).into_iter().map(|c| Order {
                expr: Expr::Column(c),
                direction,
            }));
        self
    }

    fn order_by_dir(self, columns: &str, direction: &str) -> ForgeResult<Self> {
        let direction: SortDirection = direction.parse()?;
        Ok(self.order_by(columns, direction))
    }

    /// Per-column directions.
    fn order_by_each<I, C>(mut self, orders: I) -> Self
    where
        I: IntoIterator<Item = (C, SortDirection)>,
        C: Into<Expr>,
    {
        self.base_mut()
            .orders
            .extend(orders.into_iter().map(|(c, direction)| Order {
                expr: c.into(),
                direction,
            }));
        self
    }

    fn order_by_expr(mut self, expr: impl Into<Expr>, direction: SortDirection) -> Self {
        self.base_mut().orders.push(Order {
            expr: expr.into(),
            direction,
        });
        self
    }

    fn limit(mut self, limit: u64) -> Self {
        self.base_mut().limit = Some(limit);
        self
    }

    /// Offset first, then count.
    fn limit_offset(mut self, offset: u64, limit: u64) -> Self {
        let base = self.base_mut();
        base.offset = Some(offset);
        base.limit = Some(limit);
        self
    }

    fn offset(mut self, offset: u64) -> Self {
        self.base_mut().offset = Some(offset);
        self
    }

    /// Zero-indexed page; a negative page means the first one.
    fn page(mut self, page: i64, size: u64) -> Self {
        let page = page.max(0) as u64;
        let base = self.base_mut();
        base.limit = Some(size);
        base.offset = Some(size.saturating_mul(page));
        self
    }

    /// Splice in the joins of `other` and adopt its aliases.
    fn add_joins<Q: QueryBuilder>(mut self, other: &Q) -> Self {
        let source = other.base();
        if source.joins.is_empty() {
            return self;
        }
        let base = self.base_mut();
        base.joins.extend(source.joins.iter().cloned());
        base.aliases.merge(&source.aliases);
        self
    }

    /// The where tree of `other` as one nested group.
    fn add_wheres<Q: QueryBuilder>(mut self, other: &Q, conjunction: Conjunction) -> Self {
        let tree = other.base().wheres.clone();
        self.base_mut().wheres.push_group(conjunction, tree);
        self
    }

    /// The where entries of `other`, appended flat.
    fn merge_wheres<Q: QueryBuilder>(mut self, other: &Q) -> Self {
        let tree = other.base().wheres.clone();
        self.base_mut().wheres.extend(tree);
        self
    }

    fn reset_joins(mut self) -> Self {
        self.base_mut().joins.clear();
        self
    }

    fn reset_orders(mut self) -> Self {
        self.base_mut().orders.clear();
        self
    }

    fn reset_limit(mut self) -> Self {
        self.base_mut().limit = None;
        self
    }

    fn reset_offset(mut self) -> Self {
        self.base_mut().offset = None;
        self
    }
}

fn push_join(base: &mut QueryBase, kind: JoinKind, source: TableRef, condition: JoinCondition) {
    base.register(&source);
    base.joins.push(Join {
        kind,
        source,
        condition,
    });
}

macro_rules! impl_query_builder {
    ($($ty:ty),*) => {
        $(
            impl QueryBuilder for $ty {
                fn base(&self) -> &QueryBase {
                    &self.base
                }

                fn base_mut(&mut self) -> &mut QueryBase {
                    &mut self.base
                }
            }
        )*
    };
}

impl_query_builder!(Select, Update, Delete);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_negative_clamps() {
        let select = Select::table("users").page(-3, 10);
        assert_eq!(select.base.offset, Some(0));
        assert_eq!(select.base.limit, Some(10));

        let select = Select::table("users").page(2, 10);
        assert_eq!(select.base.offset, Some(20));
    }

    #[test]
    fn test_join_type_validation() {
        let err = Select::table("users")
            .join_type("cross", "orders", "orders.user_id", "=", "users.id")
            .unwrap_err();
        assert!(err.to_string().contains("Invalid join type"));
    }

    #[test]
    fn test_add_joins_merges_aliases() {
        let prepared = Select::table("users").left_join("orders as o", "o.user_id", "=", "users.id");
        let select = Select::table("users").add_joins(&prepared);
        assert_eq!(select.base.joins.len(), 1);
        assert_eq!(select.base.aliases.resolve("o"), "orders");
    }

    #[test]
    fn test_order_by_list() {
        let select = Select::table("users").order_by("name, id", SortDirection::Desc);
        assert_eq!(select.base.orders.len(), 2);
        assert!(select.base.orders.iter().all(|o| o.direction == SortDirection::Desc));
    }
}
