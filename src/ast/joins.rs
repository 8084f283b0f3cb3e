use serde::{Deserialize, Serialize};

use crate::ast::{ConditionTree, Conjunction, Expr, JoinKind, TableRef};

/// A join definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    #[serde(default)]
    pub kind: JoinKind,
    pub source: TableRef,
    pub condition: JoinCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinCondition {
    /// `local operator reference`
    On {
        local: Expr,
        operator: String,
        reference: Expr,
    },
    /// Several `on` predicates plus inline where filters.
    Clause(JoinClause),
}

/// One predicate of an `on` chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OnCondition {
    Leaf {
        conjunction: Conjunction,
        local: Expr,
        operator: String,
        reference: Expr,
    },
    /// Always parenthesized, whatever its size. Its own filters follow
    /// its `on` chain inside the parentheses.
    Group {
        conjunction: Conjunction,
        clause: JoinClause,
    },
}

/// Sub-builder handed to closure-style joins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinClause {
    #[serde(default)]
    pub ons: Vec<OnCondition>,
    #[serde(default)]
    pub wheres: ConditionTree,
}

impl JoinClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ons.is_empty() && self.wheres.is_empty()
    }

    pub fn on(
        self,
        local: impl Into<Expr>,
        operator: &str,
        reference: impl Into<Expr>,
    ) -> Self {
        self.on_with(Conjunction::And, local, operator, reference)
    }

    pub fn and_on(
        self,
        local: impl Into<Expr>,
        operator: &str,
        reference: impl Into<Expr>,
    ) -> Self {
        self.on_with(Conjunction::And, local, operator, reference)
    }

    pub fn or_on(
        self,
        local: impl Into<Expr>,
        operator: &str,
        reference: impl Into<Expr>,
    ) -> Self {
        self.on_with(Conjunction::Or, local, operator, reference)
    }

    fn on_with(
        mut self,
        conjunction: Conjunction,
        local: impl Into<Expr>,
        operator: &str,
        reference: impl Into<Expr>,
    ) -> Self {
        self.ons.push(OnCondition::Leaf {
            conjunction,
            local: local.into(),
            operator: operator.to_string(),
            reference: reference.into(),
        });
        self
    }

    /// Nested `and ( ... )` on group.
    pub fn on_group<F>(self, build: F) -> Self
    where
        F: FnOnce(JoinClause) -> JoinClause,
    {
        self.group_with(Conjunction::And, build)
    }

    /// Nested `or ( ... )` on group.
    pub fn or_on_group<F>(self, build: F) -> Self
    where
        F: FnOnce(JoinClause) -> JoinClause,
    {
        self.group_with(Conjunction::Or, build)
    }

    fn group_with<F>(mut self, conjunction: Conjunction, build: F) -> Self
    where
        F: FnOnce(JoinClause) -> JoinClause,
    {
        let clause = build(JoinClause::new());
        if !clause.is_empty() {
            self.ons.push(OnCondition::Group { conjunction, clause });
        }
        self
    }
}
