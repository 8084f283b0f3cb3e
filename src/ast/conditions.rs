use serde::{Deserialize, Serialize};

use crate::ast::{Clause, Conjunction, Expr, Operand, Value};

/// One entry of a where/having tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    /// `target operator value`
    Leaf {
        conjunction: Conjunction,
        target: Expr,
        operator: String,
        value: Operand,
    },
    /// Nested sub-tree, parenthesized when it holds more than one entry.
    Group {
        conjunction: Conjunction,
        tree: ConditionTree,
    },
}

impl Condition {
    pub fn conjunction(&self) -> Conjunction {
        match self {
            Condition::Leaf { conjunction, .. } | Condition::Group { conjunction, .. } => *conjunction,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Leaf {
                target,
                operator,
                value,
                ..
            } => match value {
                Operand::Value(v) => write!(f, "{} {} {}", target, operator, v),
                Operand::List(list) => write!(f, "{} {} [{} values]", target, operator, list.len()),
                Operand::Expr(e) => write!(f, "{} {} {}", target, operator, e),
            },
            Condition::Group { tree, .. } => write!(f, "({} entries)", tree.len()),
        }
    }
}

/// Ordered condition entries for one statement keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionTree {
    pub clause: Clause,
    #[serde(default)]
    pub entries: Vec<Condition>,
}

impl Default for ConditionTree {
    fn default() -> Self {
        Self::where_clause()
    }
}

impl ConditionTree {
    pub fn new(clause: Clause) -> Self {
        Self {
            clause,
            entries: Vec::new(),
        }
    }

    pub fn where_clause() -> Self {
        Self::new(Clause::Where)
    }

    pub fn having_clause() -> Self {
        Self::new(Clause::Having)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The first entry always carries the tree's keyword; a keyword passed
    /// for any later entry means `and`.
    fn normalize(&self, conjunction: Conjunction) -> Conjunction {
        if self.entries.is_empty() {
            return self.clause.into();
        }
        match conjunction {
            Conjunction::Where | Conjunction::Having => Conjunction::And,
            other => other,
        }
    }

    /// Append a leaf. `in`-style lists lose their duplicates, keeping the
    /// first occurrence; `between` bounds are kept as given.
    pub fn push(
        &mut self,
        conjunction: Conjunction,
        target: impl Into<Expr>,
        operator: impl Into<String>,
        value: impl Into<Operand>,
    ) {
        let conjunction = self.normalize(conjunction);
        let operator = operator.into();
        let value = match value.into() {
            Operand::List(list) if !operator.eq_ignore_ascii_case("between") => {
                Operand::List(dedup(list))
            }
            other => other,
        };
        self.entries.push(Condition::Leaf {
            conjunction,
            target: target.into(),
            operator,
            value,
        });
    }

    /// Append a nested tree. Empty trees are dropped.
    pub fn push_group(&mut self, conjunction: Conjunction, mut tree: ConditionTree) {
        if tree.is_empty() {
            return;
        }
        let conjunction = self.normalize(conjunction);
        tree.clause = self.clause;
        self.entries.push(Condition::Group { conjunction, tree });
    }

    /// Append the entries of `other` one by one, renormalizing conjunctions.
    pub fn extend(&mut self, other: ConditionTree) {
        for entry in other.entries {
            match entry {
                Condition::Leaf {
                    conjunction,
                    target,
                    operator,
                    value,
                } => {
                    let conjunction = self.normalize(conjunction);
                    self.entries.push(Condition::Leaf {
                        conjunction,
                        target,
                        operator,
                        value,
                    });
                }
                Condition::Group { conjunction, tree } => self.push_group(conjunction, tree),
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn dedup(values: Vec<Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::with_capacity(values.len());
    for v in values {
        if !unique.contains(&v) {
            unique.push(v);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_entry_takes_keyword() {
        let mut tree = ConditionTree::where_clause();
        tree.push(Conjunction::Or, "a", "=", 1);
        tree.push(Conjunction::Where, "b", "=", 2);
        tree.push(Conjunction::Or, "c", "=", 3);

        let conjunctions: Vec<_> = tree.entries.iter().map(Condition::conjunction).collect();
        assert_eq!(
            conjunctions,
            vec![Conjunction::Where, Conjunction::And, Conjunction::Or]
        );
    }

    #[test]
    fn test_in_list_dedup() {
        let mut tree = ConditionTree::where_clause();
        tree.push(Conjunction::And, "id", "in", vec![3, 1, 3, 2, 1]);
        tree.push(Conjunction::And, "n", "between", vec![5, 5]);

        match &tree.entries[0] {
            Condition::Leaf { value, .. } => {
                assert_eq!(value, &Operand::List(vec![3.into(), 1.into(), 2.into()]))
            }
            other => panic!("unexpected entry {:?}", other),
        }
        match &tree.entries[1] {
            Condition::Leaf { value, .. } => assert_eq!(value, &Operand::List(vec![5.into(), 5.into()])),
            other => panic!("unexpected entry {:?}", other),
        }
    }

    #[test]
    fn test_empty_group_skipped() {
        let mut tree = ConditionTree::having_clause();
        tree.push_group(Conjunction::Or, ConditionTree::having_clause());
        assert!(tree.is_empty());
    }
}
