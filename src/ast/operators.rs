use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ForgeError;

/// The statement keyword a condition tree belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clause {
    Where,
    Having,
}

impl Clause {
    pub fn keyword(self) -> &'static str {
        match self {
            Clause::Where => "where",
            Clause::Having => "having",
        }
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Combinator in front of a condition entry. The first entry of a tree
/// carries the tree's own keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conjunction {
    Where,
    Having,
    And,
    Or,
}

impl Conjunction {
    pub fn as_str(self) -> &'static str {
        match self {
            Conjunction::Where => "where",
            Conjunction::Having => "having",
            Conjunction::And => "and",
            Conjunction::Or => "or",
        }
    }
}

impl From<Clause> for Conjunction {
    fn from(clause: Clause) -> Self {
        match clause {
            Clause::Where => Conjunction::Where,
            Clause::Having => Conjunction::Having,
        }
    }
}

impl FromStr for Conjunction {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "where" => Ok(Conjunction::Where),
            "having" => Ok(Conjunction::Having),
            "and" => Ok(Conjunction::And),
            "or" => Ok(Conjunction::Or),
            _ => Err(ForgeError::InvalidConjunction(s.to_string())),
        }
    }
}

impl std::fmt::Display for Conjunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    Inner,
    #[default]
    Left,
    Right,
    Outer,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "inner",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
            JoinKind::Outer => "outer",
        }
    }
}

impl FromStr for JoinKind {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inner" => Ok(JoinKind::Inner),
            "left" => Ok(JoinKind::Left),
            "right" => Ok(JoinKind::Right),
            "outer" => Ok(JoinKind::Outer),
            _ => Err(ForgeError::InvalidJoinType(s.to_string())),
        }
    }
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(ForgeError::InvalidDirection(s.to_string())),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join_kind() {
        assert_eq!("INNER".parse::<JoinKind>().unwrap(), JoinKind::Inner);
        let err = "cross".parse::<JoinKind>().unwrap_err();
        assert!(matches!(err, ForgeError::InvalidJoinType(ref t) if t == "cross"));
    }

    #[test]
    fn test_parse_conjunction() {
        assert_eq!("or".parse::<Conjunction>().unwrap(), Conjunction::Or);
        assert!(matches!(
            "xor".parse::<Conjunction>(),
            Err(ForgeError::InvalidConjunction(_))
        ));
    }
}
