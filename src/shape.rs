//! Post-processing of fetched rows: forward keys and grouping.
//!
//! Rows come back from the engine as JSON objects. A select may ask for
//! them re-keyed by one column (`forward_key`), grouped by another
//! (`group_results`), or both, in that order.

use serde_json::{Map, Value as JsonValue};

use crate::ast::Select;
use crate::error::{ForgeError, ForgeResult};

/// Shaping requested by a select.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultShape {
    pub forward_key: Option<String>,
    pub group_by: Option<String>,
}

/// Shaped rows, in fetch order.
#[derive(Debug, Clone, PartialEq)]
pub enum Shaped {
    Rows(Vec<JsonValue>),
    /// Rows by forward key; a later duplicate replaces the earlier row in
    /// its original position.
    Keyed(Vec<(String, JsonValue)>),
    /// Groups in first-seen order, each holding rows or keyed rows.
    Grouped(Vec<(String, Shaped)>),
}

impl ResultShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_select(select: &Select) -> Self {
        Self {
            forward_key: select.forward_key.clone(),
            group_by: select.group_results.clone(),
        }
    }

    pub fn forward_key(mut self, key: impl Into<String>) -> Self {
        self.forward_key = Some(key.into());
        self
    }

    pub fn group_by(mut self, key: impl Into<String>) -> Self {
        self.group_by = Some(key.into());
        self
    }

    pub fn is_plain(&self) -> bool {
        self.forward_key.is_none() && self.group_by.is_none()
    }

    pub fn apply(&self, rows: Vec<JsonValue>) -> ForgeResult<Shaped> {
        if rows.is_empty() {
            return Ok(Shaped::Rows(rows));
        }

        let mut shaped = match &self.forward_key {
            Some(key) => Shaped::Keyed(forward(rows, key)?),
            None => Shaped::Rows(rows),
        };
        if let Some(key) = &self.group_by {
            shaped = group(shaped, key)?;
        }
        Ok(shaped)
    }
}

impl Shaped {
    pub fn len(&self) -> usize {
        match self {
            Shaped::Rows(rows) => rows.len(),
            Shaped::Keyed(rows) => rows.len(),
            Shaped::Grouped(groups) => groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first entry: a row, or the first group as JSON.
    pub fn first(self) -> Option<JsonValue> {
        match self {
            Shaped::Rows(rows) => rows.into_iter().next(),
            Shaped::Keyed(rows) => rows.into_iter().next().map(|(_, row)| row),
            Shaped::Grouped(groups) => groups.into_iter().next().map(|(_, g)| g.into_json()),
        }
    }

    /// Rows become an array; keyed rows and groups become objects.
    pub fn into_json(self) -> JsonValue {
        match self {
            Shaped::Rows(rows) => JsonValue::Array(rows),
            Shaped::Keyed(rows) => JsonValue::Object(rows.into_iter().collect()),
            Shaped::Grouped(groups) => JsonValue::Object(
                groups
                    .into_iter()
                    .map(|(key, group)| (key, group.into_json()))
                    .collect(),
            ),
        }
    }
}

fn record<'r>(row: &'r JsonValue) -> ForgeResult<&'r Map<String, JsonValue>> {
    row.as_object().ok_or(ForgeError::NotAssociative)
}

/// Object keys are strings; scalars are printed, null is the empty key.
fn key_of(row: &JsonValue, key: &str) -> ForgeResult<String> {
    let value = record(row)?
        .get(key)
        .ok_or_else(|| ForgeError::MissingResultKey(key.to_string()))?;
    Ok(match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    })
}

fn forward(rows: Vec<JsonValue>, key: &str) -> ForgeResult<Vec<(String, JsonValue)>> {
    let mut keyed: Vec<(String, JsonValue)> = Vec::with_capacity(rows.len());
    for row in rows {
        let k = key_of(&row, key)?;
        match keyed.iter_mut().find(|(existing, _)| *existing == k) {
            Some(slot) => slot.1 = row,
            None => keyed.push((k, row)),
        }
    }
    Ok(keyed)
}

fn group(shaped: Shaped, key: &str) -> ForgeResult<Shaped> {
    let entries: Vec<(Option<String>, JsonValue)> = match shaped {
        Shaped::Rows(rows) => rows.into_iter().map(|row| (None, row)).collect(),
        Shaped::Keyed(rows) => rows.into_iter().map(|(k, row)| (Some(k), row)).collect(),
        grouped @ Shaped::Grouped(_) => return Ok(grouped),
    };

    let mut groups: Vec<(String, Shaped)> = Vec::new();
    for (forwarded, row) in entries {
        let k = key_of(&row, key)?;
        let i = match groups.iter().position(|(existing, _)| *existing == k) {
            Some(i) => i,
            None => {
                let empty = match forwarded {
                    Some(_) => Shaped::Keyed(Vec::new()),
                    None => Shaped::Rows(Vec::new()),
                };
                groups.push((k, empty));
                groups.len() - 1
            }
        };
        match (&mut groups[i].1, forwarded) {
            (Shaped::Keyed(rows), Some(f)) => rows.push((f, row)),
            (Shaped::Rows(rows), _) => rows.push(row),
            _ => {}
        }
    }
    Ok(Shaped::Grouped(groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<JsonValue> {
        vec![
            json!({"id": 1, "name": "a", "team": "red"}),
            json!({"id": 2, "name": "b", "team": "blue"}),
            json!({"id": 3, "name": "c", "team": "red"}),
        ]
    }

    #[test]
    fn test_plain_rows_untouched() {
        let shaped = ResultShape::new().apply(rows()).unwrap();
        assert_eq!(shaped, Shaped::Rows(rows()));
    }

    #[test]
    fn test_forward_key() {
        let shaped = ResultShape::new().forward_key("name").apply(rows()).unwrap();
        let Shaped::Keyed(keyed) = &shaped else {
            panic!("expected keyed rows");
        };
        let keys: Vec<&str> = keyed.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn test_forward_key_later_duplicate_replaces_in_place() {
        let shaped = ResultShape::new().forward_key("team").apply(rows()).unwrap();
        assert_eq!(
            shaped.into_json(),
            json!({
                "red": {"id": 3, "name": "c", "team": "red"},
                "blue": {"id": 2, "name": "b", "team": "blue"},
            })
        );
    }

    #[test]
    fn test_group_results_first_seen_order() {
        let shaped = ResultShape::new().group_by("team").apply(rows()).unwrap();
        let Shaped::Grouped(groups) = &shaped else {
            panic!("expected groups");
        };
        assert_eq!(groups[0].0, "red");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "blue");
    }

    #[test]
    fn test_forward_then_group() {
        let shaped = ResultShape::new()
            .forward_key("id")
            .group_by("team")
            .apply(rows())
            .unwrap();
        assert_eq!(
            shaped.into_json(),
            json!({
                "red": {
                    "1": {"id": 1, "name": "a", "team": "red"},
                    "3": {"id": 3, "name": "c", "team": "red"},
                },
                "blue": {"2": {"id": 2, "name": "b", "team": "blue"}},
            })
        );
    }

    #[test]
    fn test_missing_key() {
        let err = ResultShape::new().forward_key("uid").apply(rows()).unwrap_err();
        assert!(matches!(err, ForgeError::MissingResultKey(ref k) if k == "uid"));
    }

    #[test]
    fn test_not_associative() {
        let err = ResultShape::new()
            .group_by("team")
            .apply(vec![json!([1, 2])])
            .unwrap_err();
        assert!(matches!(err, ForgeError::NotAssociative));
    }

    #[test]
    fn test_empty_rows_skip_checks() {
        let shaped = ResultShape::new().forward_key("uid").apply(Vec::new()).unwrap();
        assert!(shaped.is_empty());
    }

    #[test]
    fn test_first() {
        let first = ResultShape::new().apply(rows()).unwrap().first();
        assert_eq!(first, Some(json!({"id": 1, "name": "a", "team": "red"})));
    }
}
