//! Column transform policy: which `(table, column)` pairs are stored
//! encrypted and must be decrypted on read, encrypted on write.

use std::collections::{HashMap, HashSet};

use crate::ast::Value;

/// Placeholder text standing for the encryption key. Inside a raw
/// expression it is replaced by `?` and the key is bound.
pub const KEY_SENTINEL: &str = "__AES_KEY__";

/// Read-only lookup consulted by the translator. Table names passed in are
/// already de-aliased.
pub trait TransformPolicy: Send + Sync {
    fn is_transform_required(&self, table: &str, column: &str) -> bool;

    /// Value bound for every key placeholder.
    fn key_param(&self) -> Value {
        Value::String(KEY_SENTINEL.to_string())
    }
}

/// No column is transformed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransform;

impl TransformPolicy for NoTransform {
    fn is_transform_required(&self, _table: &str, _column: &str) -> bool {
        false
    }
}

/// Table-to-columns encryption map with an on/off switch.
#[derive(Debug, Clone)]
pub struct EncryptedColumns {
    active: bool,
    key: String,
    tables: HashMap<String, HashSet<String>>,
}

impl Default for EncryptedColumns {
    fn default() -> Self {
        Self {
            active: true,
            key: KEY_SENTINEL.to_string(),
            tables: HashMap::new(),
        }
    }
}

impl EncryptedColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn table<I, S>(mut self, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables
            .entry(table.into())
            .or_default()
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Configured columns, sorted for stable output.
    pub fn columns(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .tables
            .iter()
            .flat_map(|(t, cols)| cols.iter().map(move |c| (t.clone(), c.clone())))
            .collect();
        pairs.sort();
        pairs
    }
}

impl TransformPolicy for EncryptedColumns {
    fn is_transform_required(&self, table: &str, column: &str) -> bool {
        self.active
            && self
                .tables
                .get(table)
                .is_some_and(|columns| columns.contains(column))
    }

    fn key_param(&self) -> Value {
        Value::String(self.key.clone())
    }
}
