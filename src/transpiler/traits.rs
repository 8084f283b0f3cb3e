//! Dialect seam of the translator.

/// Dialect-specific pieces of SQL text.
pub trait SqlGenerator {
    /// Quote one identifier part (no dots). `*` stays bare.
    fn quote_identifier(&self, name: &str) -> String;
    /// Placeholder for the parameter at 1-based `index`.
    fn placeholder(&self, index: usize) -> String;
    /// Limit clause of a select, with leading space.
    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String;
    /// Limit clause of an update or delete, with leading space.
    fn limit(&self, limit: u64) -> String;
    /// Read-side transform of an already escaped column.
    fn decrypt(&self, column: &str, key: &str) -> String;
    /// Write-side transform of an already rendered value.
    fn encrypt(&self, value: &str, key: &str) -> String;
    /// Collation appended when ordering by a decrypted column.
    fn case_insensitive_collation(&self) -> &str;
    /// Quoted string literal.
    fn string_literal(&self, value: &str) -> String;
}
