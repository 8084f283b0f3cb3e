//! Transpiler test modules.
//!
//! Tests are organized by category:
//! - `core`: per-statement output (select, insert, update, delete, admin)
//! - `conditions`: where/having trees, nesting, values
//! - `joins`: join kinds, on chains, subquery sources
//! - `transform`: encrypted columns on read and write
//! - `errors`: translation failures

mod conditions;
mod core;
