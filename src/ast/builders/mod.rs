//! Fluent construction of statement trees.
//!
//! - `conditions` - where-clause methods ([`Filter`])
//! - `query` - joins, ordering, paging and composition ([`QueryBuilder`])
//!
//! # Example
//! ```ignore
//! use sqlforge::prelude::*;
//!
//! let select = Select::table("users as u")
//!     .fields("u.id, u.email")
//!     .left_join("orders as o", "o.user_id", "=", "u.id")
//!     .where_eq("u.active", 1)
//!     .where_in("u.role", vec!["admin", "owner"])
//!     .order_by("u.id", SortDirection::Desc)
//!     .page(2, 25);
//! ```

pub mod conditions;
pub mod query;

pub use conditions::Filter;
pub use query::QueryBuilder;
