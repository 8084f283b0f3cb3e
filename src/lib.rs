//! # sqlforge
//!
//! Build statements as a typed tree, then translate them into MySQL text
//! with `?` placeholders and the matching parameter list.
//!
//! ## Quick Example
//!
//! ```rust
//! use sqlforge::prelude::*;
//!
//! let out = Select::table("users as u")
//!     .fields("u.id, u.name")
//!     .where_eq("u.active", 1)
//!     .order_by("u.name", SortDirection::Asc)
//!     .limit(10)
//!     .to_sql()
//!     .unwrap();
//!
//! assert_eq!(
//!     out.sql,
//!     "select `u`.`id`, `u`.`name` from `users` as `u` where `u`.`active` = ? order by `u`.`name` asc limit 10"
//! );
//! assert_eq!(out.params, vec![Value::Int(1)]);
//! ```
//!
//! ## Encrypted columns
//!
//! A [`policy::TransformPolicy`] names the columns stored encrypted. The
//! translator decrypts them wherever they are read and encrypts them
//! wherever they are written, binding the key as a parameter.
//!
//! ```rust
//! use sqlforge::prelude::*;
//!
//! let translator = Translator::with_policy(EncryptedColumns::new().table("users", ["email"]));
//! let out = Select::table("users").fields("email").to_sql_with(&translator).unwrap();
//! assert_eq!(
//!     out.sql,
//!     "select convert(aes_decrypt(`email`, ?) using utf8) as `email` from `users`"
//! );
//! ```

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod policy;
pub mod shape;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::Config;
    pub use crate::engine::Engine;
    pub use crate::error::*;
    pub use crate::policy::{EncryptedColumns, NoTransform, TransformPolicy};
    pub use crate::shape::{ResultShape, Shaped};
    pub use crate::transpiler::{ToSql, Translated, Translator};
}

/// Translate a statement with MySQL and no column transforms.
///
/// # Example
///
/// ```
/// use sqlforge::ast::Statement;
///
/// let out = sqlforge::translate(&Statement::drop("sessions")).unwrap();
/// assert_eq!(out.sql, "drop table `sessions`;");
/// ```
pub fn translate(statement: &ast::Statement) -> error::ForgeResult<transpiler::Translated> {
    transpiler::Translator::default().translate(statement)
}
