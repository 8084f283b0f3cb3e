//! Statement translator.
//!
//! Turns a built [`Statement`] into MySQL text with `?` placeholders and
//! the parameter list in placeholder order.

pub mod conditions;
pub mod context;
pub mod dml;
pub mod escape;
pub mod joins;
pub mod sql;
pub mod table;
pub mod traits;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::ast::*;
use crate::error::ForgeResult;
use crate::policy::{NoTransform, TransformPolicy};
pub use context::{Scope, TranslateContext};
pub use sql::mysql::MysqlGenerator;
pub use traits::SqlGenerator;

/// SQL text plus bindings, one per placeholder, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translated {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Owns the dialect generator and the transform policy. Every call to
/// [`Translator::translate`] starts with an empty parameter buffer, so one
/// translator may serve concurrent callers.
pub struct Translator {
    generator: Box<dyn SqlGenerator + Send + Sync>,
    policy: Arc<dyn TransformPolicy>,
}

impl Default for Translator {
    fn default() -> Self {
        Self {
            generator: Box::new(MysqlGenerator),
            policy: Arc::new(NoTransform),
        }
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator").finish_non_exhaustive()
    }
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: impl TransformPolicy + 'static) -> Self {
        Self::with_shared_policy(Arc::new(policy))
    }

    pub fn with_shared_policy(policy: Arc<dyn TransformPolicy>) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn generator(mut self, generator: impl SqlGenerator + Send + Sync + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    pub fn translate(&self, statement: &Statement) -> ForgeResult<Translated> {
        self.compile(statement.kind(), |ctx| build_statement(statement, ctx))
    }

    fn compile(
        &self,
        kind: &'static str,
        build: impl FnOnce(&mut TranslateContext<'_>) -> ForgeResult<String>,
    ) -> ForgeResult<Translated> {
        let mut ctx = TranslateContext::new(self.generator.as_ref(), self.policy.as_ref());
        let sql = build(&mut ctx)?;
        let params = ctx.into_params();
        debug!(kind, params = params.len(), "translated statement");
        Ok(Translated { sql, params })
    }
}

fn build_statement(statement: &Statement, ctx: &mut TranslateContext<'_>) -> ForgeResult<String> {
    match statement {
        Statement::Select(s) => dml::select::build_select(s, ctx),
        Statement::Insert(i) => dml::insert::build_insert(i, "insert", ctx),
        Statement::Replace(i) => dml::insert::build_insert(i, "replace", ctx),
        Statement::Update(u) => dml::update::build_update(u, ctx),
        Statement::Delete(d) => dml::delete::build_delete(d, ctx),
        Statement::Drop(t) => dml::admin::build_drop(t, ctx),
        Statement::Truncate(t) => dml::admin::build_truncate(t, ctx),
        Statement::Show(t) => dml::admin::build_show(t, ctx),
        Statement::Exists(s) => dml::select::build_exists(s, ctx),
    }
}

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    /// Translate with MySQL and no column transforms.
    fn to_sql(&self) -> ForgeResult<Translated> {
        self.to_sql_with(&Translator::default())
    }

    fn to_sql_with(&self, translator: &Translator) -> ForgeResult<Translated>;
}

impl ToSql for Statement {
    fn to_sql_with(&self, translator: &Translator) -> ForgeResult<Translated> {
        translator.translate(self)
    }
}

impl ToSql for Select {
    fn to_sql_with(&self, translator: &Translator) -> ForgeResult<Translated> {
        translator.compile("select", |ctx| dml::select::build_select(self, ctx))
    }
}

impl ToSql for Insert {
    fn to_sql_with(&self, translator: &Translator) -> ForgeResult<Translated> {
        translator.compile("insert", |ctx| dml::insert::build_insert(self, "insert", ctx))
    }
}

impl ToSql for Update {
    fn to_sql_with(&self, translator: &Translator) -> ForgeResult<Translated> {
        translator.compile("update", |ctx| dml::update::build_update(self, ctx))
    }
}

impl ToSql for Delete {
    fn to_sql_with(&self, translator: &Translator) -> ForgeResult<Translated> {
        translator.compile("delete", |ctx| dml::delete::build_delete(self, ctx))
    }
}
