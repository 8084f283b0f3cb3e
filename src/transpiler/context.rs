//! Per-call translation state and per-statement name resolution.

use tracing::trace;

use crate::ast::cmd::QueryBase;
use crate::ast::{AliasMap, Value};
use crate::error::ForgeResult;
use crate::parser::{parse_identifier, parse_table_name};
use crate::policy::TransformPolicy;
use crate::transpiler::traits::SqlGenerator;

/// Parameter buffer and collaborators for one top-level `translate` call.
/// Subqueries append to the same buffer, so parameter order follows text
/// order.
pub struct TranslateContext<'a> {
    pub generator: &'a dyn SqlGenerator,
    policy: &'a dyn TransformPolicy,
    params: Vec<Value>,
    depth: usize,
}

impl<'a> TranslateContext<'a> {
    pub fn new(generator: &'a dyn SqlGenerator, policy: &'a dyn TransformPolicy) -> Self {
        Self {
            generator,
            policy,
            params: Vec::new(),
            depth: 0,
        }
    }

    /// Add a value and return the placeholder for it.
    pub fn bind(&mut self, value: Value) -> String {
        self.params.push(value);
        self.generator.placeholder(self.params.len())
    }

    /// Bind the policy's encryption key.
    pub fn bind_key(&mut self) -> String {
        let key = self.policy.key_param();
        self.bind(key)
    }

    pub fn into_params(self) -> Vec<Value> {
        self.params
    }

    /// Run `build` one subquery level deeper.
    pub fn nested<T>(
        &mut self,
        build: impl FnOnce(&mut Self) -> ForgeResult<T>,
    ) -> ForgeResult<T> {
        self.depth += 1;
        trace!(depth = self.depth, params = self.params.len(), "entering subquery");
        let result = build(self);
        self.depth -= 1;
        result
    }

    /// Whether `column` is stored transformed. Dotted names carry their own
    /// table; bare names belong to the statement's table. Aliases resolve
    /// through the scope.
    pub fn requires_transform(&self, scope: &Scope<'_>, column: &str) -> bool {
        let Ok(ident) = parse_identifier(column) else {
            return false;
        };
        if ident.distinct || ident.alias.is_some() || ident.name() == "*" {
            return false;
        }
        let table = match ident.table().or(scope.default_table.as_deref()) {
            Some(table) => table,
            None => return false,
        };
        let table = scope.aliases.resolve(table);
        self.policy.is_transform_required(table, ident.name())
    }
}

/// Name resolution for one statement: its table, aliases, column prefix
/// and the output aliases of its select list.
#[derive(Debug, Clone, Default)]
pub struct Scope<'s> {
    pub default_table: Option<String>,
    pub prefix: Option<&'s str>,
    pub aliases: AliasMap,
    pub output_aliases: Vec<&'s str>,
}

impl<'s> Scope<'s> {
    /// Registers the aliases of the table and every join before anything
    /// else of the statement is compiled.
    pub fn for_base(base: &'s QueryBase, output_aliases: Vec<&'s str>) -> ForgeResult<Self> {
        let mut aliases = base.aliases.clone();
        let mut default_table = None;

        if let Some(table) = &base.table {
            let resolved = table.resolved()?;
            aliases.register_ref(&resolved);
            default_table = Some(resolved.canonical().to_string());
        }
        for join in &base.joins {
            let source = join.source.resolved()?;
            aliases.register_ref(&source);
        }

        Ok(Self {
            default_table,
            prefix: base.field_prefix.as_deref(),
            aliases,
            output_aliases,
        })
    }

    /// Scope of a single-table statement (insert, drop, ...).
    pub fn for_table(table: &str) -> ForgeResult<Self> {
        let parsed = parse_table_name(table)?;
        Ok(Self {
            default_table: Some(parsed.name),
            ..Self::default()
        })
    }

    pub fn is_output_alias(&self, column: &str) -> bool {
        self.output_aliases.contains(&column)
    }

    /// Prepend the field prefix to a bare column.
    pub fn qualify(&self, column: &str) -> String {
        match self.prefix {
            Some(prefix) if !column.contains('.') => format!("{}.{}", prefix, column),
            _ => column.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{QueryBuilder, Select};
    use crate::policy::EncryptedColumns;
    use crate::transpiler::sql::mysql::MysqlGenerator;

    #[test]
    fn test_scope_registers_join_aliases() {
        let select = Select::table("users as u").left_join("orders o", "o.user_id", "=", "u.id");
        let scope = Scope::for_base(&select.base, vec![]).unwrap();
        assert_eq!(scope.default_table.as_deref(), Some("users"));
        assert_eq!(scope.aliases.resolve("o"), "orders");
    }

    #[test]
    fn test_requires_transform_resolves_alias() {
        let policy = EncryptedColumns::new().table("users", ["email"]);
        let ctx = TranslateContext::new(&MysqlGenerator, &policy);
        let select = Select::table("users as u");
        let scope = Scope::for_base(&select.base, vec![]).unwrap();

        assert!(ctx.requires_transform(&scope, "u.email"));
        assert!(ctx.requires_transform(&scope, "email"));
        assert!(ctx.requires_transform(&scope, "app.users.email"));
        assert!(!ctx.requires_transform(&scope, "u.id"));
        assert!(!ctx.requires_transform(&scope, "distinct email"));
    }

    #[test]
    fn test_qualify() {
        let select = Select::table("users").field_prefix("u");
        let scope = Scope::for_base(&select.base, vec![]).unwrap();
        assert_eq!(scope.qualify("id"), "u.id");
        assert_eq!(scope.qualify("o.id"), "o.id");
    }
}
