//! DELETE SQL generation.

use crate::ast::Delete;
use crate::error::{ForgeError, ForgeResult};
use crate::parser::split_list;
use crate::transpiler::conditions::build_conditions;
use crate::transpiler::context::{Scope, TranslateContext};
use crate::transpiler::dml::select::build_orders;
use crate::transpiler::escape::escape_identifier;
use crate::transpiler::joins::build_joins;
use crate::transpiler::table::resolve_table;

/// Generate DELETE SQL: `delete [a, b] from table ...`.
pub fn build_delete(delete: &Delete, ctx: &mut TranslateContext<'_>) -> ForgeResult<String> {
    let base = &delete.base;
    let Some(table) = &base.table else {
        return Err(ForgeError::untranslatable("delete without a table"));
    };
    let scope = Scope::for_base(base, Vec::new())?;

    let mut sql = String::from("delete ");
    if let Some(targets) = &delete.targets {
        let targets = split_list(targets)
            .iter()
            .map(|t| escape_identifier(ctx, t))
            .collect::<ForgeResult<Vec<_>>>()?;
        if !targets.is_empty() {
            sql.push_str(&targets.join(", "));
            sql.push(' ');
        }
    }
    sql.push_str("from ");
    sql.push_str(&resolve_table(ctx, table, base.database.as_deref(), true)?);

    sql.push_str(&build_joins(ctx, &scope, &base.joins)?);
    sql.push_str(&build_conditions(ctx, &scope, &base.wheres)?);
    sql.push_str(&build_orders(ctx, &scope, &base.orders)?);
    if let Some(limit) = base.limit {
        sql.push_str(&ctx.generator.limit(limit));
    }

    Ok(sql)
}
