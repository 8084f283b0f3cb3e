//! UPDATE SQL generation.

use crate::ast::Update;
use crate::error::{ForgeError, ForgeResult};
use crate::transpiler::conditions::build_conditions;
use crate::transpiler::context::{Scope, TranslateContext};
use crate::transpiler::dml::select::build_orders;
use crate::transpiler::escape::{escape_identifier, write_value};
use crate::transpiler::joins::build_joins;
use crate::transpiler::table::resolve_table;

/// Generate UPDATE SQL. Only a row count limit applies; offset is ignored.
pub fn build_update(update: &Update, ctx: &mut TranslateContext<'_>) -> ForgeResult<String> {
    if update.values.is_empty() {
        return Err(ForgeError::EmptyValues("update"));
    }
    let base = &update.base;
    let Some(table) = &base.table else {
        return Err(ForgeError::untranslatable("update without a table"));
    };
    let scope = Scope::for_base(base, Vec::new())?;

    let mut sql = String::from("update ");
    sql.push_str(&resolve_table(ctx, table, base.database.as_deref(), true)?);
    sql.push_str(&build_joins(ctx, &scope, &base.joins)?);

    let mut sets = Vec::with_capacity(update.values.len());
    for (column, value) in &update.values {
        let target = escape_identifier(ctx, column)?;
        let value = write_value(ctx, &scope, column, value)?;
        sets.push(format!("{} = {}", target, value));
    }
    sql.push_str(" set ");
    sql.push_str(&sets.join(", "));

    sql.push_str(&build_conditions(ctx, &scope, &base.wheres)?);
    sql.push_str(&build_orders(ctx, &scope, &base.orders)?);
    if let Some(limit) = base.limit {
        sql.push_str(&ctx.generator.limit(limit));
    }

    Ok(sql)
}
