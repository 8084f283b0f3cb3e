//! DROP, TRUNCATE and SHOW COLUMNS.

use crate::ast::TableStatement;
use crate::error::ForgeResult;
use crate::transpiler::context::TranslateContext;
use crate::transpiler::table::resolve_table;

pub fn build_drop(stmt: &TableStatement, ctx: &mut TranslateContext<'_>) -> ForgeResult<String> {
    Ok(format!("drop table {};", table(stmt, ctx)?))
}

pub fn build_truncate(stmt: &TableStatement, ctx: &mut TranslateContext<'_>) -> ForgeResult<String> {
    Ok(format!("truncate table {};", table(stmt, ctx)?))
}

pub fn build_show(stmt: &TableStatement, ctx: &mut TranslateContext<'_>) -> ForgeResult<String> {
    Ok(format!("show columns from {};", table(stmt, ctx)?))
}

fn table(stmt: &TableStatement, ctx: &mut TranslateContext<'_>) -> ForgeResult<String> {
    resolve_table(ctx, &stmt.table, stmt.database.as_deref(), false)
}
