//! Table reference rendering.

use crate::ast::TableRef;
use crate::error::ForgeResult;
use crate::parser::parse_table_name;
use crate::transpiler::context::TranslateContext;
use crate::transpiler::dml::select::build_select;

/// Render a table source. Subqueries are compiled in place, so their
/// parameters land where their text does. `allow_alias` is off for
/// statements whose grammar has no table alias (insert, drop, ...).
pub fn resolve_table(
    ctx: &mut TranslateContext<'_>,
    table: &TableRef,
    database: Option<&str>,
    allow_alias: bool,
) -> ForgeResult<String> {
    let (name, alias) = match table {
        TableRef::Subquery { alias, select } => {
            let sub = ctx.nested(|ctx| build_select(select, ctx))?;
            return Ok(format!("({}) as {}", sub, ctx.generator.quote_identifier(alias)));
        }
        TableRef::Name(raw) => (raw.as_str(), None),
        TableRef::Aliased { name, alias } => (name.as_str(), Some(alias.as_str())),
    };

    let parsed = parse_table_name(name)?;
    let g = ctx.generator;
    let mut sql = String::new();
    if let Some(db) = database.or(parsed.database.as_deref()) {
        sql.push_str(&g.quote_identifier(db));
        sql.push('.');
    }
    sql.push_str(&g.quote_identifier(&parsed.name));

    if allow_alias {
        if let Some(alias) = alias.or(parsed.alias.as_deref()) {
            sql.push_str(" as ");
            sql.push_str(&g.quote_identifier(alias));
        }
    }
    Ok(sql)
}
