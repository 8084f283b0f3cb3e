//! INSERT and REPLACE SQL generation.

use crate::ast::Insert;
use crate::error::{ForgeError, ForgeResult};
use crate::transpiler::context::{Scope, TranslateContext};
use crate::transpiler::escape::{escape_identifier, write_value};
use crate::transpiler::table::resolve_table;

/// `{verb} [ignore] into table (a, b) values (?, ?), (?, ?)`. The first
/// row fixes the column list; every row must provide exactly those columns.
pub fn build_insert(insert: &Insert, verb: &'static str, ctx: &mut TranslateContext<'_>) -> ForgeResult<String> {
    let Some(first) = insert.rows.first().filter(|row| !row.is_empty()) else {
        return Err(ForgeError::EmptyValues(verb));
    };

    let mut sql = String::from(verb);
    if insert.ignore {
        sql.push_str(" ignore");
    }
    sql.push_str(" into ");
    sql.push_str(&resolve_table(ctx, &insert.table, insert.database.as_deref(), false)?);

    let table = insert.table.resolved()?;
    let scope = Scope::for_table(table.canonical())?;

    let columns: Vec<&str> = first.iter().map(|(c, _)| c.as_str()).collect();
    let escaped = columns
        .iter()
        .map(|c| escape_identifier(ctx, c))
        .collect::<ForgeResult<Vec<_>>>()?;
    sql.push_str(&format!(" ({}) values ", escaped.join(", ")));

    let mut rows = Vec::with_capacity(insert.rows.len());
    for (i, row) in insert.rows.iter().enumerate() {
        if row.len() != columns.len() {
            return Err(ForgeError::untranslatable(format!(
                "{} row {} has {} values for {} columns",
                verb,
                i,
                row.len(),
                columns.len()
            )));
        }
        let mut values = Vec::with_capacity(columns.len());
        for column in &columns {
            let value = row
                .iter()
                .find(|(c, _)| c == column)
                .map(|(_, v)| v)
                .ok_or_else(|| {
                    ForgeError::untranslatable(format!("{} row {} is missing column \"{}\"", verb, i, column))
                })?;
            values.push(write_value(ctx, &scope, column, value)?);
        }
        rows.push(format!("({})", values.join(", ")));
    }
    sql.push_str(&rows.join(", "));

    Ok(sql)
}
