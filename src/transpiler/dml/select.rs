//! SELECT and EXISTS SQL generation.

use crate::ast::cmd::Order;
use crate::ast::{Expr, Field, Select};
use crate::error::ForgeResult;
use crate::parser::parse_identifier;
use crate::transpiler::conditions::build_conditions;
use crate::transpiler::context::{Scope, TranslateContext};
use crate::transpiler::escape::{decrypt_column, escape_expr, escape_identifier, escape_target};
use crate::transpiler::joins::build_joins;
use crate::transpiler::table::resolve_table;

/// Generate SELECT SQL.
pub fn build_select(select: &Select, ctx: &mut TranslateContext<'_>) -> ForgeResult<String> {
    let base = &select.base;
    let scope = Scope::for_base(base, select.output_aliases().collect())?;

    let mut sql = String::from(if select.distinct {
        "select distinct "
    } else {
        "select "
    });

    if select.fields.is_empty() {
        sql.push('*');
    } else {
        let fields = select
            .fields
            .iter()
            .map(|field| build_field(ctx, &scope, field))
            .collect::<ForgeResult<Vec<_>>>()?;
        sql.push_str(&fields.join(", "));
    }

    if let Some(table) = &base.table {
        sql.push_str(" from ");
        sql.push_str(&resolve_table(ctx, table, base.database.as_deref(), true)?);
    }

    sql.push_str(&build_joins(ctx, &scope, &base.joins)?);
    sql.push_str(&build_conditions(ctx, &scope, &base.wheres)?);

    if !select.groups.is_empty() {
        let groups = select
            .groups
            .iter()
            .map(|g| escape_target(ctx, &scope, g).map(|(text, _)| text))
            .collect::<ForgeResult<Vec<_>>>()?;
        sql.push_str(" group by ");
        sql.push_str(&groups.join(", "));
    }

    sql.push_str(&build_conditions(ctx, &scope, &select.havings)?);
    sql.push_str(&build_orders(ctx, &scope, &base.orders)?);
    sql.push_str(&ctx.generator.limit_offset(base.limit, base.offset));

    Ok(sql)
}

/// `select exists(<select>) as exists`
pub fn build_exists(select: &Select, ctx: &mut TranslateContext<'_>) -> ForgeResult<String> {
    let sub = ctx.nested(|ctx| build_select(select, ctx))?;
    Ok(format!(
        "select exists({}) as {}",
        sub,
        ctx.generator.quote_identifier("exists")
    ))
}

/// A transformed column is decrypted and keeps its name (or explicit
/// alias) as the result column.
fn build_field(ctx: &mut TranslateContext<'_>, scope: &Scope<'_>, field: &Field) -> ForgeResult<String> {
    let (expr, alias) = match &field.expr {
        Expr::Column(name) => {
            let qualified = scope.qualify(name);
            if ctx.requires_transform(scope, &qualified) {
                let alias = match &field.alias {
                    Some(alias) => alias.clone(),
                    None => parse_identifier(&qualified)?.name().to_string(),
                };
                (decrypt_column(ctx, &qualified)?, Some(alias))
            } else {
                (escape_identifier(ctx, &qualified)?, field.alias.clone())
            }
        }
        other => (escape_expr(ctx, scope, other)?, field.alias.clone()),
    };
    Ok(match alias {
        Some(alias) => format!("{} as {}", expr, ctx.generator.quote_identifier(&alias)),
        None => expr,
    })
}

/// ` order by a asc, b desc`; decrypted columns sort case-insensitively.
pub fn build_orders(ctx: &mut TranslateContext<'_>, scope: &Scope<'_>, orders: &[Order]) -> ForgeResult<String> {
    if orders.is_empty() {
        return Ok(String::new());
    }
    let mut parts = Vec::with_capacity(orders.len());
    for order in orders {
        let (mut column, transformed) = escape_target(ctx, scope, &order.expr)?;
        if transformed {
            column.push_str(" collate ");
            column.push_str(ctx.generator.case_insensitive_collation());
        }
        parts.push(format!("{} {}", column, order.direction));
    }
    Ok(format!(" order by {}", parts.join(", ")))
}
