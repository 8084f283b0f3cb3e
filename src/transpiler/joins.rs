//! Join compilation.

use crate::ast::{Join, JoinClause, JoinCondition, OnCondition};
use crate::error::ForgeResult;
use crate::transpiler::conditions::build_body;
use crate::transpiler::context::{Scope, TranslateContext};
use crate::transpiler::escape::escape_expr;
use crate::transpiler::table::resolve_table;

/// ` left join table as t on ( ... )` for every join, in order.
pub fn build_joins(ctx: &mut TranslateContext<'_>, scope: &Scope<'_>, joins: &[Join]) -> ForgeResult<String> {
    let mut sql = String::new();
    for join in joins {
        let source = resolve_table(ctx, &join.source, None, true)?;
        let condition = match &join.condition {
            JoinCondition::On {
                local,
                operator,
                reference,
            } => {
                let local = escape_expr(ctx, scope, local)?;
                let reference = escape_expr(ctx, scope, reference)?;
                format!("{} {} {}", local, operator, reference)
            }
            JoinCondition::Clause(clause) => build_clause(ctx, scope, clause)?,
        };
        sql.push_str(&format!(" {} join {} on ( {} )", join.kind, source, condition));
    }
    Ok(sql)
}

/// The `on` chain, then any inline where filters joined with `and`.
fn build_clause(ctx: &mut TranslateContext<'_>, scope: &Scope<'_>, clause: &JoinClause) -> ForgeResult<String> {
    let mut sql = build_ons(ctx, scope, &clause.ons)?;
    if !clause.wheres.is_empty() {
        let filters = build_body(ctx, scope, &clause.wheres.entries)?;
        if sql.is_empty() {
            sql = filters;
        } else {
            sql.push_str(" and ");
            sql.push_str(&filters);
        }
    }
    Ok(sql)
}

/// The first conjunction is dropped; groups are always parenthesized.
fn build_ons(ctx: &mut TranslateContext<'_>, scope: &Scope<'_>, ons: &[OnCondition]) -> ForgeResult<String> {
    let mut parts = Vec::with_capacity(ons.len());
    for (i, on) in ons.iter().enumerate() {
        let (conjunction, rendered) = match on {
            OnCondition::Leaf {
                conjunction,
                local,
                operator,
                reference,
            } => {
                let local = escape_expr(ctx, scope, local)?;
                let reference = escape_expr(ctx, scope, reference)?;
                (conjunction, format!("{} {} {}", local, operator, reference))
            }
            OnCondition::Group { conjunction, clause } => {
                (conjunction, format!("( {} )", build_clause(ctx, scope, clause)?))
            }
        };
        if i == 0 {
            parts.push(rendered);
        } else {
            parts.push(format!("{} {}", conjunction, rendered));
        }
    }
    Ok(parts.join(" "))
}
