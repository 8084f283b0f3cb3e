//! Where/having tree compilation.

use crate::ast::{Condition, ConditionTree, Expr, Operand};
use crate::error::{ForgeError, ForgeResult};
use crate::transpiler::context::{Scope, TranslateContext};
use crate::transpiler::escape::{compare_value, escape_expr, escape_target};

/// ` where a = ? and ( b = ? or c = ? )`; an empty tree renders nothing.
pub fn build_conditions(
    ctx: &mut TranslateContext<'_>,
    scope: &Scope<'_>,
    tree: &ConditionTree,
) -> ForgeResult<String> {
    if tree.is_empty() {
        return Ok(String::new());
    }
    let body = build_body(ctx, scope, &tree.entries)?;
    Ok(format!(" {} {}", tree.clause, body))
}

/// Entries joined by their conjunctions, without the leading keyword.
/// Nested groups are parenthesized only when they hold more than one entry.
pub fn build_body(
    ctx: &mut TranslateContext<'_>,
    scope: &Scope<'_>,
    entries: &[Condition],
) -> ForgeResult<String> {
    let mut parts = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let rendered = match entry {
            Condition::Leaf {
                target,
                operator,
                value,
                ..
            } => build_leaf(ctx, scope, target, operator, value)?,
            Condition::Group { tree, .. } => {
                let inner = build_body(ctx, scope, &tree.entries)?;
                if tree.len() > 1 {
                    format!("( {} )", inner)
                } else {
                    inner
                }
            }
        };
        if i == 0 {
            parts.push(rendered);
        } else {
            parts.push(format!("{} {}", entry.conjunction(), rendered));
        }
    }
    Ok(parts.join(" "))
}

fn build_leaf(
    ctx: &mut TranslateContext<'_>,
    scope: &Scope<'_>,
    target: &Expr,
    operator: &str,
    value: &Operand,
) -> ForgeResult<String> {
    let (target, _) = escape_target(ctx, scope, target)?;
    let value = match value {
        Operand::Value(v) => compare_value(ctx, operator, v),
        Operand::List(values) if operator.trim().eq_ignore_ascii_case("between") => {
            match values.as_slice() {
                [low, high] => {
                    let low = ctx.bind(low.clone());
                    let high = ctx.bind(high.clone());
                    format!("{} and {}", low, high)
                }
                _ => {
                    return Err(ForgeError::untranslatable(format!(
                        "between on {} needs exactly two values, got {}",
                        target,
                        values.len()
                    )));
                }
            }
        }
        Operand::List(values) => {
            if values.is_empty() {
                return Err(ForgeError::untranslatable(format!(
                    "empty value list for {} {}",
                    target, operator
                )));
            }
            let placeholders: Vec<String> = values.iter().map(|v| ctx.bind(v.clone())).collect();
            format!("({})", placeholders.join(", "))
        }
        Operand::Expr(expr) => escape_expr(ctx, scope, expr)?,
    };
    Ok(format!("{} {} {}", target, operator, value))
}
