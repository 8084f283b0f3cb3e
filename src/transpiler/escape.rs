//! Escaping of identifiers, expressions and written values.

use crate::ast::{Expr, Func, Operand, Value};
use crate::error::{ForgeError, ForgeResult};
use crate::parser::parse_identifier;
use crate::policy::KEY_SENTINEL;
use crate::transpiler::context::{Scope, TranslateContext};
use crate::transpiler::dml::select::build_select;

/// Quote an identifier string part by part, keeping `distinct ` and
/// ` as alias` forms.
pub fn escape_identifier(ctx: &TranslateContext<'_>, identifier: &str) -> ForgeResult<String> {
    let ident = parse_identifier(identifier)?;
    let g = ctx.generator;

    let mut sql = String::new();
    if ident.distinct {
        sql.push_str("distinct ");
    }
    let path: Vec<String> = ident.path.iter().map(|p| g.quote_identifier(p)).collect();
    sql.push_str(&path.join("."));
    if let Some(alias) = &ident.alias {
        sql.push_str(" as ");
        sql.push_str(&g.quote_identifier(alias));
    }
    Ok(sql)
}

/// Render an expression in place. Columns are quoted only; transform
/// rewriting is decided by the callers that know the column's role.
pub fn escape_expr(ctx: &mut TranslateContext<'_>, scope: &Scope<'_>, expr: &Expr) -> ForgeResult<String> {
    match expr {
        Expr::Column(name) => escape_identifier(ctx, name),
        Expr::Raw(sql) => Ok(escape_raw(ctx, sql)),
        Expr::Func(func) => escape_function(ctx, scope, func),
        Expr::Bind(value) => Ok(ctx.bind(value.clone())),
        Expr::Subquery(select) => {
            let sub = ctx.nested(|ctx| build_select(select, ctx))?;
            Ok(format!("({})", sub))
        }
    }
}

/// Raw SQL goes out verbatim, except that each key sentinel becomes a
/// placeholder with the key bound.
pub fn escape_raw(ctx: &mut TranslateContext<'_>, sql: &str) -> String {
    let mut parts = sql.split(KEY_SENTINEL);
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        out.push_str(&ctx.bind_key());
        out.push_str(part);
    }
    out
}

/// `convert(aes_decrypt(column, ?) using utf8)` with the key bound.
pub fn decrypt_column(ctx: &mut TranslateContext<'_>, column: &str) -> ForgeResult<String> {
    let escaped = escape_identifier(ctx, column)?;
    let key = ctx.bind_key();
    Ok(ctx.generator.decrypt(&escaped, &key))
}

/// A column in a comparing or sorting position: output aliases are left
/// alone, other bare names get the field prefix and, when stored
/// transformed, are decrypted. The flag reports the decryption.
pub fn escape_target(
    ctx: &mut TranslateContext<'_>,
    scope: &Scope<'_>,
    expr: &Expr,
) -> ForgeResult<(String, bool)> {
    match expr {
        Expr::Column(name) if scope.is_output_alias(name) => Ok((escape_identifier(ctx, name)?, false)),
        Expr::Column(name) => {
            let qualified = scope.qualify(name);
            if ctx.requires_transform(scope, &qualified) {
                Ok((decrypt_column(ctx, &qualified)?, true))
            } else {
                Ok((escape_identifier(ctx, &qualified)?, false))
            }
        }
        other => Ok((escape_expr(ctx, scope, other)?, false)),
    }
}

/// Function argument: transformed columns are decrypted in place.
fn escape_argument(ctx: &mut TranslateContext<'_>, scope: &Scope<'_>, arg: &Expr) -> ForgeResult<String> {
    match arg {
        Expr::Column(name) if ctx.requires_transform(scope, name) => decrypt_column(ctx, name),
        other => escape_expr(ctx, scope, other),
    }
}

fn first_argument<'f>(func: &'f Func) -> ForgeResult<&'f Expr> {
    func.args
        .first()
        .ok_or_else(|| ForgeError::untranslatable(format!("{}() needs an argument", func.name)))
}

/// The date format of `str_to_date` / `from_unixtime`, written as plain text.
fn format_text<'f>(func: &Func, format: &'f Expr) -> ForgeResult<&'f str> {
    match format {
        Expr::Column(text) | Expr::Raw(text) => Ok(text),
        Expr::Bind(Value::String(text)) => Ok(text),
        other => Err(ForgeError::untranslatable(format!(
            "{} format must be text, got {}",
            func.name, other
        ))),
    }
}

/// `name(arg, ...)`, with overrides for the functions MySQL spells
/// differently.
pub fn escape_function(ctx: &mut TranslateContext<'_>, scope: &Scope<'_>, func: &Func) -> ForgeResult<String> {
    match func.name.to_ascii_lowercase().as_str() {
        "aes_decrypt" => {
            let column = escape_expr(ctx, scope, first_argument(func)?)?;
            let key = ctx.bind_key();
            Ok(ctx.generator.decrypt(&column, &key))
        }
        "aes_encrypt" => {
            let value = escape_expr(ctx, scope, first_argument(func)?)?;
            let key = ctx.bind_key();
            Ok(ctx.generator.encrypt(&value, &key))
        }
        "group_concat" => {
            if func.args.len() != 1 {
                return Err(ForgeError::untranslatable(format!(
                    "group_concat expects exactly one argument, got {}; pass distinct, order by and separator as options",
                    func.args.len()
                )));
            }
            let options = func.options.clone().unwrap_or_default();
            let mut sql = format!("{}(", func.name);
            if options.distinct {
                sql.push_str("distinct ");
            }
            sql.push_str(&escape_argument(ctx, scope, &func.args[0])?);
            if let Some((column, direction)) = &options.order_by {
                let (order, _) = escape_target(ctx, scope, &Expr::Column(column.clone()))?;
                sql.push_str(&format!(" order by {} {}", order, direction));
            }
            if let Some(separator) = &options.separator {
                sql.push_str(" separator ");
                sql.push_str(&ctx.generator.string_literal(separator));
            }
            sql.push(')');
            Ok(sql)
        }
        "str_to_date" | "from_unixtime" => {
            let value = escape_argument(ctx, scope, first_argument(func)?)?;
            match func.args.get(1) {
                Some(format) => {
                    let format = format_text(func, format)?;
                    Ok(format!(
                        "{}({}, {})",
                        func.name,
                        value,
                        ctx.generator.string_literal(format)
                    ))
                }
                None => Ok(format!("{}({})", func.name, value)),
            }
        }
        "cast" => {
            let value = escape_argument(ctx, scope, first_argument(func)?)?;
            let target = match func.args.get(1) {
                Some(Expr::Raw(ty)) => ty.as_str(),
                Some(other) => {
                    return Err(ForgeError::untranslatable(format!(
                        "cast target type must be raw SQL, got {}",
                        other
                    )));
                }
                None => "signed",
            };
            Ok(format!("{}({} as {})", func.name, value, target))
        }
        _ => {
            let args = func
                .args
                .iter()
                .map(|arg| escape_argument(ctx, scope, arg))
                .collect::<ForgeResult<Vec<_>>>()?;
            Ok(format!("{}({})", func.name, args.join(", ")))
        }
    }
}

/// A value written by insert or update into `column`; transformed columns
/// are encrypted with the key bound after the value.
pub fn write_value(
    ctx: &mut TranslateContext<'_>,
    scope: &Scope<'_>,
    column: &str,
    value: &Operand,
) -> ForgeResult<String> {
    let rendered = match value {
        Operand::Value(v) => ctx.bind(v.clone()),
        Operand::Expr(e) => escape_expr(ctx, scope, e)?,
        Operand::List(_) => {
            return Err(ForgeError::untranslatable(format!(
                "list given as value for column \"{}\", serialize it first",
                column
            )));
        }
    };
    if ctx.requires_transform(scope, column) {
        let key = ctx.bind_key();
        return Ok(ctx.generator.encrypt(&rendered, &key));
    }
    Ok(rendered)
}

/// `"null"` under `is` / `is not` is the keyword, not a bound string.
pub fn compare_value(ctx: &mut TranslateContext<'_>, operator: &str, value: &Value) -> String {
    let op = operator.trim();
    if value.is_null_like() && (op.eq_ignore_ascii_case("is") || op.eq_ignore_ascii_case("is not")) {
        return "null".to_string();
    }
    ctx.bind(value.clone())
}
