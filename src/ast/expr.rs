use serde::{Deserialize, Serialize};

use crate::ast::{Select, SortDirection, Value};

/// Anything that can stand where an identifier stands: select fields,
/// condition targets, function arguments, order and group keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Column or table identifier; may be dotted (`users.id`), aliased
    /// (`id as uid`) or carry a leading `distinct `.
    Column(String),
    /// Verbatim SQL fragment, never escaped.
    Raw(String),
    /// Function call.
    Func(Func),
    /// A literal sent through a placeholder.
    Bind(Value),
    /// Scalar subquery.
    Subquery(Box<Select>),
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Column(name) => write!(f, "{}", name),
            Expr::Raw(sql) => write!(f, "{}", sql),
            Expr::Func(func) => write!(f, "{}(..{})", func.name, func.args.len()),
            Expr::Bind(v) => write!(f, "{}", v),
            Expr::Subquery(_) => write!(f, "(SUBQUERY)"),
        }
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::Column(s.to_string())
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Column(s)
    }
}

impl From<Func> for Expr {
    fn from(f: Func) -> Self {
        Expr::Func(f)
    }
}

impl From<Select> for Expr {
    fn from(s: Select) -> Self {
        Expr::Subquery(Box::new(s))
    }
}

/// A function call node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Func {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Expr>,
    /// Options of multi-value aggregates (`group_concat`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ConcatOptions>,
}

impl Func {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            options: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<Expr>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, E>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn options(mut self, options: ConcatOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// `group_concat([distinct] x [order by y dir] [separator 's'])`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConcatOptions {
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    pub order_by: Option<(String, SortDirection)>,
    #[serde(default)]
    pub separator: Option<String>,
}

impl ConcatOptions {
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some((column.into(), direction));
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }
}

/// Column reference.
pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column(name.into())
}

/// Verbatim SQL, e.g. `raw("NOW()")`.
pub fn raw(sql: impl Into<String>) -> Expr {
    Expr::Raw(sql.into())
}

/// A literal passed through a placeholder wherever an expression is expected.
pub fn bind(value: impl Into<Value>) -> Expr {
    Expr::Bind(value.into())
}

/// Function call with the given arguments.
pub fn func<I, E>(name: &str, args: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::Func(Func::new(name).args(args))
}
