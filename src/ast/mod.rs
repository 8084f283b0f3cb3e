pub mod builders;
pub mod cmd;
pub mod conditions;
pub mod expr;
pub mod joins;
pub mod operators;
pub mod table;
pub mod values;

pub use self::builders::{Filter, QueryBuilder};
pub use self::cmd::{Delete, Field, Insert, Order, QueryBase, Select, Statement, TableStatement, Update};
pub use self::conditions::{Condition, ConditionTree};
pub use self::expr::{ConcatOptions, Expr, Func, bind, col, func, raw};
pub use self::joins::{Join, JoinClause, JoinCondition, OnCondition};
pub use self::operators::{Clause, Conjunction, JoinKind, SortDirection};
pub use self::table::{AliasMap, TableRef};
pub use self::values::{Operand, Value};
