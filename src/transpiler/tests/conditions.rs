//! Where/having tree tests.

use pretty_assertions::assert_eq;

use crate::ast::*;
use crate::transpiler::ToSql;

#[test]
fn test_single_entry_group_is_inlined() {
    let out = Select::table("t")
        .where_eq("a", 1)
        .where_group(|g| g.where_eq("x", 2))
        .to_sql()
        .unwrap();
    assert_eq!(out.sql, "select * from `t` where `a` = ? and `x` = ?");
    assert_eq!(out.params, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_multi_entry_group_is_parenthesized() {
    let out = Select::table("t")
        .where_eq("a", 1)
        .where_group(|g| g.where_eq("x", 2).or_where_eq("y", 3))
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        "select * from `t` where `a` = ? and ( `x` = ? or `y` = ? )"
    );
    assert_eq!(out.params, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_or_group_and_deep_nesting() {
    let out = Select::table("t")
        .where_eq("a", 1)
        .or_where_group(|g| {
            g.where_eq("b", 2)
                .where_group(|inner| inner.where_eq("c", 3).or_where_eq("d", 4))
        })
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        "select * from `t` where `a` = ? or ( `b` = ? and ( `c` = ? or `d` = ? ) )"
    );
}

#[test]
fn test_first_condition_conjunction_ignored() {
    let out = Select::table("t").or_where_eq("a", 1).to_sql().unwrap();
    assert_eq!(out.sql, "select * from `t` where `a` = ?");
}

#[test]
fn test_where_in_dedupes() {
    let out = Select::table("t")
        .where_in("id", vec![1, 2, 2, 3])
        .to_sql()
        .unwrap();
    assert_eq!(out.sql, "select * from `t` where `id` in (?, ?, ?)");
    assert_eq!(out.params, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_where_in_empty_is_noop() {
    let out = Select::table("t")
        .where_in::<i64>("id", vec![])
        .where_not_in::<i64>("id", vec![])
        .to_sql()
        .unwrap();
    assert_eq!(out.sql, "select * from `t`");
    assert!(out.params.is_empty());
}

#[test]
fn test_between() {
    let out = Select::table("people")
        .where_between("age", 18, 30)
        .to_sql()
        .unwrap();
    assert_eq!(out.sql, "select * from `people` where `age` between ? and ?");
    assert_eq!(out.params, vec![Value::Int(18), Value::Int(30)]);
}

#[test]
fn test_null_helpers() {
    let out = Select::table("t")
        .where_null("deleted_at")
        .or_where_not_null("restored_at")
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        "select * from `t` where `deleted_at` is NULL or `restored_at` is not NULL"
    );
    assert!(out.params.is_empty());
}

#[test]
fn test_null_string_under_is_becomes_keyword() {
    let out = Select::table("t")
        .filter("deleted_at", "is", "null")
        .filter("name", "=", "null")
        .to_sql()
        .unwrap();
    assert_eq!(out.sql, "select * from `t` where `deleted_at` is null and `name` = ?");
    assert_eq!(out.params, vec![Value::from("null")]);
}

#[test]
fn test_operator_passthrough_and_raw_value() {
    let out = Select::table("t")
        .filter("name", "like", "%a%")
        .filter("created", ">", raw("NOW()"))
        .to_sql()
        .unwrap();
    assert_eq!(out.sql, "select * from `t` where `name` like ? and `created` > NOW()");
    assert_eq!(out.params, vec![Value::from("%a%")]);
}

#[test]
fn test_function_target() {
    let out = Select::table("users")
        .filter(func("lower", ["name"]), "=", "bob")
        .to_sql()
        .unwrap();
    assert_eq!(out.sql, "select * from `users` where lower(`name`) = ?");
}

#[test]
fn test_subquery_value_keeps_param_order() {
    let sub = Select::table("orders").fields("user_id").where_eq("total", 5);
    let out = Select::table("users")
        .where_eq("active", 1)
        .filter("id", "in", sub)
        .where_eq("role", "admin")
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        "select * from `users` where `active` = ? and `id` in (select `user_id` from `orders` where `total` = ?) and `role` = ?"
    );
    assert_eq!(
        out.params,
        vec![Value::Int(1), Value::Int(5), Value::from("admin")]
    );
}

#[test]
fn test_where_map() {
    let out = Select::table("t")
        .where_eq("z", 0)
        .where_map([("a", 1), ("b", 2)])
        .to_sql()
        .unwrap();
    assert_eq!(out.sql, "select * from `t` where `z` = ? and ( `a` = ? and `b` = ? )");

    let single = Select::table("t").where_map([("a", 1)]).to_sql().unwrap();
    assert_eq!(single.sql, "select * from `t` where `a` = ?");
}

#[test]
fn test_filter_as() {
    let out = Select::table("t")
        .where_eq("a", 1)
        .filter_as("or", "b", "=", 2)
        .unwrap()
        .to_sql()
        .unwrap();
    assert_eq!(out.sql, "select * from `t` where `a` = ? or `b` = ?");
}

#[test]
fn test_add_wheres_nests_other_tree() {
    let prepared = Select::table("x").where_eq("a", 1).or_where_eq("b", 2);
    let out = Select::table("users")
        .where_eq("c", 3)
        .add_wheres(&prepared, Conjunction::And)
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        "select * from `users` where `c` = ? and ( `a` = ? or `b` = ? )"
    );
    assert_eq!(out.params, vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_merge_wheres_flat() {
    let prepared = Select::table("x").where_eq("a", 1).or_where_eq("b", 2);
    let out = Select::table("users").merge_wheres(&prepared).to_sql().unwrap();
    assert_eq!(out.sql, "select * from `users` where `a` = ? or `b` = ?");
}

#[test]
fn test_reset_wheres() {
    let out = Select::table("t").where_eq("a", 1).reset_wheres().to_sql().unwrap();
    assert_eq!(out.sql, "select * from `t`");
}

#[test]
fn test_having_group() {
    let out = Select::table("orders")
        .fields("user_id")
        .add_field_sum("amount", Some("spent"))
        .group_by("user_id")
        .having_group(|g| g.where_eq("spent", 10).or_where_eq("spent", 20))
        .having_not_null("user_id")
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        "select `user_id`, sum(`amount`) as `spent` from `orders` group by `user_id` having ( `spent` = ? or `spent` = ? ) and `user_id` is not NULL"
    );
}

#[test]
fn test_output_alias_not_prefixed() {
    let out = Select::table("orders")
        .field_prefix("orders")
        .add_field_count("id", Some("total"))
        .where_eq("status", "paid")
        .having("total", ">", 1)
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        "select count(`id`) as `total` from `orders` where `orders`.`status` = ? having `total` > ?"
    );
}
