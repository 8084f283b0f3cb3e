//! Core statement tests (SELECT, INSERT, UPDATE, DELETE and table statements).

use pretty_assertions::assert_eq;

use crate::ast::*;
use crate::transpiler::ToSql;

fn sql_of(t: impl ToSql) -> String {
    t.to_sql().unwrap().sql
}

#[test]
fn test_simple_select() {
    let out = Select::table("users").to_sql().unwrap();
    assert_eq!(out.sql, "select * from `users`");
    assert!(out.params.is_empty());
}

#[test]
fn test_select_where_order_of_params() {
    let out = Select::table("users")
        .where_eq("a", 1)
        .where_eq("b", 2)
        .to_sql()
        .unwrap();
    assert_eq!(out.sql, "select * from `users` where `a` = ? and `b` = ?");
    assert_eq!(out.params, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_select_fields_distinct() {
    let select = Select::table("users").fields("id, name as n").distinct();
    assert_eq!(sql_of(select), "select distinct `id`, `name` as `n` from `users`");
}

#[test]
fn test_select_database_and_alias() {
    let select = Select::table("app.users as u").fields("u.id, u.*");
    assert_eq!(sql_of(select), "select `u`.`id`, `u`.* from `app`.`users` as `u`");

    let select = Select::table("users").database("app");
    assert_eq!(sql_of(select), "select * from `app`.`users`");
}

#[test]
fn test_select_without_table() {
    let select = Select::new().add_field_as(Func::new("now"), "ts");
    assert_eq!(sql_of(select), "select now() as `ts`");
}

#[test]
fn test_limit_only() {
    let select = Select::table("users").limit(10);
    assert_eq!(sql_of(select), "select * from `users` limit 10");
}

#[test]
fn test_limit_with_offset_and_page() {
    let by_offset = Select::table("users").limit_offset(20, 10);
    let by_page = Select::table("users").page(2, 10);
    assert_eq!(sql_of(by_offset), "select * from `users` limit 20, 10");
    assert_eq!(sql_of(by_page), "select * from `users` limit 20, 10");
}

#[test]
fn test_order_by() {
    let select = Select::table("users")
        .order_by("name", SortDirection::Desc)
        .order_by_each([("id", SortDirection::Asc)]);
    assert_eq!(sql_of(select), "select * from `users` order by `name` desc, `id` asc");
}

#[test]
fn test_order_by_expression() {
    let select = Select::table("users").order_by_expr(raw("rand()"), SortDirection::Asc);
    assert_eq!(sql_of(select), "select * from `users` order by rand() asc");
}

#[test]
fn test_group_by_having() {
    let out = Select::table("orders")
        .fields("user_id")
        .add_field_count("id", Some("total"))
        .group_by("user_id")
        .having("total", ">", 5)
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        "select `user_id`, count(`id`) as `total` from `orders` group by `user_id` having `total` > ?"
    );
    assert_eq!(out.params, vec![Value::Int(5)]);
}

#[test]
fn test_aggregate_shortcuts() {
    let select = Select::table("orders")
        .add_field_sum("amount", Some("sum"))
        .add_field_round("price", 2, None);
    assert_eq!(
        sql_of(select),
        "select sum(`amount`) as `sum`, round(`price`, 2) from `orders`"
    );
}

#[test]
fn test_field_prefix() {
    let select = Select::table("users as u")
        .field_prefix("u")
        .fields("id")
        .where_eq("active", 1)
        .order_by("name", SortDirection::Asc);
    assert_eq!(
        sql_of(select),
        "select `u`.`id` from `users` as `u` where `u`.`active` = ? order by `u`.`name` asc"
    );
}

#[test]
fn test_insert() {
    let out = Insert::table("users")
        .values([("name", "bob"), ("email", "bob@example.com")])
        .to_sql()
        .unwrap();
    assert_eq!(out.sql, "insert into `users` (`name`, `email`) values (?, ?)");
    assert_eq!(
        out.params,
        vec![Value::from("bob"), Value::from("bob@example.com")]
    );
}

#[test]
fn test_insert_ignore_multi_row() {
    let insert = Insert::table("app.tags as t")
        .ignore()
        .values([("name", "a")])
        .values([("name", "b")]);
    assert_eq!(sql_of(insert), "insert ignore into `app`.`tags` (`name`) values (?), (?)");
}

#[test]
fn test_insert_rows_follow_first_column_order() {
    let out = Insert::table("users")
        .values([("a", 1), ("b", 2)])
        .values([("b", 4), ("a", 3)])
        .to_sql()
        .unwrap();
    assert_eq!(out.sql, "insert into `users` (`a`, `b`) values (?, ?), (?, ?)");
    assert_eq!(
        out.params,
        vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]
    );
}

#[test]
fn test_replace() {
    let stmt = Insert::table("users").values([("id", 1)]).replace();
    assert_eq!(sql_of(stmt), "replace into `users` (`id`) values (?)");
}

#[test]
fn test_update() {
    let out = Update::table("users")
        .set("name", "x")
        .set("visits", raw("visits + 1"))
        .where_eq("id", 3)
        .limit(1)
        .to_sql()
        .unwrap();
    assert_eq!(
        out.sql,
        "update `users` set `name` = ?, `visits` = visits + 1 where `id` = ? limit 1"
    );
    assert_eq!(out.params, vec![Value::from("x"), Value::Int(3)]);
}

#[test]
fn test_update_ignores_offset() {
    let update = Update::table("users").set("a", 1).limit_offset(5, 10);
    assert_eq!(sql_of(update), "update `users` set `a` = ? limit 10");
}

#[test]
fn test_delete() {
    let delete = Delete::table("sessions")
        .where_eq("user_id", 3)
        .order_by("id", SortDirection::Asc)
        .limit(100);
    assert_eq!(
        sql_of(delete),
        "delete from `sessions` where `user_id` = ? order by `id` asc limit 100"
    );
}

#[test]
fn test_delete_targets() {
    let delete = Delete::table("users as u")
        .targets("u, o")
        .left_join("orders as o", "o.user_id", "=", "u.id")
        .where_null("o.id");
    assert_eq!(
        sql_of(delete),
        "delete `u`, `o` from `users` as `u` left join `orders` as `o` on ( `o`.`user_id` = `u`.`id` ) where `o`.`id` is NULL"
    );
}

#[test]
fn test_table_statements() {
    assert_eq!(sql_of(Statement::drop("sessions")), "drop table `sessions`;");
    assert_eq!(
        sql_of(Statement::Truncate(TableStatement::new("logs").database("app"))),
        "truncate table `app`.`logs`;"
    );
    assert_eq!(sql_of(Statement::show("users as u")), "show columns from `users`;");
}

#[test]
fn test_exists() {
    let out = Select::table("users").where_eq("id", 1).exists().to_sql().unwrap();
    assert_eq!(
        out.sql,
        "select exists(select * from `users` where `id` = ?) as `exists`"
    );
    assert_eq!(out.params, vec![Value::Int(1)]);
}

#[test]
fn test_identifier_quoting() {
    let select = Select::table("we`ird").fields("na`me");
    assert_eq!(sql_of(select), "select `na``me` from `we``ird`");
}

#[test]
fn test_translator_reuse_starts_fresh() {
    let translator = crate::transpiler::Translator::new();
    let stmt: Statement = Select::table("users").where_eq("id", 1).into();
    let first = translator.translate(&stmt).unwrap();
    let second = translator.translate(&stmt).unwrap();
    assert_eq!(first, second);
    assert_eq!(second.params.len(), 1);
}
