//! JSON statements through config, policy, translator and shaping.

use pretty_assertions::assert_eq;
use serde_json::json;
use sqlforge::prelude::*;

const CONFIG: &str = r#"
[database]
url = "mysql://app@localhost/app"

[encryption]
active = true
key = "secret-key"
[encryption.tables]
users = ["email"]
"#;

fn translator() -> Translator {
    let config = Config::from_toml(CONFIG).unwrap();
    Translator::with_policy(config.transform_policy())
}

#[test]
fn translate_json_select_with_configured_policy() {
    let statement = Statement::from_json(
        r#"{
            "kind": "select",
            "table": "users as u",
            "fields": [
                {"expr": {"column": "u.id"}},
                {"expr": {"column": "u.email"}, "alias": "mail"}
            ],
            "wheres": {
                "clause": "where",
                "entries": [
                    {"conjunction": "where", "target": {"column": "u.active"}, "operator": "=", "value": 1},
                    {"conjunction": "and", "target": {"column": "u.id"}, "operator": "in", "value": [1, 2]}
                ]
            },
            "limit": 10
        }"#,
    )
    .unwrap();

    let out = translator().translate(&statement).unwrap();
    assert_eq!(
        out.sql,
        "select `u`.`id`, convert(aes_decrypt(`u`.`email`, ?) using utf8) as `mail` from `users` as `u` \
         where `u`.`active` = ? and `u`.`id` in (?, ?) limit 10"
    );
    assert_eq!(
        out.params,
        vec![
            Value::from("secret-key"),
            Value::Int(1),
            Value::Int(1),
            Value::Int(2)
        ]
    );
}

#[test]
fn translate_json_insert_encrypts() {
    let statement = Statement::from_json(
        r#"{
            "kind": "insert",
            "table": "users",
            "rows": [[["name", "bob"], ["email", "bob@example.com"]]]
        }"#,
    )
    .unwrap();

    let out = translator().translate(&statement).unwrap();
    assert_eq!(
        out.sql,
        "insert into `users` (`name`, `email`) values (?, aes_encrypt(?, ?))"
    );
    assert_eq!(
        out.params,
        vec![
            Value::from("bob"),
            Value::from("bob@example.com"),
            Value::from("secret-key")
        ]
    );
}

#[test]
fn built_statement_survives_json() {
    let built: Statement = Select::table("orders as o")
        .inner_join("users as u", "u.id", "=", "o.user_id")
        .where_group(|g| g.where_eq("o.status", "paid").or_where_null("o.paid_at"))
        .order_by("o.id", SortDirection::Desc)
        .page(1, 20)
        .into();

    let decoded = Statement::from_json(&built.to_json().unwrap()).unwrap();
    assert_eq!(decoded, built);

    let out = sqlforge::translate(&decoded).unwrap();
    assert_eq!(
        out.sql,
        "select * from `orders` as `o` inner join `users` as `u` on ( `u`.`id` = `o`.`user_id` ) \
         where ( `o`.`status` = ? or `o`.`paid_at` is NULL ) order by `o`.`id` desc limit 20, 20"
    );
}

#[test]
fn unknown_statement_kind_is_translation_error() {
    let err = Statement::from_json(r#"{"kind": "merge"}"#).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Translation);
    assert_eq!(err.to_string(), "Unknown statement kind. Cannot translate: merge");

    let err = Statement::from_json(r#"{"table": "users"}"#).unwrap_err();
    assert!(matches!(err, ForgeError::UnknownStatement(_)));
}

#[test]
fn shaping_follows_select_settings() {
    let select = Select::table("users").forward_key("id").group_results("team");
    let shape = ResultShape::from_select(&select);

    let rows = vec![
        json!({"id": 1, "team": "red"}),
        json!({"id": 2, "team": "blue"}),
        json!({"id": 3, "team": "red"}),
    ];
    let shaped = shape.apply(rows).unwrap();
    assert_eq!(
        shaped.into_json(),
        json!({
            "red": {"1": {"id": 1, "team": "red"}, "3": {"id": 3, "team": "red"}},
            "blue": {"2": {"id": 2, "team": "blue"}}
        })
    );
}

#[test]
fn shaping_reports_missing_key() {
    let shape = ResultShape::new().group_by("team");
    let err = shape.apply(vec![json!({"id": 1})]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ResultShape);
}
