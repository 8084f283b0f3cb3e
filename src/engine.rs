//! MySQL execution engine.
//!
//! Runs translated statements against a sqlx MySQL pool and hands rows
//! back as JSON objects, ready for [`crate::shape`].
//!
//! ```rust,ignore
//! let engine = Engine::connect("mysql://localhost/app", 5).await?;
//! let users = engine
//!     .fetch_all(&Select::table("users").where_eq("active", 1).into())
//!     .await?;
//! ```

use std::sync::Arc;

use serde_json::{Map, Number, Value as JsonValue};
use sqlx::mysql::{MySqlArguments, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, Row, TypeInfo};
use tracing::debug;

use crate::ast::{QueryBuilder, Select, Statement, Value};
use crate::config::Config;
use crate::error::{ForgeError, ForgeResult};
use crate::shape::{ResultShape, Shaped};
use crate::transpiler::{Translated, Translator};

/// A pool plus the translator used for every statement run through it.
#[derive(Clone)]
pub struct Engine {
    pool: MySqlPool,
    translator: Arc<Translator>,
}

impl Engine {
    /// Connect with the default translator (no column transforms).
    pub async fn connect(url: &str, max_connections: u32) -> ForgeResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| ForgeError::Connection(e.to_string()))?;

        Ok(Self {
            pool,
            translator: Arc::new(Translator::default()),
        })
    }

    /// Connect using the database section and encryption policy of `config`.
    pub async fn from_config(config: &Config) -> ForgeResult<Self> {
        let url = config
            .database
            .url
            .as_deref()
            .ok_or_else(|| ForgeError::Config("no database url configured".to_string()))?;
        let engine = Self::connect(url, config.database.max_connections).await?;
        Ok(engine.with_translator(Translator::with_policy(config.transform_policy())))
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = Arc::new(translator);
        self
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Translate and fetch all rows.
    pub async fn fetch_all(&self, statement: &Statement) -> ForgeResult<Vec<JsonValue>> {
        let translated = self.translator.translate(statement)?;
        self.fetch_sql(&translated).await
    }

    /// Fetch a select and apply its forward key / grouping.
    pub async fn fetch_shaped(&self, select: &Select) -> ForgeResult<Shaped> {
        let shape = ResultShape::from_select(select);
        let rows = self.fetch_all(&Statement::Select(select.clone())).await?;
        shape.apply(rows)
    }

    /// Fetch at most one row.
    pub async fn fetch_one(&self, select: &Select) -> ForgeResult<Option<JsonValue>> {
        let select = select.clone().limit(1);
        Ok(self.fetch_shaped(&select).await?.first())
    }

    /// Run insert/update/delete and friends, returning affected rows.
    pub async fn execute(&self, statement: &Statement) -> ForgeResult<u64> {
        let translated = self.translator.translate(statement)?;
        self.execute_sql(&translated).await
    }

    /// Fetch rows for already translated SQL.
    pub async fn fetch_sql(&self, translated: &Translated) -> ForgeResult<Vec<JsonValue>> {
        debug!(sql = %translated.sql, params = translated.params.len(), "fetching");
        let rows = bind_all(&translated.sql, &translated.params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ForgeError::Execution(e.to_string()))?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    pub async fn execute_sql(&self, translated: &Translated) -> ForgeResult<u64> {
        debug!(sql = %translated.sql, params = translated.params.len(), "executing");
        let result = bind_all(&translated.sql, &translated.params)
            .execute(&self.pool)
            .await
            .map_err(|e| ForgeError::Execution(e.to_string()))?;
        Ok(result.rows_affected())
    }
}

fn bind_all<'q>(sql: &'q str, params: &'q [Value]) -> Query<'q, MySql, MySqlArguments> {
    params.iter().fold(sqlx::query(sql), bind_value)
}

fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &'q Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Int(i) => query.bind(*i),
        Value::Float(f) => query.bind(*f),
        Value::DateTime(dt) => query.bind(*dt),
        Value::String(s) => query.bind(s.as_str()),
    }
}

/// Decode a row column by column, following the MySQL type name. Values
/// that fail to decode become null.
fn row_to_json(row: &MySqlRow) -> JsonValue {
    let mut map = Map::new();

    for (i, column) in row.columns().iter().enumerate() {
        let type_name = column.type_info().name();

        let value = match type_name {
            "BOOLEAN" => row
                .try_get::<bool, _>(i)
                .map(JsonValue::Bool)
                .unwrap_or(JsonValue::Null),
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
                .try_get::<Option<i64>, _>(i)
                .ok()
                .flatten()
                .map(|v| JsonValue::Number(v.into()))
                .unwrap_or(JsonValue::Null),
            t if t.ends_with("UNSIGNED") => row
                .try_get::<Option<u64>, _>(i)
                .ok()
                .flatten()
                .map(|v| JsonValue::Number(v.into()))
                .unwrap_or(JsonValue::Null),
            "FLOAT" | "DOUBLE" => row
                .try_get::<Option<f64>, _>(i)
                .ok()
                .flatten()
                .and_then(Number::from_f64)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            "DATETIME" | "TIMESTAMP" => row
                .try_get::<Option<chrono::NaiveDateTime>, _>(i)
                .ok()
                .flatten()
                .map(|v| JsonValue::String(v.to_string()))
                .unwrap_or(JsonValue::Null),
            "DATE" => row
                .try_get::<Option<chrono::NaiveDate>, _>(i)
                .ok()
                .flatten()
                .map(|v| JsonValue::String(v.to_string()))
                .unwrap_or(JsonValue::Null),
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
                .try_get::<Option<Vec<u8>>, _>(i)
                .ok()
                .flatten()
                .map(|v| JsonValue::String(String::from_utf8_lossy(&v).into_owned()))
                .unwrap_or(JsonValue::Null),
            // DECIMAL, TIME, JSON and the text family come back as text
            _ => row
                .try_get_unchecked::<Option<String>, _>(i)
                .ok()
                .flatten()
                .map(JsonValue::String)
                .unwrap_or(JsonValue::Null),
        };

        map.insert(column.name().to_string(), value);
    }

    JsonValue::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_bad_url() {
        let err = Engine::connect("not a url", 1).await.err().unwrap();
        assert!(matches!(err, ForgeError::Connection(_)));
    }

    #[tokio::test]
    async fn test_from_config_requires_url() {
        let err = Engine::from_config(&Config::default()).await.err().unwrap();
        assert!(matches!(err, ForgeError::Config(_)));
    }
}
