use crate::transpiler::traits::SqlGenerator;

/// MySQL Generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlGenerator;

impl MysqlGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl SqlGenerator for MysqlGenerator {
    fn quote_identifier(&self, name: &str) -> String {
        if name == "*" {
            return name.to_string();
        }
        format!("`{}`", name.replace('\0', "").replace('`', "``"))
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        // MySQL has no offset without a row count, so the max count stands in
        match (limit, offset) {
            (None, None) => String::new(),
            (Some(n), None) => format!(" limit {}", n),
            (limit, Some(o)) => format!(" limit {}, {}", o, limit.unwrap_or(u64::MAX)),
        }
    }

    fn limit(&self, limit: u64) -> String {
        format!(" limit {}", limit)
    }

    fn decrypt(&self, column: &str, key: &str) -> String {
        format!("convert(aes_decrypt({}, {}) using utf8)", column, key)
    }

    fn encrypt(&self, value: &str, key: &str) -> String {
        format!("aes_encrypt({}, {})", value, key)
    }

    fn case_insensitive_collation(&self) -> &str {
        "utf8_general_ci"
    }

    fn string_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        let g = MysqlGenerator;
        assert_eq!(g.quote_identifier("users"), "`users`");
        assert_eq!(g.quote_identifier("we`ird\0"), "`we``ird`");
        assert_eq!(g.quote_identifier("*"), "*");
    }

    #[test]
    fn test_limit_offset() {
        let g = MysqlGenerator;
        assert_eq!(g.limit_offset(Some(10), None), " limit 10");
        assert_eq!(g.limit_offset(Some(10), Some(20)), " limit 20, 10");
        assert_eq!(g.limit_offset(None, Some(5)), format!(" limit 5, {}", u64::MAX));
        assert_eq!(g.limit_offset(None, None), "");
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(MysqlGenerator.string_literal("a'b"), "'a''b'");
    }
}
