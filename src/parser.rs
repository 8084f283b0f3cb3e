//! Identifier and table-name parsing using nom.
//!
//! Builder strings carry a little structure of their own:
//!
//! ```text
//! distinct users.email as mail      app.users as u      users u
//! ──┬───── ─────┬───── ───┬───      ───┬───── ──┬─      ──┬── ┬
//!   │           │         └ alias      │        └ alias   │   └ alias
//!   │           └ dotted path          └ database.table   └ table
//!   └ optional distinct prefix
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_until},
    character::complete::char,
    combinator::{all_consuming, map, opt, rest},
    multi::separated_list1,
    sequence::separated_pair,
    IResult,
};

use crate::error::{ForgeError, ForgeResult};

/// A parsed column-like identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub distinct: bool,
    pub path: Vec<String>,
    pub alias: Option<String>,
}

impl Identifier {
    /// Last path segment (the column for `table.column`).
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// Table segment for `table.column` or `db.table.column`.
    pub fn table(&self) -> Option<&str> {
        let n = self.path.len();
        (n >= 2).then(|| self.path[n - 2].as_str())
    }
}

/// A parsed table reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    pub database: Option<String>,
    pub name: String,
    pub alias: Option<String>,
}

fn distinct_prefix(input: &str) -> IResult<&str, bool> {
    map(opt(tag("distinct ")), |d| d.is_some())(input)
}

fn split_alias<'a>(separator: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, (&'a str, Option<&'a str>)> {
    alt((
        map(separated_pair(take_until(separator), tag(separator), rest), |(l, r)| {
            (l, Some(r))
        }),
        map(rest, |l| (l, None)),
    ))
}

fn dotted(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(separated_list1(char('.'), take_till(|c| c == '.')))(input)
}

fn path_of(whole: &str, text: &str) -> ForgeResult<Vec<String>> {
    let (_, parts) = dotted(text.trim())
        .map_err(|e| ForgeError::malformed(whole, format!("{:?}", e)))?;
    let parts: Vec<String> = parts.into_iter().map(|p| p.trim().to_string()).collect();
    if parts.iter().any(String::is_empty) {
        return Err(ForgeError::malformed(whole, "empty part after \".\" split"));
    }
    Ok(parts)
}

fn alias_of(whole: &str, alias: Option<&str>) -> ForgeResult<Option<String>> {
    match alias.map(str::trim) {
        None => Ok(None),
        Some("") => Err(ForgeError::malformed(whole, "empty alias after \"as\" split")),
        Some(a) if a.contains(" as ") => {
            Err(ForgeError::malformed(whole, "wrong count after \"as\" split"))
        }
        Some(a) => Ok(Some(a.to_string())),
    }
}

/// `a as`, `as b` or a lone `as`: trimming has eaten one side of the split.
fn dangling_alias(text: &str) -> bool {
    text == "as" || text.ends_with(" as") || text.starts_with("as ")
}

/// Parse `[distinct ]path[.path...][ as alias]`.
pub fn parse_identifier(input: &str) -> ForgeResult<Identifier> {
    let trimmed = input.trim();
    let (remainder, distinct) = distinct_prefix(trimmed)
        .map_err(|e| ForgeError::malformed(input, format!("{:?}", e)))?;
    let remainder = remainder.trim();
    if dangling_alias(remainder) {
        return Err(ForgeError::malformed(input, "empty part after \"as\" split"));
    }
    let (_, (body, alias)) = split_alias(" as ")(remainder)
        .map_err(|e| ForgeError::malformed(input, format!("{:?}", e)))?;

    Ok(Identifier {
        distinct,
        path: path_of(input, body)?,
        alias: alias_of(input, alias)?,
    })
}

/// Parse `[db.]table[ as alias]` or `[db.]table alias`.
pub fn parse_table_name(input: &str) -> ForgeResult<TableName> {
    let trimmed = input.trim();
    if dangling_alias(trimmed) {
        return Err(ForgeError::malformed(input, "empty part after \"as\" split"));
    }
    let (_, (body, alias)) = if trimmed.contains(" as ") {
        split_alias(" as ")(trimmed)
    } else {
        split_alias(" ")(trimmed)
    }
    .map_err(|e| ForgeError::malformed(input, format!("{:?}", e)))?;

    let alias = alias_of(input, alias)?;
    if alias.as_deref().is_some_and(|a| a.contains(' ')) {
        return Err(ForgeError::malformed(input, "wrong count after table \" \" split"));
    }

    let mut path = path_of(input, body)?;
    match path.len() {
        1 => Ok(TableName {
            database: None,
            name: path.remove(0),
            alias,
        }),
        2 => {
            let name = path.remove(1);
            Ok(TableName {
                database: Some(path.remove(0)),
                name,
                alias,
            })
        }
        _ => Err(ForgeError::malformed(input, "wrong count after table \".\" split")),
    }
}

/// Split a comma separated builder argument (`"a, b as c"`).
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_identifier() {
        let id = parse_identifier("email").unwrap();
        assert!(!id.distinct);
        assert_eq!(id.path, vec!["email"]);
        assert_eq!(id.alias, None);
        assert_eq!(id.table(), None);
    }

    #[test]
    fn test_parse_dotted_alias_distinct() {
        let id = parse_identifier("distinct users.email as mail").unwrap();
        assert!(id.distinct);
        assert_eq!(id.path, vec!["users", "email"]);
        assert_eq!(id.alias.as_deref(), Some("mail"));
        assert_eq!(id.table(), Some("users"));
        assert_eq!(id.name(), "email");
    }

    #[test]
    fn test_parse_identifier_errors() {
        assert!(matches!(
            parse_identifier("users..email"),
            Err(ForgeError::MalformedIdentifier { .. })
        ));
        assert!(parse_identifier("a as ").is_err());
        assert!(parse_identifier(" as b").is_err());
        assert!(parse_identifier("distinct as b").is_err());
        assert!(parse_identifier("a as b as c").is_err());
        assert!(parse_table_name("users as ").is_err());
    }

    #[test]
    fn test_parse_table_name() {
        assert_eq!(
            parse_table_name("app.users as u").unwrap(),
            TableName {
                database: Some("app".into()),
                name: "users".into(),
                alias: Some("u".into()),
            }
        );
        assert_eq!(parse_table_name("orders o").unwrap().alias.as_deref(), Some("o"));
        let err = parse_table_name("a.b.c").unwrap_err();
        assert!(err.to_string().contains("wrong count after table"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("id, name as n,, email"), vec!["id", "name as n", "email"]);
    }
}
