//! SQL identifier validation.
//!
//! Table names, column names and aliases are single identifiers. Qualification
//! (`catalog.schema.table`, `alias.column`) is added by the renderer, never by
//! the caller, so a dot inside a name is rejected.
//!
//! - Unquoted names are validated against: `[A-Za-z_][A-Za-z0-9_$]*`
//! - Quoted names (`"Order Items"`) allow any characters except NUL; `""` escapes `"`

use crate::error::{SqlError, SqlResult};

/// A validated SQL identifier, stored exactly as it is written in SQL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    /// Parse a single identifier.
    pub fn parse(s: &str) -> SqlResult<Self> {
        if s.is_empty() {
            return Err(SqlError::identifier("Identifier cannot be empty"));
        }
        if s.contains('\0') {
            return Err(SqlError::identifier(
                "Identifier cannot contain NUL character",
            ));
        }

        if let Some(rest) = s.strip_prefix('"') {
            validate_quoted(rest)?;
        } else {
            validate_unquoted(s)?;
        }

        Ok(Self(s.to_string()))
    }

    /// Parse a column name, which may also be the `*` wildcard.
    pub fn column(s: &str) -> SqlResult<Self> {
        if s == "*" {
            return Ok(Self(s.to_string()));
        }
        Self::parse(s)
    }

    pub(crate) fn wildcard() -> Self {
        Self("*".to_string())
    }

    /// The identifier as written in SQL.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_unquoted(s: &str) -> SqlResult<()> {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        Some(c) => {
            return Err(SqlError::identifier(format!(
                "Invalid identifier start character: '{c}'"
            )));
        }
        None => return Err(SqlError::identifier("Identifier cannot be empty")),
    }
    for c in chars {
        if !(c == '_' || c == '$' || c.is_ascii_alphanumeric()) {
            return Err(SqlError::identifier(format!(
                "Invalid character in identifier '{s}': '{c}'"
            )));
        }
    }
    Ok(())
}

/// `rest` is everything after the opening quote.
fn validate_quoted(rest: &str) -> SqlResult<()> {
    let mut chars = rest.chars().peekable();
    let mut len = 0usize;
    loop {
        match chars.next() {
            Some('"') => {
                // Escaped quote: ""
                if chars.peek() == Some(&'"') {
                    chars.next();
                    len += 1;
                } else {
                    break;
                }
            }
            Some(_) => len += 1,
            None => return Err(SqlError::identifier("Unclosed quoted identifier")),
        }
    }
    if len == 0 {
        return Err(SqlError::identifier("Empty quoted identifier"));
    }
    if let Some(c) = chars.next() {
        return Err(SqlError::identifier(format!(
            "Unexpected '{c}' after quoted identifier"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        let ident = Ident::parse("orders").unwrap();
        assert_eq!(ident.as_str(), "orders");
    }

    #[test]
    fn ident_with_dollar() {
        assert_eq!(Ident::parse("my_var$1").unwrap().as_str(), "my_var$1");
    }

    #[test]
    fn ident_quoted() {
        let ident = Ident::parse(r#""Order Items""#).unwrap();
        assert_eq!(ident.to_string(), r#""Order Items""#);
    }

    #[test]
    fn ident_quoted_with_escape() {
        assert!(Ident::parse(r#""has""quote""#).is_ok());
    }

    #[test]
    fn ident_rejects_empty() {
        assert!(Ident::parse("").unwrap_err().is_identifier());
        assert!(Ident::parse(r#""""#).is_err());
    }

    #[test]
    fn ident_rejects_start_digit() {
        assert!(Ident::parse("1table").is_err());
    }

    #[test]
    fn ident_rejects_dotted() {
        assert!(Ident::parse("dbo.orders").is_err());
    }

    #[test]
    fn ident_rejects_trailing_text_after_quote() {
        assert!(Ident::parse(r#""a"b"#).is_err());
    }

    #[test]
    fn ident_rejects_unclosed_quote() {
        assert!(Ident::parse(r#""unclosed"#).is_err());
    }

    #[test]
    fn column_accepts_wildcard() {
        assert_eq!(Ident::column("*").unwrap().as_str(), "*");
        assert!(Ident::parse("*").is_err());
    }
}
