//! SQL token types.

use super::error::Span;

/// A token with its span in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// The span of this token in the source.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an end-of-input token.
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// The kind of a SQL token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Integer literal (e.g. 42, -7).
    Integer(i64),
    /// Decimal literal (e.g. 3.14).
    Float(f64),
    /// Single-quoted string literal.
    String(String),
    /// Unquoted identifier.
    Identifier(String),
    /// Case-insensitive keyword.
    Keyword(Keyword),

    /// *
    Asterisk,
    /// =
    Eq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// (
    LParen,
    /// )
    RParen,
    /// ,
    Comma,
    /// ;
    Semicolon,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns the display name for error messages.
    pub fn display_name(&self) -> String {
        match self {
            TokenKind::Integer(n) => format!("integer '{n}'"),
            TokenKind::Float(n) => format!("decimal '{n}'"),
            TokenKind::String(s) => format!("string '{s}'"),
            TokenKind::Identifier(s) => format!("identifier '{s}'"),
            TokenKind::Keyword(kw) => format!("keyword '{}'", kw.as_str()),
            TokenKind::Asterisk => "'*'".to_string(),
            TokenKind::Eq => "'='".to_string(),
            TokenKind::Lt => "'<'".to_string(),
            TokenKind::LtEq => "'<='".to_string(),
            TokenKind::Gt => "'>'".to_string(),
            TokenKind::GtEq => "'>='".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Semicolon => "';'".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// SQL keywords.
///
/// Keywords are case-insensitive; the lexer uppercases identifiers before
/// matching against this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // statements
    Select,
    Insert,
    Create,

    // clauses
    From,
    Where,
    Group,
    Order,
    By,
    Into,
    Values,
    Table,

    // data types
    Int,
    Integer,
    Double,
    Varchar,
}

impl Keyword {
    /// Returns the canonical spelling of this keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Select => "SELECT",
            Keyword::Insert => "INSERT",
            Keyword::Create => "CREATE",
            Keyword::From => "FROM",
            Keyword::Where => "WHERE",
            Keyword::Group => "GROUP",
            Keyword::Order => "ORDER",
            Keyword::By => "BY",
            Keyword::Into => "INTO",
            Keyword::Values => "VALUES",
            Keyword::Table => "TABLE",
            Keyword::Int => "INT",
            Keyword::Integer => "INTEGER",
            Keyword::Double => "DOUBLE",
            Keyword::Varchar => "VARCHAR",
        }
    }

    /// Attempts to parse a keyword from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SELECT" => Some(Keyword::Select),
            "INSERT" => Some(Keyword::Insert),
            "CREATE" => Some(Keyword::Create),
            "FROM" => Some(Keyword::From),
            "WHERE" => Some(Keyword::Where),
            "GROUP" => Some(Keyword::Group),
            "ORDER" => Some(Keyword::Order),
            "BY" => Some(Keyword::By),
            "INTO" => Some(Keyword::Into),
            "VALUES" => Some(Keyword::Values),
            "TABLE" => Some(Keyword::Table),
            "INT" => Some(Keyword::Int),
            "INTEGER" => Some(Keyword::Integer),
            "DOUBLE" => Some(Keyword::Double),
            "VARCHAR" => Some(Keyword::Varchar),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_parse_is_case_insensitive() {
        assert_eq!(Keyword::parse("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::parse("select"), Some(Keyword::Select));
        assert_eq!(Keyword::parse("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::parse("unknown"), None);
    }

    #[test]
    fn test_keyword_roundtrip() {
        for kw in [
            Keyword::Select,
            Keyword::Insert,
            Keyword::Create,
            Keyword::Varchar,
        ] {
            assert_eq!(Keyword::parse(kw.as_str()), Some(kw));
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(
            TokenKind::Keyword(Keyword::Select).display_name(),
            "keyword 'SELECT'"
        );
        assert_eq!(TokenKind::Integer(42).display_name(), "integer '42'");
        assert_eq!(TokenKind::Eof.display_name(), "end of input");
    }
}
