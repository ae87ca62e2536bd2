//! SQL lexer.
//!
//! The [`Lexer`] converts query text into a stream of [`Token`]s:
//! case-insensitive keywords, identifiers, numeric literals, single-quoted
//! string literals (no escape sequences), comparison operators, and
//! punctuation.

use super::error::{ParseError, Span};
use super::token::{Keyword, Token, TokenKind};

/// Tokenizes a query string.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenizes the entire input.
    ///
    /// The returned vector always ends with an EOF token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    /// Returns the next token from the input.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();

        let start = self.pos;
        let Some(ch) = self.current_char() else {
            return Ok(Token::new(TokenKind::Eof, Span::at(start)));
        };

        if ch == '\'' {
            return self.scan_string_literal();
        }

        if ch.is_ascii_digit() || (ch == '-' && self.peek_char().is_some_and(|c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if is_ident_start(ch) {
            return self.scan_identifier_or_keyword();
        }

        self.scan_operator_or_punctuation()
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_string_literal(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            match self.current_char() {
                None => {
                    return Err(ParseError::unterminated_string(Span::new(start, self.pos)));
                }
                Some('\'') => {
                    self.advance();
                    break;
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
            }
        }
        Ok(Token::new(
            TokenKind::String(value),
            Span::new(start, self.pos),
        ))
    }

    fn scan_number(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;

        if self.current_char() == Some('-') {
            self.advance();
        }
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        let mut is_float = false;
        if self.current_char() == Some('.') && self.peek_char().is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            self.advance(); // '.'
            while let Some(ch) = self.current_char() {
                if ch.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let text = &self.input[start..self.pos];
        let span = Span::new(start, self.pos);

        if is_float {
            match text.parse::<f64>() {
                Ok(n) => Ok(Token::new(TokenKind::Float(n), span)),
                Err(_) => Err(ParseError::invalid_number(span)),
            }
        } else {
            match text.parse::<i64>() {
                Ok(n) => Ok(Token::new(TokenKind::Integer(n), span)),
                Err(_) => Err(ParseError::invalid_number(span)),
            }
        }
    }

    fn scan_identifier_or_keyword(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if is_ident_continue(ch) {
                self.advance();
            } else {
                break;
            }
        }

        let ident = &self.input[start..self.pos];
        let span = Span::new(start, self.pos);
        match Keyword::parse(ident) {
            Some(keyword) => Ok(Token::new(TokenKind::Keyword(keyword), span)),
            None => Ok(Token::new(TokenKind::Identifier(ident.to_string()), span)),
        }
    }

    fn scan_operator_or_punctuation(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;

        // two-character operators first
        if self.pos + 2 <= self.input.len() && self.input.is_char_boundary(self.pos + 2) {
            let kind = match &self.input[self.pos..self.pos + 2] {
                "<=" => Some(TokenKind::LtEq),
                ">=" => Some(TokenKind::GtEq),
                _ => None,
            };
            if let Some(kind) = kind {
                self.pos += 2;
                return Ok(Token::new(kind, Span::new(start, self.pos)));
            }
        }

        let Some(ch) = self.current_char() else {
            return Ok(Token::new(TokenKind::Eof, Span::at(start)));
        };
        self.advance();
        let kind = match ch {
            '*' => TokenKind::Asterisk,
            '=' => TokenKind::Eq,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            _ => {
                return Err(ParseError::new(
                    format!("unexpected character '{ch}'"),
                    Span::new(start, self.pos),
                ));
            }
        };
        Ok(Token::new(kind, Span::new(start, self.pos)))
    }
}

/// Returns true if the character can start an identifier.
fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// Returns true if the character can continue an identifier.
fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
