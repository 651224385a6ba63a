//! OPL data lexer: tokenizes `.dat` text on demand.
//!
//! The lexer is pull-based so a declaration can be read without touching
//! the rest of the file: solver output often carries trailing content the
//! grammar below does not cover.

use crate::{Error, Result};

/// A token from the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

/// Source span (byte offsets into the full input).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Integer, Float, StringLiteral,

    Identifier,

    // Punctuation
    LBracket, RBracket, LBrace, RBrace,
    Comma, Semicolon, Eq,

    Eof,
}

/// Pull lexer over a `.dat` document, starting at an arbitrary byte offset.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    declaration: &'a str,
}

impl<'a> Lexer<'a> {
    /// Lex `input` from byte offset `start`. `declaration` labels errors.
    pub fn new(input: &'a str, start: usize, declaration: &'a str) -> Self {
        Self { input, pos: start.min(input.len()), declaration }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, position: usize, message: impl Into<String>) -> Error {
        Error::ParseError {
            declaration: self.declaration.to_string(),
            position,
            message: message.into(),
        }
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() => { self.bump(); }
                (Some('/'), Some('/')) => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                (Some('/'), Some('*')) => {
                    let comment_start = self.pos;
                    self.pos += 2;
                    match self.input[self.pos..].find("*/") {
                        Some(end) => self.pos += end + 2,
                        None => return Err(self.error(comment_start, "Unterminated block comment")),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Produce the next token; returns `Eof` forever once input is exhausted.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;
        let start = self.pos;

        let Some(ch) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                span: Span { start, end: start },
                text: String::new(),
            });
        };

        match ch {
            '"' => self.string_literal(),
            c if c.is_ascii_digit() => self.number(),
            '-' | '+' if self.peek_second().is_some_and(|c| c.is_ascii_digit() || c == '.') => {
                self.number()
            }
            '.' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => self.number(),
            c if c.is_alphabetic() || c == '_' => {
                while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                    self.bump();
                }
                Ok(self.token(TokenKind::Identifier, start))
            }
            '[' => { self.bump(); Ok(self.token(TokenKind::LBracket, start)) }
            ']' => { self.bump(); Ok(self.token(TokenKind::RBracket, start)) }
            '{' => { self.bump(); Ok(self.token(TokenKind::LBrace, start)) }
            '}' => { self.bump(); Ok(self.token(TokenKind::RBrace, start)) }
            ',' => { self.bump(); Ok(self.token(TokenKind::Comma, start)) }
            ';' => { self.bump(); Ok(self.token(TokenKind::Semicolon, start)) }
            '=' => { self.bump(); Ok(self.token(TokenKind::Eq, start)) }
            other => Err(self.error(start, format!("Unexpected character: '{other}'"))),
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            span: Span { start, end: self.pos },
            text: self.input[start..self.pos].to_string(),
        }
    }

    fn string_literal(&mut self) -> Result<Token> {
        let start = self.pos;
        self.bump(); // opening quote
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some(c @ ('\\' | '"')) => s.push(c),
                    Some(c) => { s.push('\\'); s.push(c); }
                    None => break,
                },
                Some('"') => {
                    return Ok(Token {
                        kind: TokenKind::StringLiteral,
                        span: Span { start, end: self.pos },
                        text: s,
                    });
                }
                Some(c) => s.push(c),
                None => break,
            }
        }
        Err(self.error(start, "Unterminated string literal"))
    }

    fn number(&mut self) -> Result<Token> {
        let start = self.pos;
        let mut is_float = false;

        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        self.digits();
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            self.digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('-' | '+')) {
                self.bump();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(self.error(start, "Malformed exponent"));
            }
            self.digits();
        }

        let kind = if is_float { TokenKind::Float } else { TokenKind::Integer };
        Ok(self.token(kind, start))
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }
}

/// Tokenize a whole `.dat` fragment.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(input, 0, "<input>");
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token()?;
        let eof = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if eof {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_set_declaration() {
        assert_eq!(kinds(r#"Cells = { "cell_0_0", "cell_1_0", };"#), vec![
            TokenKind::Identifier,
            TokenKind::Eq,
            TokenKind::LBrace,
            TokenKind::StringLiteral,
            TokenKind::Comma,
            TokenKind::StringLiteral,
            TokenKind::Comma,
            TokenKind::RBrace,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("[1 -2 0.45 1000000.0 1e+16 -3.5e-2]").unwrap();
        let texts: Vec<_> = tokens[1..7].iter().map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(texts, vec![
            (TokenKind::Integer, "1"),
            (TokenKind::Integer, "-2"),
            (TokenKind::Float, "0.45"),
            (TokenKind::Float, "1000000.0"),
            (TokenKind::Float, "1e+16"),
            (TokenKind::Float, "-3.5e-2"),
        ]);
    }

    #[test]
    fn test_string_literal_contents() {
        let tokens = tokenize(r#""cell_-1_2""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].text, "cell_-1_2");
        assert_eq!(tokens[0].span, Span { start: 0, end: 11 });
    }

    #[test]
    fn test_comments_skipped() {
        let k = kinds("// solution (optimal)\ncor = /* flags */ [1 0];");
        assert_eq!(k[0], TokenKind::Identifier);
        assert_eq!(k[2], TokenKind::LBracket);
    }

    #[test]
    fn test_errors() {
        assert!(tokenize("\"open").is_err());
        assert!(tokenize("/* open").is_err());
        assert!(tokenize("1e").is_err());
        assert!(matches!(tokenize("<1>"), Err(Error::ParseError { position: 0, .. })));
    }

    #[test]
    fn test_lexer_from_offset() {
        let input = "junk <> cor = [1];";
        let mut lexer = Lexer::new(input, 13, "cor");
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::LBracket);
        assert_eq!(tok.span.start, 14);
    }
}
