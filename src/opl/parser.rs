//! OPL data recursive descent parser.
//!
//! Reads exactly one declaration: it locates the first `name =` in the
//! document and parses the literal that follows, up to the closing `;`.
//! Nothing after that semicolon is inspected.

use crate::{Error, Result};
use super::ast::{Declaration, Literal};
use super::lexer::{Lexer, Span, Token, TokenKind};

/// Deepest bracket/brace nesting accepted. The model and solution files
/// never nest deeper than three.
const MAX_DEPTH: usize = 16;

/// Parser state: a pull lexer with one token of lookahead.
struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    declaration: &'a str,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, start: usize, declaration: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(input, start, declaration);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current, declaration, depth: 0 })
    }

    fn peek_kind(&self) -> TokenKind {
        self.current.kind
    }

    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> Result<bool> {
        if self.at(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.at(kind) {
            self.advance()
        } else {
            Err(self.error(format!(
                "Expected {:?}, got {:?} '{}'",
                kind, self.current.kind, self.current.text
            )))
        }
    }

    fn error(&self, msg: String) -> Error {
        Error::ParseError {
            declaration: self.declaration.to_string(),
            position: self.current.span.start,
            message: msg,
        }
    }

    fn parse_value(&mut self) -> Result<Literal> {
        match self.peek_kind() {
            TokenKind::LBracket => {
                self.advance()?;
                Ok(Literal::Array(self.parse_items(TokenKind::RBracket)?))
            }
            TokenKind::LBrace => {
                self.advance()?;
                Ok(Literal::Set(self.parse_items(TokenKind::RBrace)?))
            }
            TokenKind::Integer => {
                let tok = self.advance()?;
                tok.text.parse().map(Literal::Int).map_err(|e| Error::ParseError {
                    declaration: self.declaration.to_string(),
                    position: tok.span.start,
                    message: format!("Invalid integer '{}': {e}", tok.text),
                })
            }
            TokenKind::Float => {
                let tok = self.advance()?;
                tok.text.parse().map(Literal::Float).map_err(|e| Error::ParseError {
                    declaration: self.declaration.to_string(),
                    position: tok.span.start,
                    message: format!("Invalid float '{}': {e}", tok.text),
                })
            }
            TokenKind::StringLiteral => Ok(Literal::Str(self.advance()?.text)),
            TokenKind::Eof => Err(self.error("Unexpected end of input".into())),
            kind => Err(self.error(format!("Unexpected token {:?} '{}'", kind, self.current.text))),
        }
    }

    /// Items up to `close`; a single comma may follow each item.
    fn parse_items(&mut self, close: TokenKind) -> Result<Vec<Literal>> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("Nesting too deep (more than {MAX_DEPTH} levels)")));
        }
        self.depth += 1;
        let mut items = Vec::new();
        while !self.eat(close)? {
            items.push(self.parse_value()?);
            self.eat(TokenKind::Comma)?;
        }
        self.depth -= 1;
        Ok(items)
    }
}

/// Byte offset of the first `name =` declaration and the offset just past `=`.
///
/// Comments and string literals are skipped, so a header line such as
/// `// cor = see below` is never taken for the declaration.
pub fn locate(content: &str, name: &str) -> Option<(usize, usize)> {
    if name.is_empty() {
        return None;
    }
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';

    let mut pos = 0;
    while pos < content.len() {
        let rest = &content[pos..];
        if rest.starts_with("//") {
            pos += rest.find('\n').map_or(rest.len(), |n| n + 1);
            continue;
        }
        if rest.starts_with("/*") {
            pos += rest[2..].find("*/").map_or(rest.len(), |n| n + 4);
            continue;
        }
        if rest.starts_with('"') {
            pos += string_len(rest);
            continue;
        }
        if rest.starts_with(name) && !content[..pos].chars().next_back().is_some_and(is_ident) {
            let tail = &rest[name.len()..];
            if !tail.chars().next().is_some_and(is_ident) {
                if let Some(after) = tail.trim_start().strip_prefix('=') {
                    if !after.starts_with('=') {
                        return Some((pos, content.len() - after.len()));
                    }
                }
            }
        }
        pos += rest.chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Byte length of the string literal at the start of `s`, closing quote
/// included; the rest of `s` when unterminated.
fn string_len(s: &str) -> usize {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return i + 1,
            _ => {}
        }
    }
    s.len()
}

/// Parse the first declaration of `name` in `content`.
///
/// Returns `Ok(None)` when no such declaration exists; a declaration that
/// exists but is not well-formed is a `ParseError`.
pub fn parse_declaration(content: &str, name: &str) -> Result<Option<Declaration>> {
    let Some((start, value_start)) = locate(content, name) else {
        return Ok(None);
    };

    let mut p = Parser::new(content, value_start, name)?;
    let value = p.parse_value()?;
    let end = p.expect(TokenKind::Semicolon)?.span.end;

    Ok(Some(Declaration {
        name: name.to_string(),
        value,
        span: Span { start, end },
    }))
}
