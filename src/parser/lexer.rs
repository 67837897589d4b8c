//! Lexer (tokenizer) for SesaScript source code
//!
//! Converts raw source text into a lazy [`Token`] stream consumed by the
//! grammar. The tokenizer runs a fixed, ordered list of recognizers over a
//! character-level [`Cursor`]; the first recognizer that matches wins and
//! anything nothing else claims becomes a single-character
//! [`TokenKind::Unknown`] token. The lexer never fails.
//!
//! Whitespace is significant (block indentation is counted in whitespace
//! tokens), so every space or tab is its own token.

use super::ast::SourceLocation;
use crate::cursor::Cursor;
use std::fmt;
use std::str::Chars;

/// Character cursor the recognizers run on
pub type CharCursor<'p, 's> = Cursor<'p, Chars<'s>>;

/// A recognizer inspects the cursor's current character and either claims a
/// token (committing the cursor to the token's last character) or declines.
pub type Recognizer = fn(&CharCursor<'_, '_>, SourceLocation) -> Option<Token>;

/// Registered operator symbols.
pub const OPERATORS: &[&str] = &["="];

/// Characters that open (and close) a string literal.
pub const STRING_QUOTES: &[char] = &['"', '\'', '`'];

/// Recognizers in priority order. Literals must run before operators and
/// identifiers so quote characters are never misclassified.
pub const RECOGNIZERS: &[Recognizer] = &[
    string_literal,
    whitespace,
    operator,
    identifier,
    new_line,
    unknown,
];

/// Token categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Operator,
    StringLiteral,
    Whitespace,
    Identifier,
    NewLine,
    Unknown,
}

/// A lexed token. String literal text excludes the surrounding quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    /// True for a token of `kind` whose text is exactly `text`.
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Operator => write!(f, "'{}'", self.text),
            TokenKind::StringLiteral => write!(f, "string literal \"{}\"", self.text),
            TokenKind::Whitespace => write!(f, "whitespace"),
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            TokenKind::NewLine => write!(f, "new line"),
            TokenKind::Unknown => write!(f, "unknown '{}'", self.text),
        }
    }
}

/// Lazy tokenizer over a source string
pub struct Tokenizer<'s> {
    chars: CharCursor<'static, 's>,
    line: usize,
    column: usize,
}

impl<'s> Tokenizer<'s> {
    /// Create a tokenizer for the given source string.
    pub fn new(source: &'s str) -> Self {
        Self {
            chars: Cursor::new(source.chars()),
            line: 1,
            column: 1,
        }
    }

    /// Advance line/column past the characters of the token just produced.
    fn track(&mut self, start: usize, end: usize) {
        for index in start..=end {
            match self.chars.get(index) {
                Some('\n') => {
                    self.line += 1;
                    self.column = 1;
                }
                Some(_) => self.column += 1,
                None => break,
            }
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.chars.advance().ok()?;
        let start = self.chars.position()?;
        let location = SourceLocation::new(self.line, self.column);

        let token = RECOGNIZERS
            .iter()
            .find_map(|recognize| recognize(&self.chars, location))?;

        let end = self.chars.position().unwrap_or(start);
        self.track(start, end);
        Some(token)
    }
}

/// Tokenize `source` lazily.
pub fn tokenize(source: &str) -> Tokenizer<'_> {
    Tokenizer::new(source)
}

/// Quoted string. A backslash takes the next character verbatim (both are
/// kept in the text); the literal ends at the same quote that opened it.
/// Unterminated literals are declined.
fn string_literal(chars: &CharCursor<'_, '_>, location: SourceLocation) -> Option<Token> {
    let cursor = chars.fork(0);
    let quote = cursor.advance().ok()?;
    if !STRING_QUOTES.contains(&quote) {
        return None;
    }

    let mut text = String::new();
    loop {
        let ch = cursor.advance().ok()?;
        if ch == '\\' {
            text.push(ch);
            text.push(cursor.advance().ok()?);
            continue;
        }
        if ch == quote {
            cursor.commit();
            return Some(Token::new(TokenKind::StringLiteral, text, location));
        }
        text.push(ch);
    }
}

/// One whitespace character. Newlines are left to [`new_line`].
fn whitespace(chars: &CharCursor<'_, '_>, location: SourceLocation) -> Option<Token> {
    let cursor = chars.fork(0);
    let ch = cursor.advance().ok()?;
    if !ch.is_whitespace() || ch == '\n' {
        return None;
    }
    cursor.commit();
    Some(Token::new(TokenKind::Whitespace, ch, location))
}

/// Longest registered operator first, down to a single character.
fn operator(chars: &CharCursor<'_, '_>, location: SourceLocation) -> Option<Token> {
    let longest = OPERATORS.iter().map(|op| op.chars().count()).max()?;

    for len in (1..=longest).rev() {
        let cursor = chars.fork(0);
        let mut symbol = String::new();
        for _ in 0..len {
            match cursor.advance() {
                Ok(ch) => symbol.push(ch),
                Err(_) => break,
            }
        }
        if symbol.chars().count() == len && OPERATORS.contains(&symbol.as_str()) {
            cursor.commit();
            return Some(Token::new(TokenKind::Operator, symbol, location));
        }
    }
    None
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '$'
}

fn is_identifier_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

/// `[A-Za-z_$][A-Za-z0-9_$]*`, longest run.
fn identifier(chars: &CharCursor<'_, '_>, location: SourceLocation) -> Option<Token> {
    let cursor = chars.fork(0);
    let first = cursor.advance().ok()?;
    if !is_identifier_start(first) {
        return None;
    }

    let mut name = String::from(first);
    loop {
        match cursor.advance() {
            Ok(ch) if is_identifier_continue(ch) => name.push(ch),
            Ok(_) => {
                // One past the end of the run
                cursor.rewind(1);
                break;
            }
            Err(_) => break,
        }
    }
    cursor.commit();
    Some(Token::new(TokenKind::Identifier, name, location))
}

fn new_line(chars: &CharCursor<'_, '_>, location: SourceLocation) -> Option<Token> {
    let cursor = chars.fork(0);
    match cursor.advance().ok()? {
        '\n' => Some(Token::new(TokenKind::NewLine, "\n", location)),
        _ => None,
    }
}

fn unknown(chars: &CharCursor<'_, '_>, location: SourceLocation) -> Option<Token> {
    let cursor = chars.fork(0);
    let ch = cursor.advance().ok()?;
    Some(Token::new(TokenKind::Unknown, ch, location))
}
