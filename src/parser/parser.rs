//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, the rule registries, block and
//! root parsing, and the token-level helpers the statement and value rules
//! share.
//!
//! # Rules
//!
//! Every grammar rule has the same shape:
//!
//! ```ignore
//! fn rule(tokens: &TokenCursor<'_, '_>, context: &mut ParseContext) -> ParseResult<Node>
//! ```
//!
//! A rule reads starting at the token *after* `tokens`' current one. On
//! success it commits `tokens` to the last token it consumed; on `Ok(None)`
//! it has committed nothing. `Err` is reserved for fatal type resolution
//! failures and is propagated with `?`.

use crate::cursor::Cursor;
use crate::parser::ast::{Block, Root, Statement, ValueStatement};
use crate::parser::lexer::{Token, TokenKind, Tokenizer};
use crate::parser::{statements, values};
use crate::types::{ParseContext, TypeError};

/// Token cursor the grammar runs on
pub type TokenCursor<'p, 's> = Cursor<'p, Tokenizer<'s>>;

/// `Ok(None)` is an ordinary "no match"; `Err` aborts the parse.
pub type ParseResult<T> = Result<Option<T>, TypeError>;

pub type StatementRule = fn(&TokenCursor<'_, '_>, &mut ParseContext) -> ParseResult<Statement>;

pub type ValueRule = fn(&TokenCursor<'_, '_>, &mut ParseContext) -> ParseResult<ValueStatement>;

/// Standalone statement kinds, tried in order
pub const STANDALONE_STATEMENTS: &[StatementRule] = &[
    statements::parse_assignment,
    statements::parse_value,
];

/// Value statement kinds, tried in order. Calls come before bare variables so
/// `f(...)` is not read as the function value `f`.
pub const VALUE_STATEMENTS: &[ValueRule] = &[
    values::parse_string_literal,
    values::parse_call,
    values::parse_variable,
];

/// Backtracking parser over a lazily tokenized source
pub struct Parser<'s> {
    tokens: TokenCursor<'static, 's>,
    context: ParseContext,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Self {
        Self::with_context(source, ParseContext::default())
    }

    /// Parse with a caller-provided context (module name, pre-seeded scopes).
    pub fn with_context(source: &'s str, context: ParseContext) -> Self {
        Self {
            tokens: Cursor::new(Tokenizer::new(source)),
            context,
        }
    }

    /// Parse the entire program. `Ok(None)` means the source is not a valid program.
    pub fn parse_program(&mut self) -> ParseResult<Root> {
        parse_root(&self.tokens, &mut self.context)
    }

    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    pub fn into_context(self) -> ParseContext {
        self.context
    }
}

/// Root block. Seeds the built-ins for the `main` module and requires the
/// block to consume every token.
pub fn parse_root(tokens: &TokenCursor<'_, '_>, context: &mut ParseContext) -> ParseResult<Root> {
    if context.is_main() {
        context.install_builtins();
    }

    let cursor = tokens.fork(1);
    let Some(block) = parse_block(&cursor, context)? else {
        return Ok(None);
    };
    if cursor.fork(1).advance().is_ok() {
        // Leftover line at a different indentation
        return Ok(None);
    }

    cursor.commit();
    Ok(Some(Root { block }))
}

/// Statements at `context.indent_width`, one per line.
///
/// Blank lines are skipped. The block ends (successfully) at end of input or
/// at the first line indented differently, which is left unconsumed. A line
/// at the right indentation that does not hold exactly one statement fails
/// the block.
pub fn parse_block(tokens: &TokenCursor<'_, '_>, context: &mut ParseContext) -> ParseResult<Block> {
    let cursor = tokens.fork(1);
    let mut block = Block::default();

    loop {
        let line = cursor.fork(1);
        let mut indent = 0;
        let first = loop {
            match line.advance() {
                Ok(token) if token.is_whitespace() => indent += 1,
                Ok(token) => break Some(token),
                Err(_) => break None,
            }
        };

        let Some(first) = first else {
            line.commit();
            break;
        };
        if first.kind == TokenKind::NewLine {
            line.commit();
            continue;
        }
        if indent != context.indent_width {
            break;
        }

        line.rewind(1);
        // The line starts with a non-whitespace token, so a failed statement
        // always leaves a non-trivial remainder.
        let Some(statement) = statements::parse_statement(&line, context)? else {
            return Ok(None);
        };
        if !end_of_line(&line) {
            return Ok(None);
        }

        line.commit();
        block.statements.push(statement);
    }

    cursor.commit();
    Ok(Some(block))
}

/// Consume any whitespace tokens. Always succeeds.
pub(crate) fn skip_whitespace(tokens: &TokenCursor<'_, '_>) {
    let cursor = tokens.fork(1);
    loop {
        match cursor.advance() {
            Ok(token) if token.is_whitespace() => continue,
            Ok(_) => {
                cursor.rewind(1);
                break;
            }
            Err(_) => break,
        }
    }
    cursor.commit();
}

/// Consume whitespace, then one `kind` token with exactly `text`.
pub(crate) fn expect_token(
    tokens: &TokenCursor<'_, '_>,
    kind: TokenKind,
    text: &str,
) -> Option<Token> {
    let cursor = tokens.fork(1);
    skip_whitespace(&cursor);
    let token = cursor.advance().ok()?;
    if !token.is(kind, text) {
        return None;
    }
    cursor.commit();
    Some(token)
}

/// The next token itself, without skipping whitespace, if it is of `kind`.
pub(crate) fn next_of_kind(tokens: &TokenCursor<'_, '_>, kind: TokenKind) -> Option<Token> {
    let cursor = tokens.fork(1);
    let token = cursor.advance().ok()?;
    if token.kind != kind {
        return None;
    }
    cursor.commit();
    Some(token)
}

/// Consume trailing whitespace and the line's new line (or reach end of input).
pub(crate) fn end_of_line(tokens: &TokenCursor<'_, '_>) -> bool {
    let cursor = tokens.fork(1);
    skip_whitespace(&cursor);
    match cursor.advance() {
        Ok(token) if token.kind == TokenKind::NewLine => {}
        Ok(_) => return false,
        Err(_) => {}
    }
    cursor.commit();
    true
}
