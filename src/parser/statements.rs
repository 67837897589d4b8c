//! Statement parsing implementation
//!
//! This module handles the standalone statement kinds:
//!
//! - Assignments: `name = value`. The first assignment to a name declares it
//!   with the value's type; later ones must assign the same type.
//! - Value statements used on their own line, e.g. `printf(msg)`
//!
//! # Grammar
//!
//! ```text
//! statement  ::= assignment | value
//! assignment ::= assignee ws* '=' ws* value
//! assignee   ::= IDENT
//! ```

use crate::parser::ast::{Assignee, Assignment, Statement};
use crate::parser::lexer::TokenKind;
use crate::parser::parser::{
    expect_token, next_of_kind, skip_whitespace, ParseResult, TokenCursor, STANDALONE_STATEMENTS,
};
use crate::parser::values;
use crate::types::{DataType, ParseContext, VariableBinding};

/// First standalone statement kind that matches.
pub fn parse_statement(
    tokens: &TokenCursor<'_, '_>,
    context: &mut ParseContext,
) -> ParseResult<Statement> {
    for rule in STANDALONE_STATEMENTS {
        if let Some(statement) = rule(tokens, context)? {
            return Ok(Some(statement));
        }
    }
    Ok(None)
}

/// `assignee = value`
///
/// Accepted only when the assignee's type unifies with the value's type; for
/// a new name this is what gives the name its type. The binding is declared
/// in the local scope on acceptance, never before.
pub fn parse_assignment(
    tokens: &TokenCursor<'_, '_>,
    context: &mut ParseContext,
) -> ParseResult<Statement> {
    let cursor = tokens.fork(1);

    let Some(mut assignee) = parse_assignee(&cursor, context) else {
        return Ok(None);
    };
    if expect_token(&cursor, TokenKind::Operator, "=").is_none() {
        return Ok(None);
    }
    skip_whitespace(&cursor);
    let Some(value) = values::parse_value_statement(&cursor, context)? else {
        return Ok(None);
    };

    if assignee.binding.data_type.unify(&value.data_type()).is_err() {
        return Ok(None);
    }
    assignee.binding.data_type = assignee.binding.final_type()?;
    context.declare(assignee.binding.clone());

    cursor.commit();
    let location = assignee.location;
    Ok(Some(Statement::Assignment(Assignment {
        assignee,
        value,
        location,
    })))
}

/// A value statement on its own.
pub fn parse_value(
    tokens: &TokenCursor<'_, '_>,
    context: &mut ParseContext,
) -> ParseResult<Statement> {
    Ok(values::parse_value_statement(tokens, context)?.map(Statement::Value))
}

/// A single identifier. Known local names reuse their binding; unknown ones
/// get a fresh binding with an unresolved type and are marked as declarations.
/// Nothing is registered in the scope here.
pub fn parse_assignee(tokens: &TokenCursor<'_, '_>, context: &ParseContext) -> Option<Assignee> {
    let cursor = tokens.fork(1);
    let token = next_of_kind(&cursor, TokenKind::Identifier)?;

    let (binding, is_declaration) = match context.local_vars.get(&token.text) {
        Some(existing) => (existing.clone(), false),
        None => (
            VariableBinding::new(token.text.clone(), DataType::unresolved()),
            true,
        ),
    };

    cursor.commit();
    Some(Assignee {
        binding,
        is_declaration,
        location: token.location,
    })
}
