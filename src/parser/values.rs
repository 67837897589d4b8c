//! Value statement parsing implementation
//!
//! Value statements produce a typed value:
//!
//! - String literals: `"text"` (type `str`)
//! - Calls: `printf(msg)` (the callee's return type)
//! - Variable references: `msg` (the variable's type)
//!
//! # Calls
//!
//! Arguments are matched positionally against the callee's declared
//! parameters. Each argument's type must unify with its parameter's type, and
//! the argument count must match the parameter count exactly.

use crate::parser::ast::{Argument, CallStatement, ValueStatement};
use crate::parser::lexer::TokenKind;
use crate::parser::parser::{
    expect_token, next_of_kind, skip_whitespace, ParseResult, TokenCursor, VALUE_STATEMENTS,
};
use crate::parser::statements;
use crate::types::{DataType, ParseContext};

/// First value statement kind that matches.
pub fn parse_value_statement(
    tokens: &TokenCursor<'_, '_>,
    context: &mut ParseContext,
) -> ParseResult<ValueStatement> {
    for rule in VALUE_STATEMENTS {
        if let Some(value) = rule(tokens, context)? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// A single string literal token.
pub fn parse_string_literal(
    tokens: &TokenCursor<'_, '_>,
    _context: &mut ParseContext,
) -> ParseResult<ValueStatement> {
    let cursor = tokens.fork(1);
    let Some(token) = next_of_kind(&cursor, TokenKind::StringLiteral) else {
        return Ok(None);
    };
    cursor.commit();
    Ok(Some(ValueStatement::StringLiteral {
        text: token.text,
        location: token.location,
    }))
}

/// `callee(arg, ...)` where `callee` is bound to a function type.
pub fn parse_call(
    tokens: &TokenCursor<'_, '_>,
    context: &mut ParseContext,
) -> ParseResult<ValueStatement> {
    let cursor = tokens.fork(1);
    let Some(name) = next_of_kind(&cursor, TokenKind::Identifier) else {
        return Ok(None);
    };
    let Some(target) = context.lookup(&name.text).cloned() else {
        return Ok(None);
    };
    let DataType::Function(function) = &target.data_type else {
        return Ok(None);
    };
    if expect_token(&cursor, TokenKind::Unknown, "(").is_none() {
        return Ok(None);
    }

    let mut args = Vec::with_capacity(function.arity());
    if function.params.is_empty() && expect_token(&cursor, TokenKind::Unknown, ")").is_none() {
        return Ok(None);
    }
    for (index, param) in function.params.iter().enumerate() {
        skip_whitespace(&cursor);
        let Some(value) = statements::parse_statement(&cursor, context)? else {
            return Ok(None);
        };

        // Unifies in place: the parameter's slot is shared with the scope entry
        if param.data_type.unify(&value.data_type()).is_err() {
            return Ok(None);
        }
        args.push(Argument {
            param: param.symbol.clone(),
            value,
        });

        let closer = if index + 1 == function.arity() { ")" } else { "," };
        if expect_token(&cursor, TokenKind::Unknown, closer).is_none() {
            return Ok(None);
        }
    }

    cursor.commit();
    Ok(Some(ValueStatement::Call(CallStatement {
        target,
        args,
        location: name.location,
    })))
}

/// A bound name used as a value.
pub fn parse_variable(
    tokens: &TokenCursor<'_, '_>,
    context: &mut ParseContext,
) -> ParseResult<ValueStatement> {
    let cursor = tokens.fork(1);
    let Some(name) = next_of_kind(&cursor, TokenKind::Identifier) else {
        return Ok(None);
    };
    let Some(binding) = context.lookup(&name.text) else {
        return Ok(None);
    };

    let mut binding = binding.clone();
    binding.data_type = binding.final_type()?;
    cursor.commit();
    Ok(Some(ValueStatement::Variable {
        binding,
        location: name.location,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Cursor;
    use crate::parser::ast::Statement;
    use crate::parser::lexer::Tokenizer;
    use crate::types::{FunctionType, TypeError, VariableBinding};
    use rstest::rstest;

    fn main_context() -> ParseContext {
        let mut context = ParseContext::default();
        context.install_builtins();
        context.declare(VariableBinding::new("msg", DataType::String));
        context
    }

    fn value(source: &str, context: &mut ParseContext) -> Option<ValueStatement> {
        let tokens = Cursor::new(Tokenizer::new(source));
        parse_value_statement(&tokens, context).unwrap()
    }

    fn call(source: &str) -> Option<CallStatement> {
        let mut context = main_context();
        let tokens = Cursor::new(Tokenizer::new(source));
        match parse_call(&tokens, &mut context).unwrap() {
            Some(ValueStatement::Call(call)) => Some(call),
            Some(other) => panic!("Expected call, got {:?}", other),
            None => None,
        }
    }

    #[test]
    fn test_string_literal() {
        let mut context = main_context();
        let literal = value("'hello world'", &mut context).unwrap();
        assert!(matches!(
            literal,
            ValueStatement::StringLiteral { ref text, .. } if text == "hello world"
        ));
        assert_eq!(literal.data_type(), DataType::String);
    }

    #[test]
    fn test_call_with_variable() {
        let call = call("printf(msg)").unwrap();
        assert_eq!(call.target.symbol, "printf");
        assert_eq!(call.args.len(), 1);
        assert_eq!(call.args[0].param, "message");
        assert!(matches!(
            call.args[0].value,
            Statement::Value(ValueStatement::Variable { ref binding, .. }) if binding.symbol == "msg"
        ));
        assert_eq!(call.return_type(), DataType::Void);
    }

    #[rstest]
    #[case("printf(\"hi\")")]
    #[case("printf ( \"hi\" )")]
    #[case("printf(  msg)")]
    fn test_call_accepts(#[case] source: &str) {
        assert!(call(source).is_some());
    }

    #[rstest]
    #[case::too_many_args("printf(msg, msg)")]
    #[case::no_args("printf()")]
    #[case::unclosed("printf(msg")]
    #[case::no_parens("printf msg")]
    #[case::wrong_type("printf(printf)")]
    #[case::void_argument("printf(printf(msg))")]
    #[case::not_a_function("msg(msg)")]
    #[case::unknown_callee("puts(msg)")]
    #[case::string_paren("printf\"(\"msg)")]
    fn test_call_rejects(#[case] source: &str) {
        assert!(call(source).is_none());
    }

    #[test]
    fn test_arity_against_two_parameters() {
        let mut context = main_context();
        let pair = FunctionType::new(
            "pair_t",
            vec![
                VariableBinding::new("left", DataType::String),
                VariableBinding::new("right", DataType::String),
            ],
            DataType::String,
        );
        context.declare(VariableBinding::new("pair", DataType::Function(pair)));

        let pair_call = value("pair(msg, \"b\")", &mut context).unwrap();
        assert_eq!(pair_call.data_type(), DataType::String);
        match pair_call {
            ValueStatement::Call(call) => {
                let params: Vec<&str> = call.args.iter().map(|a| a.param.as_str()).collect();
                assert_eq!(params, vec!["left", "right"]);
            }
            other => panic!("Expected call, got {:?}", other),
        }

        // One argument short
        let tokens = Cursor::new(Tokenizer::new("pair(msg)"));
        assert!(parse_call(&tokens, &mut context).unwrap().is_none());
        assert_eq!(tokens.position(), None);
    }

    #[test]
    fn test_zero_parameter_function() {
        let mut context = main_context();
        let nothing = FunctionType::new("nothing_t", Vec::new(), DataType::Void);
        context.declare(VariableBinding::new("nothing", DataType::Function(nothing)));

        assert!(matches!(
            value("nothing()", &mut context),
            Some(ValueStatement::Call(_))
        ));
        let tokens = Cursor::new(Tokenizer::new("nothing(msg)"));
        assert!(parse_call(&tokens, &mut context).unwrap().is_none());
    }

    #[test]
    fn test_inferred_parameter_is_bound_by_first_call() {
        let mut context = main_context();
        let sink = FunctionType::new(
            "sink_t",
            vec![VariableBinding::new("item", DataType::unresolved())],
            DataType::Void,
        );
        context.declare(VariableBinding::new("sink", DataType::Function(sink)));

        assert!(value("sink(msg)", &mut context).is_some());

        match &context.lookup("sink").unwrap().data_type {
            DataType::Function(function) => {
                assert_eq!(function.params[0].data_type.final_type(), Ok(DataType::String));
            }
            other => panic!("Expected function type, got {:?}", other),
        }
        // The parameter is `str` from now on
        let tokens = Cursor::new(Tokenizer::new("sink(printf)"));
        assert!(parse_call(&tokens, &mut context).unwrap().is_none());
    }

    #[test]
    fn test_variable_reference() {
        let mut context = main_context();
        let printf = value("printf", &mut context).unwrap();
        assert!(matches!(printf.data_type(), DataType::Function(_)));
        assert!(value("missing", &mut context).is_none());
    }

    #[test]
    fn test_unresolved_variable_is_fatal() {
        let mut context = main_context();
        context.declare(VariableBinding::new("ghost", DataType::unresolved()));
        let tokens = Cursor::new(Tokenizer::new("ghost"));
        let err = parse_variable(&tokens, &mut context).unwrap_err();
        assert_eq!(
            err,
            TypeError::Unresolved {
                symbol: Some("ghost".to_string())
            }
        );
    }
}
