//! SesaScript source code parser
//!
//! This module transforms SesaScript source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → lazy token stream)
//! - [`parser`]: Grammar entry points, rule registries, and blocks
//! - [`statements`]: Standalone statements (assignments)
//! - [`values`]: Value-producing statements (literals, calls, variables)
//! - [`ast`]: AST node definitions
//!
//! # Grammar
//!
//! ```text
//! root       ::= block EOF
//! block      ::= (blank_line | INDENT statement ws* (NEWLINE | EOF))*
//! statement  ::= assignment | value
//! assignment ::= IDENT ws* '=' ws* value
//! value      ::= STRING | call | IDENT
//! call       ::= IDENT ws* '(' ws* statement (ws* ',' ws* statement)* ws* ')'
//! ```
//!
//! # Parser Implementation
//!
//! Hand-written, backtracking recursive descent over a speculative token
//! cursor. Each rule forks the cursor it is given, consumes freely, and
//! commits only when it accepts; a rule that declines returns `Ok(None)` and
//! leaves its caller's position untouched. Alternatives are tried in
//! registration order.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod statements;
pub mod values;
