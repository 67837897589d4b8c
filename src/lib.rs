//! # Introduction
//!
//! SesaScript is a tiny, indentation-sensitive scripting language compiled to
//! C.  Programs are sequences of assignments and calls over strings and
//! functions; every name's type is inferred from the first value assigned to
//! it.
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Tokenizer → Cursor → Grammar rules → AST → Emitter → C source
//! ```
//!
//! 1. [`parser::lexer`] turns characters into a lazy token stream.
//! 2. [`cursor`] buffers that stream and hands out speculative forks, so each
//!    grammar rule can try a parse and back out without re-tokenizing.
//! 3. [`parser`] runs the backtracking grammar and builds the AST, resolving
//!    names and [`types`] as it goes.
//! 4. [`emitter`] renders the AST as a C `main` function.
//!
//! ## Example
//!
//! ```
//! use sesascript::{compile, CompileOptions};
//!
//! let c = compile("msg = \"hi\"\nprintf(msg)\n", &CompileOptions::default()).unwrap();
//! assert!(c.contains("char[] msg = \"hi\";"));
//! assert!(c.contains("printf(msg);"));
//! ```

use std::fmt;

pub mod cursor;
pub mod emitter;
pub mod parser;
pub mod types;

pub use parser::lexer::tokenize;

use emitter::DEFAULT_INDENT_WIDTH;
use parser::ast::Root;
use parser::parser::Parser;
use types::scope::MAIN_MODULE;
use types::{ParseContext, TypeError};

/// Compilation settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Built-ins are only visible to the `main` module
    pub module_name: String,
    /// Columns per indentation level in the emitted C
    pub indent_width: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            module_name: MAIN_MODULE.to_string(),
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

/// Why a source failed to compile
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The source is not a valid program
    Syntax,
    Type(TypeError),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Syntax => write!(f, "Source is not a valid program"),
            CompileError::Type(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Syntax => None,
            CompileError::Type(err) => Some(err),
        }
    }
}

impl From<TypeError> for CompileError {
    fn from(err: TypeError) -> Self {
        CompileError::Type(err)
    }
}

/// Parse `source` into a program tree. `Ok(None)` means it is not a valid program.
pub fn parse(source: &str, options: &CompileOptions) -> Result<Option<Root>, TypeError> {
    let context = ParseContext::new(options.module_name.clone());
    Parser::with_context(source, context).parse_program()
}

/// Parse `source` and render it as C.
pub fn compile(source: &str, options: &CompileOptions) -> Result<String, CompileError> {
    let root = parse(source, options)?.ok_or(CompileError::Syntax)?;
    Ok(emitter::emit_program(&root, options.indent_width)?)
}
