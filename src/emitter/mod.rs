//! C emitter
//!
//! Walks a parsed [`Root`] and renders it as a C program:
//!
//! ```text
//! typedef char* str;
//!
//! int main() {
//!     char[] msg = "hi";
//!     printf(msg);
//!     return 0;
//! }
//! ```
//!
//! Each node renders itself through [`EmitC`]; the [`Emitter`] owns the output
//! buffer and the current indentation depth. String literal text is passed
//! through verbatim, so escapes written in the source reach the C output as-is.

use crate::parser::ast::{Assignee, Assignment, Block, CallStatement, Root, Statement, ValueStatement};
use crate::types::TypeError;

/// Columns per indentation level
pub const DEFAULT_INDENT_WIDTH: usize = 4;

const PREAMBLE: &str = "typedef char* str;\n\nint main() {\n";
const SUCCESS_RETURN: &str = "return 0;";
const POSTAMBLE: &str = "}\n";

/// Output buffer plus indentation state
#[derive(Debug, Clone)]
pub struct Emitter {
    output: String,
    depth: usize,
    indent_width: usize,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT_WIDTH)
    }
}

impl Emitter {
    pub fn new(indent_width: usize) -> Self {
        Self {
            output: String::new(),
            depth: 0,
            indent_width,
        }
    }

    /// Write `text` as one line at the current depth.
    pub fn line(&mut self, text: &str) {
        self.output
            .push_str(&" ".repeat(self.depth * self.indent_width));
        self.output.push_str(text);
        self.output.push('\n');
    }

    pub fn raw(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Run `body` one level deeper.
    pub fn indented<F>(&mut self, body: F) -> Result<(), TypeError>
    where
        F: FnOnce(&mut Self) -> Result<(), TypeError>,
    {
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    pub fn finish(self) -> String {
        self.output
    }
}

/// Rendering contract for AST nodes
pub trait EmitC {
    /// Write this node into `emitter` at its current depth.
    fn emit(&self, emitter: &mut Emitter) -> Result<(), TypeError>;
}

/// Render a parsed program as C source.
pub fn emit_program(root: &Root, indent_width: usize) -> Result<String, TypeError> {
    let mut emitter = Emitter::new(indent_width);
    root.emit(&mut emitter)?;
    Ok(emitter.finish())
}

impl EmitC for Root {
    fn emit(&self, emitter: &mut Emitter) -> Result<(), TypeError> {
        emitter.raw(PREAMBLE);
        self.block.emit(emitter)?;
        emitter.indented(|emitter| {
            emitter.line(SUCCESS_RETURN);
            Ok(())
        })?;
        emitter.raw(POSTAMBLE);
        Ok(())
    }
}

impl EmitC for Block {
    fn emit(&self, emitter: &mut Emitter) -> Result<(), TypeError> {
        emitter.indented(|emitter| {
            for statement in &self.statements {
                let code = statement.to_c()?;
                emitter.line(&format!("{};", code));
            }
            Ok(())
        })
    }
}

/// Inline rendering of expression-level nodes
trait ToC {
    fn to_c(&self) -> Result<String, TypeError>;
}

impl ToC for Statement {
    fn to_c(&self) -> Result<String, TypeError> {
        match self {
            Statement::Assignment(assignment) => assignment.to_c(),
            Statement::Value(value) => value.to_c(),
        }
    }
}

impl ToC for Assignment {
    fn to_c(&self) -> Result<String, TypeError> {
        Ok(format!("{} = {}", self.assignee.to_c()?, self.value.to_c()?))
    }
}

impl ToC for Assignee {
    fn to_c(&self) -> Result<String, TypeError> {
        if !self.is_declaration {
            return Ok(self.binding.symbol.clone());
        }
        let spelling = self
            .binding
            .data_type
            .c_spelling()
            .map_err(|err| err.for_symbol(&self.binding.symbol))?;
        Ok(format!("{} {}", spelling, self.binding.symbol))
    }
}

impl ToC for ValueStatement {
    fn to_c(&self) -> Result<String, TypeError> {
        match self {
            ValueStatement::StringLiteral { text, .. } => Ok(format!("\"{}\"", text)),
            ValueStatement::Call(call) => call.to_c(),
            ValueStatement::Variable { binding, .. } => Ok(binding.symbol.clone()),
        }
    }
}

impl ToC for CallStatement {
    fn to_c(&self) -> Result<String, TypeError> {
        let args = self
            .args
            .iter()
            .map(|arg| arg.value.to_c())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{}({})", self.target.symbol, args.join(", ")))
    }
}
