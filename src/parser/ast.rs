// AST (Abstract Syntax Tree) definitions for the SesaScript front end

use crate::types::{DataType, VariableBinding};

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A run of statements sharing one indentation level
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
}

/// Top-level program: the module's outermost block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Root {
    pub block: Block,
}

impl Root {
    pub fn statements(&self) -> &[Statement] {
        &self.block.statements
    }
}

/// Statements that may stand alone on a line
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assignment(Assignment),
    Value(ValueStatement),
}

impl Statement {
    /// Type the statement produces when used as a value. Assignments produce nothing.
    pub fn data_type(&self) -> DataType {
        match self {
            Statement::Assignment(_) => DataType::Void,
            Statement::Value(value) => value.data_type(),
        }
    }
}

/// `assignee = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub assignee: Assignee,
    pub value: ValueStatement,
    pub location: SourceLocation,
}

/// Left-hand side of an assignment. The first assignment to a symbol declares it.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignee {
    pub binding: VariableBinding,
    pub is_declaration: bool,
    pub location: SourceLocation,
}

/// Statements that produce a value
#[derive(Debug, Clone, PartialEq)]
pub enum ValueStatement {
    StringLiteral {
        text: String,
        location: SourceLocation,
    },
    Call(CallStatement),
    Variable {
        binding: VariableBinding,
        location: SourceLocation,
    },
}

impl ValueStatement {
    pub fn data_type(&self) -> DataType {
        match self {
            ValueStatement::StringLiteral { .. } => DataType::String,
            ValueStatement::Call(call) => call.return_type(),
            ValueStatement::Variable { binding, .. } => binding.data_type.clone(),
        }
    }
}

/// `target(arg0, arg1, ...)`, arguments in declared parameter order
#[derive(Debug, Clone, PartialEq)]
pub struct CallStatement {
    pub target: VariableBinding,
    pub args: Vec<Argument>,
    pub location: SourceLocation,
}

impl CallStatement {
    pub fn return_type(&self) -> DataType {
        match &self.target.data_type {
            DataType::Function(function) => (*function.return_type).clone(),
            _ => DataType::Void,
        }
    }
}

/// One positional argument, keyed by the parameter it fills
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub param: String,
    pub value: Statement,
}
