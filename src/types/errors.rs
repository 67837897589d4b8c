//! Type error definitions
//!
//! [`TypeError`] covers the two ways a type can disagree with the program:
//!
//! - `Mismatch` is returned by [`DataType::unify`](super::DataType::unify). Grammar
//!   rules treat it as an ordinary "no match" and try the next alternative.
//! - `Unresolved` is raised when the final type of a placeholder that was never
//!   unified is requested. It is fatal and aborts the whole parse.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Two concrete types that are not structurally equal
    Mismatch { expected: String, found: String },

    /// `final_type()` on a placeholder that never met a concrete type
    Unresolved { symbol: Option<String> },
}

impl TypeError {
    /// Attach the symbol whose type failed to resolve.
    pub fn for_symbol(self, symbol: &str) -> Self {
        match self {
            TypeError::Unresolved { symbol: None } => TypeError::Unresolved {
                symbol: Some(symbol.to_string()),
            },
            other => other,
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::Mismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            TypeError::Unresolved { symbol: Some(symbol) } => {
                write!(f, "No type was inferred for '{}'", symbol)
            }
            TypeError::Unresolved { symbol: None } => write!(f, "No type was inferred"),
        }
    }
}

impl std::error::Error for TypeError {}
