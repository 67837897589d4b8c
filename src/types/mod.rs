//! Declared types, placeholder unification, and symbol scopes
//!
//! - [`DataType`]: the closed set of SesaScript types plus the `Unresolved`
//!   placeholder used for not-yet-typed declarations
//! - [`scope`]: the two-tier symbol table threaded through the grammar
//! - [`errors`]: [`TypeError`]
//!
//! # Unification
//!
//! Equality on [`DataType`] is plain structural equality. Binding a placeholder
//! is a separate, explicit operation: [`DataType::unify`] succeeds when either
//! side is an unbound placeholder (and binds it to the other side), delegates
//! through an already bound placeholder, and otherwise requires the two
//! concrete types to be equal. A placeholder binds once; after that it behaves
//! exactly like the type it was bound to.
//!
//! A placeholder's slot is shared by every clone of it, so a binding made
//! through one copy (say, a parameter type looked up from the scope) is seen
//! by all of them.

pub mod errors;
pub mod scope;

pub use errors::TypeError;
pub use scope::{ParseContext, SymbolTable};

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// SesaScript types
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    /// Not yet known; filled in by the first unification
    Unresolved(Placeholder),
    String,
    Void,
    Function(FunctionType),
}

/// Bind-once slot behind [`DataType::Unresolved`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placeholder(Rc<RefCell<Option<DataType>>>);

impl Placeholder {
    fn bound(&self) -> Option<DataType> {
        self.0.borrow().clone()
    }

    fn bind(&self, data_type: DataType) {
        *self.0.borrow_mut() = Some(data_type);
    }

    fn same_slot(&self, other: &Placeholder) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Signature of a callable value
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    /// Name used for the function-pointer declarator in emitted C
    pub target_name: String,
    /// Parameters in declaration order; each binding's symbol is the parameter name
    pub params: Vec<VariableBinding>,
    pub return_type: Box<DataType>,
}

impl FunctionType {
    pub fn new(target_name: impl Into<String>, params: Vec<VariableBinding>, return_type: DataType) -> Self {
        Self {
            target_name: target_name.into(),
            params,
            return_type: Box::new(return_type),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl DataType {
    /// A fresh, unbound placeholder.
    pub fn unresolved() -> Self {
        DataType::Unresolved(Placeholder::default())
    }

    /// Whether a concrete type stands behind this one.
    pub fn is_resolved(&self) -> bool {
        !matches!(self.resolved(), DataType::Unresolved(_))
    }

    /// Follow placeholder bindings to a concrete type or the last unbound placeholder.
    fn resolved(&self) -> DataType {
        let mut current = self.clone();
        while let DataType::Unresolved(placeholder) = &current {
            match placeholder.bound() {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Unify `self` with `other`, binding whichever side is an unbound
    /// placeholder. Returns the type both sides now agree on.
    ///
    /// When both sides are unbound placeholders, `self` captures `other`: it
    /// stays unresolved until `other` is bound, then resolves to the same type.
    pub fn unify(&self, other: &DataType) -> Result<DataType, TypeError> {
        let this = self.resolved();
        let other = other.resolved();
        match (&this, &other) {
            (DataType::Unresolved(left), DataType::Unresolved(right)) if left.same_slot(right) => {
                Ok(this.clone())
            }
            (DataType::Unresolved(slot), _) => {
                slot.bind(other.clone());
                Ok(other.clone())
            }
            (_, DataType::Unresolved(slot)) => {
                slot.bind(this.clone());
                Ok(this.clone())
            }
            _ if this == other => Ok(this.clone()),
            _ => Err(TypeError::Mismatch {
                expected: this.name(),
                found: other.name(),
            }),
        }
    }

    /// The concrete type behind this one, following placeholder bindings.
    pub fn final_type(&self) -> Result<DataType, TypeError> {
        match self.resolved() {
            DataType::Unresolved(_) => Err(TypeError::Unresolved { symbol: None }),
            concrete => Ok(concrete),
        }
    }

    /// SesaScript spelling, e.g. `str` or `(message: str) -> void`.
    pub fn name(&self) -> String {
        match self.resolved() {
            DataType::Unresolved(_) => "infer".to_string(),
            DataType::String => "str".to_string(),
            DataType::Void => "void".to_string(),
            DataType::Function(function) => {
                let params: Vec<String> = function
                    .params
                    .iter()
                    .map(|param| format!("{}: {}", param.symbol, param.data_type.name()))
                    .collect();
                format!("({}) -> {}", params.join(", "), function.return_type.name())
            }
        }
    }

    /// C spelling used for declarations, e.g. `char[]` or `void (*printf_t)(char[])`.
    pub fn c_spelling(&self) -> Result<String, TypeError> {
        match self.final_type()? {
            DataType::Unresolved(_) => Err(TypeError::Unresolved { symbol: None }),
            DataType::String => Ok("char[]".to_string()),
            DataType::Void => Ok("void".to_string()),
            DataType::Function(function) => {
                let params = function
                    .params
                    .iter()
                    .map(|param| param.data_type.c_spelling())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!(
                    "{} (*{})({})",
                    function.return_type.c_spelling()?,
                    function.target_name,
                    params.join(", ")
                ))
            }
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A named, typed symbol
#[derive(Debug, Clone, PartialEq)]
pub struct VariableBinding {
    pub symbol: String,
    pub data_type: DataType,
}

impl VariableBinding {
    pub fn new(symbol: impl Into<String>, data_type: DataType) -> Self {
        Self {
            symbol: symbol.into(),
            data_type,
        }
    }

    /// The binding's concrete type; the error names the symbol.
    pub fn final_type(&self) -> Result<DataType, TypeError> {
        self.data_type
            .final_type()
            .map_err(|err| err.for_symbol(&self.symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printf_type() -> DataType {
        DataType::Function(FunctionType::new(
            "printf_t",
            vec![VariableBinding::new("message", DataType::String)],
            DataType::Void,
        ))
    }

    #[test]
    fn test_unresolved_unifies_once() {
        let placeholder = DataType::unresolved();

        assert_eq!(placeholder.unify(&DataType::String), Ok(DataType::String));
        assert_eq!(placeholder.final_type(), Ok(DataType::String));

        // Bound now: behaves like `str`
        assert!(placeholder.unify(&DataType::Void).is_err());
        assert_eq!(placeholder.final_type(), Ok(DataType::String));
    }

    #[test]
    fn test_fresh_unresolved_has_no_final_type() {
        let placeholder = DataType::unresolved();
        assert!(!placeholder.is_resolved());
        assert_eq!(
            placeholder.final_type(),
            Err(TypeError::Unresolved { symbol: None })
        );
    }

    #[test]
    fn test_binding_error_names_symbol() {
        let binding = VariableBinding::new("x", DataType::unresolved());
        let err = binding.final_type().unwrap_err();
        assert_eq!(
            err,
            TypeError::Unresolved {
                symbol: Some("x".to_string())
            }
        );
        assert_eq!(err.to_string(), "No type was inferred for 'x'");
    }

    #[test]
    fn test_concrete_on_left_binds_right() {
        let placeholder = DataType::unresolved();
        assert_eq!(DataType::Void.unify(&placeholder), Ok(DataType::Void));
        assert_eq!(placeholder.final_type(), Ok(DataType::Void));
    }

    #[test]
    fn test_concrete_mismatch() {
        let err = DataType::String.unify(&printf_type()).unwrap_err();
        assert_eq!(
            err,
            TypeError::Mismatch {
                expected: "str".to_string(),
                found: "(message: str) -> void".to_string(),
            }
        );
    }

    #[test]
    fn test_function_types_compare_structurally() {
        assert_eq!(printf_type().unify(&printf_type()), Ok(printf_type()));
    }

    #[test]
    fn test_left_placeholder_captures_right_placeholder() {
        let left = DataType::unresolved();
        let right = DataType::unresolved();
        assert!(left.unify(&right).is_ok());
        assert!(!left.is_resolved());
        assert!(left.final_type().is_err());
        assert!(!right.is_resolved());
    }

    #[test]
    fn test_captured_placeholder_follows_later_binding() {
        let left = DataType::unresolved();
        let right = DataType::unresolved();
        left.unify(&right).unwrap();

        right.unify(&DataType::String).unwrap();

        assert_eq!(right.final_type(), Ok(DataType::String));
        assert_eq!(left.final_type(), Ok(DataType::String));
        assert_eq!(left.name(), "str");
        assert!(left.unify(&DataType::Void).is_err());
    }

    #[test]
    fn test_binding_through_the_capturing_side() {
        let left = DataType::unresolved();
        let right = DataType::unresolved();
        left.unify(&right).unwrap();

        // Binds the placeholder at the end of the chain
        left.unify(&DataType::Void).unwrap();

        assert_eq!(right.final_type(), Ok(DataType::Void));
        assert_eq!(left.final_type(), Ok(DataType::Void));
    }

    #[test]
    fn test_mutual_capture_does_not_cycle() {
        let left = DataType::unresolved();
        let right = DataType::unresolved();
        left.unify(&right).unwrap();
        right.unify(&left).unwrap();
        assert!(!left.is_resolved());

        left.unify(&DataType::String).unwrap();
        assert_eq!(right.final_type(), Ok(DataType::String));
    }

    #[test]
    fn test_clones_share_the_slot() {
        let placeholder = DataType::unresolved();
        let copy = placeholder.clone();
        copy.unify(&DataType::String).unwrap();
        assert_eq!(placeholder.final_type(), Ok(DataType::String));
    }

    #[test]
    fn test_native_equality_has_no_side_effect() {
        let placeholder = DataType::unresolved();
        assert_ne!(placeholder, DataType::String);
        assert!(!placeholder.is_resolved());
    }

    #[test]
    fn test_c_spelling() {
        assert_eq!(DataType::String.c_spelling().unwrap(), "char[]");
        assert_eq!(DataType::Void.c_spelling().unwrap(), "void");
        assert_eq!(
            printf_type().c_spelling().unwrap(),
            "void (*printf_t)(char[])"
        );
        assert!(DataType::unresolved().c_spelling().is_err());
    }
}
