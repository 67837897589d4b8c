//! Parse context: symbol scopes and block formatting state
//!
//! The context is created once per top-level parse and threaded by mutable
//! reference through every grammar rule. Scopes only ever grow; nothing is
//! removed mid-parse.

use super::{DataType, FunctionType, VariableBinding};
use rustc_hash::FxHashMap;

pub type SymbolTable = FxHashMap<String, VariableBinding>;

/// Module name whose parse receives the built-in bindings
pub const MAIN_MODULE: &str = "main";

#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Built-in and imported bindings
    pub enclosing_vars: SymbolTable,
    /// Bindings declared by this parse (first assignment declares)
    pub local_vars: SymbolTable,
    /// Whitespace tokens expected before each statement of the current block
    pub indent_width: usize,
    pub module_name: String,
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new(MAIN_MODULE)
    }
}

impl ParseContext {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            enclosing_vars: SymbolTable::default(),
            local_vars: SymbolTable::default(),
            indent_width: 0,
            module_name: module_name.into(),
        }
    }

    pub fn is_main(&self) -> bool {
        self.module_name == MAIN_MODULE
    }

    /// Seed the enclosing scope with [`builtins`]. Existing entries win.
    pub fn install_builtins(&mut self) {
        for (symbol, binding) in builtins() {
            self.enclosing_vars.entry(symbol).or_insert(binding);
        }
    }

    /// Look a symbol up in the local scope, then the enclosing one.
    pub fn lookup(&self, symbol: &str) -> Option<&VariableBinding> {
        self.local_vars
            .get(symbol)
            .or_else(|| self.enclosing_vars.get(symbol))
    }

    /// Register `binding` locally unless the symbol is already declared.
    /// Returns whether it was inserted.
    pub fn declare(&mut self, binding: VariableBinding) -> bool {
        if self.local_vars.contains_key(&binding.symbol) {
            return false;
        }
        self.local_vars.insert(binding.symbol.clone(), binding);
        true
    }
}

/// Bindings every `main` module can see.
///
/// `printf(message: str) -> void`, spelled `printf_t` as a C function pointer.
pub fn builtins() -> SymbolTable {
    let mut table = SymbolTable::default();
    let printf = FunctionType::new(
        "printf_t",
        vec![VariableBinding::new("message", DataType::String)],
        DataType::Void,
    );
    table.insert(
        "printf".to_string(),
        VariableBinding::new("printf", DataType::Function(printf)),
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_contain_printf() {
        let table = builtins();
        assert_eq!(table.len(), 1);
        let printf = &table["printf"];
        match &printf.data_type {
            DataType::Function(function) => {
                assert_eq!(function.arity(), 1);
                assert_eq!(function.params[0].symbol, "message");
                assert_eq!(function.params[0].data_type, DataType::String);
                assert_eq!(*function.return_type, DataType::Void);
            }
            other => panic!("Expected function type, got {:?}", other),
        }
    }

    #[test]
    fn test_install_builtins() {
        let mut context = ParseContext::default();
        assert!(context.is_main());
        assert!(context.lookup("printf").is_none());
        context.install_builtins();
        assert!(context.lookup("printf").is_some());
        assert!(context.local_vars.is_empty());
    }

    #[test]
    fn test_local_shadows_enclosing() {
        let mut context = ParseContext::default();
        context.install_builtins();
        context.declare(VariableBinding::new("printf", DataType::String));
        assert_eq!(
            context.lookup("printf").map(|b| &b.data_type),
            Some(&DataType::String)
        );
    }

    #[test]
    fn test_declare_keeps_first_binding() {
        let mut context = ParseContext::new("lib");
        assert!(!context.is_main());
        assert!(context.declare(VariableBinding::new("x", DataType::String)));
        assert!(!context.declare(VariableBinding::new("x", DataType::Void)));
        assert_eq!(context.local_vars["x"].data_type, DataType::String);
    }
}
