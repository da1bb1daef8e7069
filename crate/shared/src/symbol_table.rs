use lumina_types::TypeId;
use std::collections::HashMap;

/// A scoped table of local variable bindings (§4.3). A new scope is pushed
/// on entry to a symbol body, a pipeline body, or any `{ ... }` block that
/// introduces its own statements (if/while/for bodies); lookups search from
/// the innermost scope outward so an inner declaration can shadow an outer
/// one.
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, TypeId>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable { scopes: vec![HashMap::new()] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
        if self.scopes.is_empty() {
            self.scopes.push(HashMap::new());
        }
    }

    /// Defines `name` in the innermost scope. Returns `Err` if the name is
    /// already bound in that same scope (shadowing an outer scope is fine,
    /// redeclaring within one scope is not).
    pub fn define(&mut self, name: String, type_id: TypeId) -> Result<(), String> {
        let scope = self.scopes.last_mut().expect("symbol table always has at least one scope");
        if scope.contains_key(&name) {
            return Err(format!("'{name}' is already declared in this scope"));
        }
        scope.insert(name, type_id);
        Ok(())
    }

    /// Searches scopes from innermost to outermost.
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name).copied())
    }
}
