use std::collections::HashMap;

use tracing::debug;

use super::error::RuntimeError;
use super::value::Value;

/// Names mapped to stacks of values, plus the names each open scope introduced.
///
/// The innermost binding of a name is the top of its stack. Closing a scope
/// pops exactly the bindings that scope introduced, which brings shadowed
/// outer bindings back into view.
#[derive(Debug, Default)]
pub struct SymbolTable {
    bindings: HashMap<String, Vec<Value>>,
    scopes: Vec<Vec<String>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn open_scope(&mut self) {
        self.scopes.push(vec![]);
        debug!(depth = self.scopes.len(), "opening scope");
    }

    pub fn close_scope(&mut self) -> Result<(), RuntimeError> {
        let depth = self.scopes.len();
        let names = self
            .scopes
            .pop()
            .ok_or_else(|| RuntimeError::ScopeCorruption("no open scope to close".to_string()))?;
        debug!(depth, "closing scope");

        let mut result = Ok(());
        for name in names {
            let Some(stack) = self.bindings.get_mut(&name) else {
                result = result.and(Err(not_properly_bound(&name)));
                continue;
            };
            if stack.pop().is_none() {
                result = result.and(Err(not_properly_bound(&name)));
            } else {
                debug!(name = name.as_str(), "removing binding");
            }
            if stack.is_empty() {
                self.bindings.remove(&name);
            }
        }
        result
    }

    /// Introduces a fresh binding of `name` in the innermost scope.
    pub fn bind(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let scope = self.scopes.last_mut().ok_or_else(|| {
            RuntimeError::ScopeCorruption(format!("cannot bind `{name}` outside of any scope"))
        })?;
        if scope.iter().any(|bound| bound == name) {
            return Err(RuntimeError::DuplicateBinding(name.to_string()));
        }
        scope.push(name.to_string());
        self.bindings
            .entry(name.to_string())
            .or_default()
            .push(value);
        Ok(())
    }

    /// Replaces the innermost visible value of `name`, whichever scope introduced it.
    pub fn rebind(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        match self.bindings.get_mut(name).and_then(|stack| stack.last_mut()) {
            Some(slot) => {
                debug!(name, %value, "replacing value");
                *slot = value;
                Ok(())
            }
            None => Err(RuntimeError::UnboundVariable(name.to_string())),
        }
    }

    pub fn lookup(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.bindings
            .get(name)
            .and_then(|stack| stack.last())
            .ok_or_else(|| RuntimeError::UnboundVariable(name.to_string()))
    }
}

fn not_properly_bound(name: &str) -> RuntimeError {
    RuntimeError::ScopeCorruption(format!("variable `{name}` was not properly bound"))
}
