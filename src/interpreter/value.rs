use std::rc::Rc;

use derivative::Derivative;

use super::error::RuntimeError;
use crate::parser::Statement;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Number(i32),
    Boolean(bool),
    Function(Closure),
    #[default]
    Unset,
}

/// A single-parameter function. Nothing from the defining scope is captured:
/// the body sees whatever bindings are live when it is called.
#[derive(Derivative, Clone)]
#[derivative(Debug, PartialEq)]
pub struct Closure {
    pub(crate) param: String,
    #[derivative(Debug = "ignore", PartialEq(compare_with = "Rc::ptr_eq"))]
    pub(crate) body: Rc<Statement>,
}

impl Closure {
    pub fn new(param: String, body: Rc<Statement>) -> Self {
        Self { param, body }
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn body(&self) -> &Statement {
        &self.body
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Function(_) => "function",
            Self::Unset => "unset",
        }
    }

    pub fn as_number(&self) -> Result<i32, RuntimeError> {
        match self {
            Self::Number(n) => Ok(*n),
            other => Err(other.mismatch("number")),
        }
    }

    pub fn as_boolean(&self) -> Result<bool, RuntimeError> {
        match self {
            Self::Boolean(b) => Ok(*b),
            other => Err(other.mismatch("boolean")),
        }
    }

    pub fn as_function(&self) -> Result<&Closure, RuntimeError> {
        match self {
            Self::Function(closure) => Ok(closure),
            other => Err(other.mismatch("function")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> RuntimeError {
        RuntimeError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Function(_) => f.write_str("lambda expression"),
            Self::Unset => f.write_str("unset"),
        }
    }
}
