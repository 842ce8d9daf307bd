use thiserror::Error;

/// Faults raised while evaluating a program.
///
/// All of them except [`RuntimeError::ScopeCorruption`] and
/// [`RuntimeError::Io`] are recoverable: they set the interpreter's error flag
/// and the faulting operation yields `unset`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("no binding for variable `{0}` exists")]
    UnboundVariable(String),

    #[error("variable `{0}` is already bound in this scope")]
    DuplicateBinding(String),

    #[error("type mismatch: expected a {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("a value of type {0} is not callable")]
    NotCallable(&'static str),

    #[error("scope corruption: {0}")]
    ScopeCorruption(String),

    #[error("malformed input `{0}`: expected an integer")]
    MalformedInput(String),

    #[error("i/o failure: {0}")]
    Io(String),
}

impl RuntimeError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ScopeCorruption(_) | Self::Io(_))
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}
