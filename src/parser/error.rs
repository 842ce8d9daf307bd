use thiserror::Error as ThisError;

use super::locations::Span;

#[derive(Debug, Clone, PartialEq, ThisError)]
#[error("{message} at {span}")]
pub struct Error {
    pub(crate) span: Span,
    pub(crate) message: String,
}

impl Error {
    pub fn new(span: Span, msg: &str) -> Self {
        Self {
            span,
            message: msg.to_string(),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
