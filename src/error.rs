use thiserror::Error;

/// Errors that can occur when working with a [`Context`](crate::Context)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// No context is bound to the current task
    #[error("no context is bound to the current task")]
    NoCurrentContext,
    /// Attempted to read a value with a type that doesn't match what was stored
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}
