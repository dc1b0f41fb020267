//! Error types for evaluation, selection, and property application.
//!
//! Nothing here is fatal to the host. Evaluation errors cost one selector or
//! one value; application errors are collected and handed back from
//! [`crate::cascade::apply`].

use thiserror::Error;

/// Failure while evaluating an arithmetic token list or an nth-child argument.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The token list was empty.
    #[error("empty expression")]
    EmptyExpression,
    /// A `/` whose right operand evaluated to zero.
    #[error("division by zero")]
    DivisionByZero,
    /// A token that cannot appear where it was found. `position` is the
    /// index into the token list; it equals the list length when the
    /// expression ended early (e.g. a dangling operator).
    #[error("unexpected token at position {position}: {token:?}")]
    UnexpectedToken {
        /// Index of the offending token.
        position: usize,
        /// The offending token text, empty at end of input.
        token: String,
    },
    /// A `(` without its closing `)`.
    #[error("mismatched parenthesis, expecting ')' at position {position}")]
    MismatchedParenthesis {
        /// Index where `)` was expected.
        position: usize,
    },
    /// Parentheses nested deeper than [`crate::expr::MAX_DEPTH`].
    #[error("parentheses nested too deep at position {position}")]
    NestingTooDeep {
        /// Index of the `(` that went past the limit.
        position: usize,
    },
    /// An nth pseudo-class without arguments.
    #[error("nth selector has no arguments")]
    NoArguments,
    /// An nth pseudo-class scoped to an element without children.
    #[error("element has no children")]
    NoChildren,
    /// An nth step that is zero or negative.
    #[error("invalid nth step {value}, expected a positive integer")]
    InvalidSkip {
        /// The rejected step.
        value: i64,
    },
}

/// Failure raised while matching selectors or resolving and applying values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    /// A malformed token sequence.
    #[error("malformed token sequence: {0}")]
    ParseToken(String),
    /// Arithmetic or nth argument evaluation failed.
    #[error(transparent)]
    Eval(#[from] EvalError),
    /// A structural pseudo-class needed children the element does not have.
    #[error("pseudo-class :{name} found no children")]
    NoChildren {
        /// The pseudo-class key.
        name: String,
    },
    /// The pseudo-class is in the catalogue but has no behavior.
    #[error("pseudo-class :{name} is not implemented")]
    PseudoNotImplemented {
        /// The pseudo-class key.
        name: String,
    },
    /// No function with this name is registered.
    #[error("unknown function {name}()")]
    FunctionUnknown {
        /// The function name as written.
        name: String,
    },
    /// A registered function rejected its arguments.
    #[error("{name}() failed: {reason}")]
    FunctionFailed {
        /// The function key.
        name: String,
        /// Why the arguments were rejected.
        reason: String,
    },
    /// The host could not apply a property.
    #[error("failed to apply '{property}': {cause}")]
    PropertyApplyFailed {
        /// The property name.
        property: String,
        /// The host's explanation.
        cause: String,
    },
}

impl StyleError {
    /// Convenience constructor for [`StyleError::FunctionFailed`].
    #[must_use]
    pub fn function_failed(name: &str, reason: impl Into<String>) -> Self {
        Self::FunctionFailed {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`StyleError::PropertyApplyFailed`].
    #[must_use]
    pub fn apply_failed(property: &str, cause: impl Into<String>) -> Self {
        Self::PropertyApplyFailed {
            property: property.to_string(),
            cause: cause.into(),
        }
    }
}
