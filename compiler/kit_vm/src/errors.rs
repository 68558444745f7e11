//! Error types for the execution engine, compiler and vocabulary.
//!
//! Every core operation returns [`VmResult`]. Errors are never caught and
//! resumed where they are raised; they propagate with `?` up to the
//! interpreter loop, which reports them and resets the machine.
//!
//! The diagnostic form of an error is `"<ErrorKind>: <context>"`, which is
//! exactly what `VmError`'s `Display` produces.
//!
//! Call sites use the constructor functions in this module rather than
//! building `VmError` by hand, so the context wording stays in one place.

use kit_lexer::Token;

use crate::value::Value;

/// Result of a core operation.
pub type VmResult<T> = Result<T, VmError>;

/// Closed set of error categories.
///
/// `Display` is the bare category name; it is the left half of every
/// diagnostic line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum VmErrorKind {
    /// A lookup that was required to succeed found nothing.
    #[error("UnknownWord")]
    UnknownWord,
    /// Pop on an empty stack.
    #[error("StackUnderflow")]
    StackUnderflow,
    /// A popped value did not have the variant an operation required.
    #[error("InvalidParam")]
    InvalidParam,
    /// The engine met something other than a word reference or pseudo-entry
    /// while threading a body, or a body is otherwise unusable.
    #[error("MalformedBody")]
    MalformedBody,
    /// The compiler or loop received a token kind it cannot handle.
    #[error("UnknownTokenType")]
    UnknownTokenType,
    /// Nested execution went deeper than the configured call depth.
    #[error("StackOverflow")]
    StackOverflow,
    #[error("DivisionByZero")]
    DivisionByZero,
    /// A compile-only word ran in execute mode.
    #[error("CompileOnly")]
    CompileOnly,
    /// `else`/`then` without `if`, or `;` with branch targets still pending.
    #[error("UnbalancedControl")]
    UnbalancedControl,
    /// A defining word needed a name but the input ran out.
    #[error("MissingName")]
    MissingName,
}

/// A core error: its category plus human-readable context.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {context}")]
pub struct VmError {
    pub kind: VmErrorKind,
    pub context: String,
}

impl VmError {
    /// An error of `kind` with free-form context.
    pub fn new(kind: VmErrorKind, context: impl Into<String>) -> Self {
        VmError {
            kind,
            context: context.into(),
        }
    }

    /// The category, for matching without parsing the message.
    #[inline]
    pub fn kind(&self) -> VmErrorKind {
        self.kind
    }
}

// Lookup

/// No visible entry is named `name`.
pub fn unknown_word(name: &str) -> VmError {
    VmError::new(VmErrorKind::UnknownWord, name)
}

// Stacks

/// Popped or peeked an empty stack; `stack` names which one.
pub fn stack_underflow(stack: &str) -> VmError {
    VmError::new(VmErrorKind::StackUnderflow, format!("{stack} is empty"))
}

/// Compiled calls nested deeper than the return stack allows.
pub fn recursion_limit_exceeded(max_depth: usize) -> VmError {
    VmError::new(
        VmErrorKind::StackOverflow,
        format!("call depth exceeded {max_depth}"),
    )
}

// Parameters

/// A word got an operand it cannot use.
pub fn invalid_param(detail: impl Into<String>) -> VmError {
    VmError::new(VmErrorKind::InvalidParam, detail)
}

/// A popped value had the wrong variant.
pub fn type_mismatch(word: &str, expected: &str, got: &Value) -> VmError {
    invalid_param(format!(
        "{word} expected {expected}, got {}",
        got.type_name()
    ))
}

/// `/` or `mod` with a zero divisor.
pub fn division_by_zero(word: &str) -> VmError {
    VmError::new(VmErrorKind::DivisionByZero, word)
}

// Bodies

/// A body holds something the engine cannot thread, or is incomplete.
pub fn malformed_body(detail: impl Into<String>) -> VmError {
    VmError::new(VmErrorKind::MalformedBody, detail)
}

// Compilation

/// A token that cannot be interpreted or compiled, such as end of input.
pub fn unknown_token_type(token: &Token) -> VmError {
    VmError::new(
        VmErrorKind::UnknownTokenType,
        format!("{} `{token}`", token.kind),
    )
}

/// A control word ran outside a definition.
pub fn compile_only(word: &str) -> VmError {
    VmError::new(
        VmErrorKind::CompileOnly,
        format!("{word} is only valid inside a definition"),
    )
}

/// `else`/`then` without an `if`, or `;` with branches still open.
pub fn unbalanced_control(detail: impl Into<String>) -> VmError {
    VmError::new(VmErrorKind::UnbalancedControl, detail)
}

/// A defining word hit end of input before its name.
pub fn missing_name(word: &str) -> VmError {
    VmError::new(
        VmErrorKind::MissingName,
        format!("{word} needs a name to follow it"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diagnostic_format() {
        assert_eq!(unknown_word("frob").to_string(), "UnknownWord: frob");
        assert_eq!(
            stack_underflow("data stack").to_string(),
            "StackUnderflow: data stack is empty"
        );
    }

    #[test]
    fn test_type_mismatch_names_the_variant() {
        let err = type_mismatch("!", "a word reference", &Value::Integer(3));
        assert_eq!(err.kind(), VmErrorKind::InvalidParam);
        assert_eq!(err.context, "! expected a word reference, got integer");
    }

    #[test]
    fn test_unknown_token_type_context() {
        let err = unknown_token_type(&Token::end_of_input());
        assert_eq!(
            err.to_string(),
            "UnknownTokenType: end of input `<end of input>`"
        );
    }
}
