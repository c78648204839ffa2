//! Error types for script compilation and execution.

use crate::analyzer::SafetyReport;

/// Parse failure with the offending source line.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: u32,
    pub message: String,
}

impl SyntaxError {
    pub(crate) fn new(line: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Reasons a script source cannot be turned into a decision function.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// Static safety analysis found at least one loop that can never exit.
    #[error("{0}")]
    UnsafeLoops(SafetyReport),

    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("no decision entry point found; define `function decide(self, opponent) {{ ... }}`")]
    EntryPointMissing,

    /// Top-level statements failed while the script was being loaded.
    #[error("script failed while loading: {0}")]
    TopLevel(#[source] ScriptError),
}

/// Errors raised while interpreting a script.
///
/// These never escape a decision call: the compiled script records the
/// message and answers with the neutral decision.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ScriptError {
    #[error("ReferenceError: {0}")]
    Reference(String),

    #[error("TypeError: {0}")]
    Type(String),

    #[error("RangeError: {0}")]
    Range(String),

    /// A value raised with `throw`.
    #[error("Uncaught {0}")]
    Thrown(String),

    #[error("operation budget of {0} exceeded")]
    BudgetExceeded(u64),

    #[error("maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),
}

pub type Result<T, E = ScriptError> = std::result::Result<T, E>;
