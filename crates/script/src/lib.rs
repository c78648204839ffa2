//! Behavior script language for arena fighters.
//!
//! A script is plain source text defining `function decide(self, opponent)`.
//! [`analyze`] rejects loops that can never exit, [`compile`] loads the
//! script into a sandboxed interpreter, and [`CompiledScript::decide`] turns
//! two actor snapshots into a sanitized [`arena_core::Decision`].
//!
//! The interpreter is single-threaded (`Rc`-based values); hosts run each
//! compiled script on a thread of its own.
pub mod analyzer;
pub mod compiler;
pub mod error;
pub mod interpreter;
pub mod syntax;

pub use analyzer::{DangerousLoop, LoopKind, SafetyReport, analyze};
pub use compiler::{CompileOptions, CompiledScript, ENTRY_POINT, Invocation, compile};
pub use error::{CompileError, ScriptError, SyntaxError};
pub use interpreter::Limits;
