//! Turns script source into a callable decision function.

use arena_core::{ActorSnapshot, Decision};

use crate::analyzer::analyze_program;
use crate::error::{CompileError, ScriptError};
use crate::interpreter::{Interpreter, Limits, Value};
use crate::syntax::parse;

/// Name of the global function every script must define.
pub const ENTRY_POINT: &str = "decide";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    pub limits: Limits,
    /// Seed for the script's `Math.random`.
    pub seed: u64,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            seed: 0,
        }
    }
}

/// Result of one decision call. `error` is set when the script failed and
/// the neutral decision was substituted.
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation {
    pub decision: Decision,
    pub error: Option<ScriptError>,
}

/// A loaded script with its global state.
///
/// Globals persist between calls, so a script may keep counters or memory
/// across ticks. Snapshots are handed over as fresh objects on every call.
pub struct CompiledScript {
    interpreter: Interpreter,
    entry: Value,
}

impl std::fmt::Debug for CompiledScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledScript").finish_non_exhaustive()
    }
}

/// Analyzes, parses and loads `source`.
///
/// Loops that can never exit are rejected before any script code runs.
pub fn compile(source: &str, options: &CompileOptions) -> Result<CompiledScript, CompileError> {
    let program = parse(source)?;
    let report = analyze_program(&program);
    if !report.is_safe() {
        return Err(CompileError::UnsafeLoops(report));
    }

    let mut interpreter = Interpreter::new(options.limits, options.seed);
    interpreter.run(&program).map_err(CompileError::TopLevel)?;

    let entry = match interpreter.global(ENTRY_POINT) {
        Some(entry @ Value::Function(_)) => entry,
        _ => return Err(CompileError::EntryPointMissing),
    };
    tracing::debug!(
        statements = program.body.len(),
        operations = interpreter.operations(),
        "script compiled"
    );
    Ok(CompiledScript { interpreter, entry })
}

impl CompiledScript {
    /// Runs `decide(me, opponent)` inside a failure boundary.
    pub fn decide(&mut self, me: &ActorSnapshot, opponent: &ActorSnapshot) -> Invocation {
        let args = vec![snapshot_value(me), snapshot_value(opponent)];
        match self.interpreter.invoke(&self.entry, args) {
            Ok(result) => Invocation {
                decision: sanitize(&result),
                error: None,
            },
            Err(err) => {
                tracing::debug!(error = %err, "decision call failed");
                Invocation {
                    decision: Decision::NEUTRAL,
                    error: Some(err),
                }
            }
        }
    }
}

fn snapshot_value(snapshot: &ActorSnapshot) -> Value {
    Value::object_from([
        ("x", Value::Number(snapshot.x)),
        ("y", Value::Number(snapshot.y)),
        ("vx", Value::Number(snapshot.vx)),
        ("vy", Value::Number(snapshot.vy)),
        ("health", Value::Number(snapshot.health)),
        ("energy", Value::Number(snapshot.energy)),
        ("state", Value::Number(f64::from(snapshot.state))),
        ("direction", Value::Number(f64::from(snapshot.direction))),
        ("cooldown", Value::Number(f64::from(snapshot.cooldown))),
        ("width", Value::Number(snapshot.width)),
        ("height", Value::Number(snapshot.height)),
    ])
}

/// Only a boolean `true` turns an intent on. Non-object results are neutral.
fn sanitize(result: &Value) -> Decision {
    let Value::Object(fields) = result else {
        return Decision::NEUTRAL;
    };
    let fields = fields.borrow();
    Decision::from_fields(|name| match fields.get(name) {
        Some(Value::Bool(b)) => Some(*b),
        _ => None,
    })
}
