//! Host functions visible to scripts: the `Math` object and `console`.

use std::fmt;

use rand::Rng;
use rand::rngs::StdRng;
use strum::IntoEnumIterator;

use super::meter::Meter;
use super::ops::{display, to_number};
use super::scope::Scope;
use super::value::Value;
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumIter, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum MathFn {
    Abs,
    Floor,
    Ceil,
    Round,
    Trunc,
    Min,
    Max,
    Sqrt,
    Pow,
    Sign,
    Random,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Math(MathFn),
    ConsoleLog,
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Math(func) => f.write_str(func.into()),
            Self::ConsoleLog => f.write_str("log"),
        }
    }
}

/// Binds the host globals into `scope`.
pub fn install(scope: &Scope) {
    let mut math: Vec<(&str, Value)> = MathFn::iter()
        .map(|func| (<&'static str>::from(func), Value::Native(Builtin::Math(func))))
        .collect();
    math.push(("PI", Value::Number(std::f64::consts::PI)));
    math.push(("E", Value::Number(std::f64::consts::E)));

    scope.define("Math", Value::object_from(math));
    scope.define(
        "console",
        Value::object_from([("log", Value::Native(Builtin::ConsoleLog))]),
    );
    scope.define("NaN", Value::Number(f64::NAN));
    scope.define("Infinity", Value::Number(f64::INFINITY));
}

pub fn call(builtin: Builtin, args: &[Value], rng: &mut StdRng, meter: &mut Meter) -> Result<Value> {
    match builtin {
        Builtin::Math(func) => {
            let numbers = args
                .iter()
                .map(|arg| to_number(arg, meter))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Number(math(func, &numbers, rng)))
        }
        Builtin::ConsoleLog => {
            let line = args
                .iter()
                .map(|arg| display(arg, meter))
                .collect::<Result<Vec<_>>>()?
                .join(" ");
            tracing::debug!(target: "arena_script::console", "{line}");
            Ok(Value::Undefined)
        }
    }
}

fn math(func: MathFn, args: &[f64], rng: &mut StdRng) -> f64 {
    let arg = |i: usize| args.get(i).copied().unwrap_or(f64::NAN);
    match func {
        MathFn::Abs => arg(0).abs(),
        MathFn::Floor => arg(0).floor(),
        MathFn::Ceil => arg(0).ceil(),
        // Halves round toward positive infinity.
        MathFn::Round => (arg(0) + 0.5).floor(),
        MathFn::Trunc => arg(0).trunc(),
        MathFn::Min => args.iter().fold(f64::INFINITY, |acc, &n| {
            if acc.is_nan() || n.is_nan() { f64::NAN } else { acc.min(n) }
        }),
        MathFn::Max => args.iter().fold(f64::NEG_INFINITY, |acc, &n| {
            if acc.is_nan() || n.is_nan() { f64::NAN } else { acc.max(n) }
        }),
        MathFn::Sqrt => arg(0).sqrt(),
        MathFn::Pow => arg(0).powf(arg(1)),
        MathFn::Sign => {
            let n = arg(0);
            if n.is_nan() || n == 0.0 { n } else { n.signum() }
        }
        MathFn::Random => rng.r#gen::<f64>(),
    }
}
