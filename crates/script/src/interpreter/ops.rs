//! Coercions and operators with the usual loose-typing rules.
//!
//! Anything that walks an array or copies a string takes the call's
//! [`Meter`] and pays for that work.

use std::rc::Rc;

use super::meter::Meter;
use super::value::Value;
use crate::error::{Result, ScriptError};
use crate::syntax::ast::BinaryOp;

/// Arrays nested deeper than this render as empty when stringified, which
/// also stops self-containing arrays from recursing forever.
const MAX_DISPLAY_DEPTH: usize = 8;

/// Longest string a script may build, in bytes.
pub const MAX_STRING_LENGTH: usize = 1 << 20;

/// Budget for rendering a value into an error message.
const PREVIEW_UNITS: u64 = 256;

pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        (if n > 0.0 { "Infinity" } else { "-Infinity" }).to_owned()
    } else if n == 0.0 {
        "0".to_owned()
    } else {
        format!("{n}")
    }
}

pub fn string_to_number(s: &str) -> f64 {
    let text = s.trim();
    if text.is_empty() {
        return 0.0;
    }
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map_or(f64::NAN, |n| n as f64);
    }
    match text.trim_start_matches(['+', '-']) {
        "Infinity" if text.starts_with('-') => f64::NEG_INFINITY,
        "Infinity" => f64::INFINITY,
        // Rust accepts spellings such as "inf" and "nan" that scripts do not.
        body if body.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')) => {
            text.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

pub fn to_number(value: &Value, meter: &mut Meter) -> Result<f64> {
    Ok(match value {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => *n,
        Value::Str(s) => {
            meter.charge_bytes(s.len())?;
            string_to_number(s)
        }
        Value::Array(_) | Value::Object(_) => {
            let text = display(value, meter)?;
            string_to_number(&text)
        }
        Value::Function(_) | Value::Native(_) => f64::NAN,
    })
}

/// Metered string conversion, as used by `+`, `throw` and `console.log`.
pub fn display(value: &Value, meter: &mut Meter) -> Result<String> {
    let mut out = String::new();
    write_display(value, 0, &mut out, meter)?;
    Ok(out)
}

/// Short rendering for error messages. Output that would cost more than a
/// small fixed budget is cut off with `...`.
pub fn to_display_string(value: &Value) -> String {
    let mut out = String::new();
    let mut meter = Meter::new(PREVIEW_UNITS);
    if write_display(value, 0, &mut out, &mut meter).is_err() {
        out.push_str("...");
    }
    out
}

fn write_display(value: &Value, depth: usize, out: &mut String, meter: &mut Meter) -> Result<()> {
    meter.charge(1)?;
    match value {
        Value::Undefined => push(out, "undefined"),
        Value::Null => push(out, "null"),
        Value::Bool(b) => push(out, if *b { "true" } else { "false" }),
        Value::Number(n) => push(out, &number_to_string(*n)),
        Value::Str(s) => {
            meter.charge_bytes(s.len())?;
            push(out, s)
        }
        Value::Array(items) => {
            if depth >= MAX_DISPLAY_DEPTH {
                return Ok(());
            }
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    push(out, ",")?;
                }
                if item.is_nullish() {
                    meter.charge(1)?;
                } else {
                    write_display(item, depth + 1, out, meter)?;
                }
            }
            Ok(())
        }
        Value::Object(_) => push(out, "[object Object]"),
        Value::Function(closure) => match &closure.decl.name {
            Some(name) => push(out, &format!("function {name}() {{ ... }}")),
            None => push(out, "function () { ... }"),
        },
        Value::Native(builtin) => push(out, &format!("function {builtin}() {{ [native code] }}")),
    }
}

fn push(out: &mut String, text: &str) -> Result<()> {
    if out.len() + text.len() > MAX_STRING_LENGTH {
        return Err(ScriptError::Range("Invalid string length".to_owned()));
    }
    out.push_str(text);
    Ok(())
}

/// Key used for property access through `[]`.
pub fn to_property_key(value: &Value, meter: &mut Meter) -> Result<String> {
    display(value, meter)
}

/// Longest decimal spelling of an index.
const MAX_INDEX_DIGITS: usize = 10;

/// Array index denoted by `value`, if it is a non-negative integer.
pub fn to_index(value: &Value) -> Option<usize> {
    let n = match value {
        Value::Number(n) => *n,
        Value::Str(s) => {
            if s.is_empty() || s.len() > MAX_INDEX_DIGITS {
                return None;
            }
            let n = string_to_number(s);
            // "01" and " 1" are property names, not indices.
            if number_to_string(n) != **s {
                return None;
            }
            n
        }
        _ => return None,
    };
    (n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64).then_some(n as usize)
}

pub fn strict_equals(left: &Value, right: &Value, meter: &mut Meter) -> Result<bool> {
    Ok(match (left, right) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => {
            meter.charge_bytes(a.len().min(b.len()))?;
            a == b
        }
        (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
        (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Native(a), Value::Native(b)) => a == b,
        _ => false,
    })
}

/// `strict_equals`, except that `NaN` matches itself.
pub fn same_value_zero(left: &Value, right: &Value, meter: &mut Meter) -> Result<bool> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => Ok(true),
        _ => strict_equals(left, right, meter),
    }
}

pub fn loose_equals(left: &Value, right: &Value, meter: &mut Meter) -> Result<bool> {
    match (left, right) {
        (a, b) if a.is_nullish() || b.is_nullish() => Ok(a.is_nullish() && b.is_nullish()),
        (Value::Str(_), Value::Str(_)) => strict_equals(left, right, meter),
        (Value::Number(_) | Value::Str(_) | Value::Bool(_), Value::Number(_) | Value::Str(_) | Value::Bool(_)) => {
            Ok(to_number(left, meter)? == to_number(right, meter)?)
        }
        (Value::Array(_) | Value::Object(_), Value::Number(_) | Value::Str(_) | Value::Bool(_)) => {
            let text = Value::str(display(left, meter)?);
            loose_equals(&text, right, meter)
        }
        (Value::Number(_) | Value::Str(_) | Value::Bool(_), Value::Array(_) | Value::Object(_)) => {
            let text = Value::str(display(right, meter)?);
            loose_equals(left, &text, meter)
        }
        _ => strict_equals(left, right, meter),
    }
}

fn is_primitive(value: &Value) -> bool {
    matches!(
        value,
        Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::Str(_)
    )
}

pub fn binary(op: BinaryOp, left: &Value, right: &Value, meter: &mut Meter) -> Result<Value> {
    use BinaryOp::*;
    let number = |n: f64| -> Result<Value> { Ok(Value::Number(n)) };
    match op {
        Add => {
            let concat = matches!(left, Value::Str(_))
                || matches!(right, Value::Str(_))
                || !is_primitive(left)
                || !is_primitive(right);
            if concat {
                let mut out = String::new();
                write_display(left, 0, &mut out, meter)?;
                write_display(right, 0, &mut out, meter)?;
                Ok(Value::str(out))
            } else {
                number(to_number(left, meter)? + to_number(right, meter)?)
            }
        }
        Sub => number(to_number(left, meter)? - to_number(right, meter)?),
        Mul => number(to_number(left, meter)? * to_number(right, meter)?),
        Div => number(to_number(left, meter)? / to_number(right, meter)?),
        Rem => number(to_number(left, meter)? % to_number(right, meter)?),
        Eq => Ok(Value::Bool(loose_equals(left, right, meter)?)),
        NotEq => Ok(Value::Bool(!loose_equals(left, right, meter)?)),
        StrictEq => Ok(Value::Bool(strict_equals(left, right, meter)?)),
        StrictNotEq => Ok(Value::Bool(!strict_equals(left, right, meter)?)),
        Lt | LtEq | Gt | GtEq => {
            let ordering = match (left, right) {
                (Value::Str(a), Value::Str(b)) => {
                    meter.charge_bytes(a.len().min(b.len()))?;
                    Some(a.cmp(b))
                }
                _ => to_number(left, meter)?.partial_cmp(&to_number(right, meter)?),
            };
            Ok(Value::Bool(ordering.is_some_and(|o| match op {
                Lt => o.is_lt(),
                LtEq => o.is_le(),
                Gt => o.is_gt(),
                _ => o.is_ge(),
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter() -> Meter {
        Meter::new(10_000)
    }

    #[test]
    fn numbers_print_like_scripts_expect() {
        assert_eq!(number_to_string(3.0), "3");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(2.5), "2.5");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn strings_coerce_to_numbers() {
        assert_eq!(string_to_number(" 42 "), 42.0);
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("0x1f"), 31.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("12px").is_nan());
    }

    #[test]
    fn addition_concatenates_with_strings() {
        let mut meter = meter();
        let joined = binary(BinaryOp::Add, &Value::str("hp "), &Value::Number(5.0), &mut meter).unwrap();
        assert_eq!(to_display_string(&joined), "hp 5");
        let sum = binary(BinaryOp::Add, &Value::Bool(true), &Value::Number(1.0), &mut meter).unwrap();
        assert!(matches!(sum, Value::Number(n) if n == 2.0));
    }

    #[test]
    fn concatenation_is_capped() {
        let half = Value::str("x".repeat(MAX_STRING_LENGTH / 2 + 1));
        let mut meter = Meter::new(1_000_000);
        assert_eq!(
            binary(BinaryOp::Add, &half, &half, &mut meter).unwrap_err(),
            ScriptError::Range("Invalid string length".into())
        );
    }

    #[test]
    fn loose_equality_rules() {
        let mut m = meter();
        assert!(loose_equals(&Value::Null, &Value::Undefined, &mut m).unwrap());
        assert!(!loose_equals(&Value::Null, &Value::Number(0.0), &mut m).unwrap());
        assert!(loose_equals(&Value::str("1"), &Value::Number(1.0), &mut m).unwrap());
        assert!(loose_equals(&Value::Bool(true), &Value::Number(1.0), &mut m).unwrap());
        assert!(!strict_equals(&Value::str("1"), &Value::Number(1.0), &mut m).unwrap());
        assert!(!strict_equals(&Value::Number(f64::NAN), &Value::Number(f64::NAN), &mut m).unwrap());
    }

    #[test]
    fn self_containing_array_stringifies() {
        let items = Value::array(vec![Value::Number(1.0)]);
        if let Value::Array(inner) = &items {
            inner.borrow_mut().push(items.clone());
        }
        assert!(to_display_string(&items).starts_with("1,"));
    }

    #[test]
    fn wide_self_containing_array_runs_out_of_budget() {
        let items = Value::array(Vec::new());
        if let Value::Array(inner) = &items {
            inner.borrow_mut().resize(16, items.clone());
        }
        let mut meter = Meter::new(5_000);
        assert_eq!(display(&items, &mut meter), Err(ScriptError::BudgetExceeded(5_000)));
        assert!(to_display_string(&items).ends_with("..."));
        // Break the cycle so the test does not leak.
        if let Value::Array(inner) = &items {
            inner.borrow_mut().clear();
        }
    }

    #[test]
    fn index_keys() {
        assert_eq!(to_index(&Value::Number(2.0)), Some(2));
        assert_eq!(to_index(&Value::str("3")), Some(3));
        assert_eq!(to_index(&Value::str("03")), None);
        assert_eq!(to_index(&Value::Number(1.5)), None);
        assert_eq!(to_index(&Value::str("1".repeat(64))), None);
    }
}
