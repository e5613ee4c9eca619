use crate::template::eval::{display, is_truthy};
use crate::template::TemplateError;
use serde_json::{Number, Value};
use std::cmp::Ordering;

const FUNCTIONS: [&str; 15] = [
    "round", "upper", "lower", "trim", "default", "len", "not", "and", "or", "eq", "ne", "lt",
    "le", "gt", "ge",
];

/// Largest magnitude at which an `f64` can still carry a fractional part.
const FRACTION_LIMIT: f64 = 4_503_599_627_370_496.0;

pub fn is_known(name: &str) -> bool {
    FUNCTIONS.contains(&name)
}

pub fn call(name: &str, args: Vec<Value>) -> Result<Value, TemplateError> {
    match name {
        "round" => {
            let [value, precision] = exact::<2>(name, args)?;
            let value = number(name, &value)?;
            let precision = precision_arg(&precision)?;
            float_value(name, round_to(value, precision))
        }
        "upper" => {
            let [value] = exact::<1>(name, args)?;
            Ok(Value::String(display(&value).to_uppercase()))
        }
        "lower" => {
            let [value] = exact::<1>(name, args)?;
            Ok(Value::String(display(&value).to_lowercase()))
        }
        "trim" => {
            let [value] = exact::<1>(name, args)?;
            Ok(Value::String(display(&value).trim().to_string()))
        }
        "default" => {
            let [fallback, value] = exact::<2>(name, args)?;
            Ok(if is_truthy(&value) { value } else { fallback })
        }
        "len" => {
            let [value] = exact::<1>(name, args)?;
            let len = match &value {
                Value::String(s) => s.chars().count(),
                Value::Array(items) => items.len(),
                Value::Object(map) => map.len(),
                Value::Null => 0,
                other => {
                    return Err(TemplateError::arguments(
                        name,
                        format!("cannot take length of {}", other),
                    ))
                }
            };
            Ok(Value::from(len))
        }
        "not" => {
            let [value] = exact::<1>(name, args)?;
            Ok(Value::Bool(!is_truthy(&value)))
        }
        "and" => {
            at_least(name, &args, 1)?;
            let mut last = Value::Null;
            for value in args {
                if !is_truthy(&value) {
                    return Ok(value);
                }
                last = value;
            }
            Ok(last)
        }
        "or" => {
            at_least(name, &args, 1)?;
            let mut last = Value::Null;
            for value in args {
                if is_truthy(&value) {
                    return Ok(value);
                }
                last = value;
            }
            Ok(last)
        }
        "eq" => {
            at_least(name, &args, 2)?;
            let (first, rest) = args.split_at(1);
            Ok(Value::Bool(rest.iter().any(|v| equals(&first[0], v))))
        }
        "ne" => {
            let [a, b] = exact::<2>(name, args)?;
            Ok(Value::Bool(!equals(&a, &b)))
        }
        "lt" | "le" | "gt" | "ge" => {
            let [a, b] = exact::<2>(name, args)?;
            let ordering = compare(name, &a, &b)?;
            let result = match name {
                "lt" => ordering == Ordering::Less,
                "le" => ordering != Ordering::Greater,
                "gt" => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Ok(Value::Bool(result))
        }
        other => Err(TemplateError::UnknownFunction(other.to_string())),
    }
}

/// Round `value` to `precision` decimal digits, ties away from zero.
///
/// The result never carries a negative zero, so it prints as `0`.
pub fn round_to(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let factor = 10f64.powi(precision.min(i32::MAX as u32) as i32);
    let scaled = value * factor;
    let rounded = if !scaled.is_finite() || scaled.abs() >= FRACTION_LIMIT {
        value
    } else {
        scaled.round() / factor
    };

    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn exact<const N: usize>(name: &str, args: Vec<Value>) -> Result<[Value; N], TemplateError> {
    let count = args.len();
    args.try_into().map_err(|_| {
        TemplateError::arguments(name, format!("expected {} argument(s), got {}", N, count))
    })
}

fn at_least(name: &str, args: &[Value], min: usize) -> Result<(), TemplateError> {
    if args.len() < min {
        return Err(TemplateError::arguments(
            name,
            format!("expected at least {} argument(s), got {}", min, args.len()),
        ));
    }
    Ok(())
}

fn number(name: &str, value: &Value) -> Result<f64, TemplateError> {
    value
        .as_f64()
        .ok_or_else(|| TemplateError::arguments(name, format!("expected a number, got {}", value)))
}

fn precision_arg(value: &Value) -> Result<u32, TemplateError> {
    let precision = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        _ => None,
    };

    precision
        .and_then(|p| u32::try_from(p).ok())
        .ok_or_else(|| {
            TemplateError::arguments(
                "round",
                format!("precision must be a non-negative integer, got {}", value),
            )
        })
}

fn float_value(name: &str, value: f64) -> Result<Value, TemplateError> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| TemplateError::arguments(name, "result is not a finite number"))
}

fn equals(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) if a.is_number() && b.is_number() => x == y,
        _ => a == b,
    }
}

fn compare(name: &str, a: &Value, b: &Value) -> Result<Ordering, TemplateError> {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => {
            let (x, y) = (number(name, a)?, number(name, b)?);
            x.partial_cmp(&y)
                .ok_or_else(|| TemplateError::arguments(name, "numbers are not comparable"))
        }
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        _ => Err(TemplateError::arguments(
            name,
            format!("cannot compare {} with {}", a, b),
        )),
    }
}
