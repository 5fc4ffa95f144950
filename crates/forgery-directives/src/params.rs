use serde_json::Value;

use forgery_core::{Error, FromValue, Result};

/// Declared type of a directive parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Bool,
    Int,
    Float,
    Text,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::Bool => "bool",
            ParamKind::Int => "int",
            ParamKind::Float => "float",
            ParamKind::Text => "text",
        }
    }

    /// Exact shape match, without coercion.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            ParamKind::Bool => value.is_boolean(),
            ParamKind::Int => value.is_i64() || value.is_u64(),
            ParamKind::Float => value.is_number(),
            ParamKind::Text => value.is_string(),
        }
    }
}

/// Directive argument after coercion to its declared kind.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Coerced arguments of one directive call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    directive: String,
    values: Vec<Arg>,
}

/// Coerce raw literal arguments to the generator's declared parameter kinds.
///
/// Integers widen to floats, integral floats narrow to integers, and
/// numeric or boolean strings are parsed.
pub fn coerce_args(directive: &str, params: &[ParamKind], raw: &[Value]) -> Result<Args> {
    if params.len() != raw.len() {
        return Err(Error::DirectiveNotFound {
            name: directive.to_string(),
            arity: raw.len(),
        });
    }

    let values = params
        .iter()
        .zip(raw)
        .enumerate()
        .map(|(idx, (kind, value))| {
            let coerced = match kind {
                ParamKind::Bool => bool::from_value(value.clone()).map(Arg::Bool),
                ParamKind::Int => i64::from_value(value.clone()).map(Arg::Int),
                ParamKind::Float => f64::from_value(value.clone()).map(Arg::Float),
                ParamKind::Text => String::from_value(value.clone()).map(Arg::Text),
            };
            coerced.map_err(|err| Error::coercion(format!("@{directive}#{idx}"), err))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Args {
        directive: directive.to_string(),
        values,
    })
}

impl Args {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Arg> {
        self.values.get(idx)
    }

    pub fn int(&self, idx: usize) -> Result<i64> {
        match self.values.get(idx) {
            Some(Arg::Int(value)) => Ok(*value),
            _ => Err(self.missing(idx, ParamKind::Int)),
        }
    }

    pub fn float(&self, idx: usize) -> Result<f64> {
        match self.values.get(idx) {
            Some(Arg::Float(value)) => Ok(*value),
            Some(Arg::Int(value)) => Ok(*value as f64),
            _ => Err(self.missing(idx, ParamKind::Float)),
        }
    }

    pub fn text(&self, idx: usize) -> Result<&str> {
        match self.values.get(idx) {
            Some(Arg::Text(value)) => Ok(value.as_str()),
            _ => Err(self.missing(idx, ParamKind::Text)),
        }
    }

    pub fn bool(&self, idx: usize) -> Result<bool> {
        match self.values.get(idx) {
            Some(Arg::Bool(value)) => Ok(*value),
            _ => Err(self.missing(idx, ParamKind::Bool)),
        }
    }

    /// Text arguments in declaration order.
    pub fn texts(&self) -> Vec<&str> {
        self.values
            .iter()
            .filter_map(|arg| match arg {
                Arg::Text(value) => Some(value.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Usize argument that must be non-negative.
    pub fn count(&self, idx: usize) -> Result<usize> {
        let value = self.int(idx)?;
        usize::try_from(value).map_err(|_| {
            Error::invalid_argument(
                &self.directive,
                format!("argument #{idx} must be >= 0, got {value}"),
            )
        })
    }

    fn missing(&self, idx: usize, kind: ParamKind) -> Error {
        Error::invalid_argument(
            &self.directive,
            format!("missing {} argument #{idx}", kind.as_str()),
        )
    }
}

/// Optional `(min, max)` pair starting at `idx`, checked for ordering.
pub fn int_bounds(args: &Args, idx: usize, defaults: (i64, i64)) -> Result<(i64, i64)> {
    if args.len() < idx + 2 {
        return Ok(defaults);
    }
    let min = args.int(idx)?;
    let max = args.int(idx + 1)?;
    if min > max {
        return Err(Error::invalid_argument(
            &args.directive,
            format!("min must be <= max, got {min} > {max}"),
        ));
    }
    Ok((min, max))
}

pub fn float_bounds(args: &Args, idx: usize, defaults: (f64, f64)) -> Result<(f64, f64)> {
    if args.len() < idx + 2 {
        return Ok(defaults);
    }
    let min = args.float(idx)?;
    let max = args.float(idx + 1)?;
    if !min.is_finite() || !max.is_finite() {
        return Err(Error::invalid_argument(
            &args.directive,
            format!("bounds must be finite, got {min} and {max}"),
        ));
    }
    if min > max {
        return Err(Error::invalid_argument(
            &args.directive,
            format!("min must be <= max, got {min} > {max}"),
        ));
    }
    if !(max - min).is_finite() {
        return Err(Error::invalid_argument(
            &args.directive,
            format!("range {min}..={max} is too wide"),
        ));
    }
    Ok((min, max))
}

/// Reject length or count arguments above the catalogue's `max_count`.
pub fn check_count(directive: &str, count: usize, cap: usize) -> Result<usize> {
    if count > cap {
        return Err(Error::invalid_argument(
            directive,
            format!("count {count} exceeds the limit of {cap}"),
        ));
    }
    Ok(count)
}
