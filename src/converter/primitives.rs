// Codecs for FHIR primitive types

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::types::SourceValue;

static LEADING_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid integer pattern"));

static LEADING_DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").expect("valid decimal pattern")
});

/// JSON number for `n`, as an integer when it has no fractional part.
pub(crate) fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

pub fn boolean(value: &SourceValue) -> Value {
    match value {
        SourceValue::Bool(b) => Value::Bool(*b),
        other => Value::Bool(text(other).eq_ignore_ascii_case("true")),
    }
}

/// `integer`, `unsignedInt` and `positiveInt`. Text is read up to the first
/// non-digit; text without leading digits yields null.
pub fn integer(value: &SourceValue) -> Value {
    match value {
        SourceValue::Integer(i) => Value::from(*i),
        SourceValue::Decimal(d) => number_value(*d),
        other => LEADING_INTEGER
            .captures(&text(other))
            .and_then(|captures| captures[1].parse::<i64>().ok())
            .map(Value::from)
            .unwrap_or(Value::Null),
    }
}

pub fn decimal(value: &SourceValue) -> Value {
    match value {
        SourceValue::Integer(i) => Value::from(*i),
        SourceValue::Decimal(d) => number_value(*d),
        other => LEADING_DECIMAL
            .captures(&text(other))
            .and_then(|captures| captures[1].parse::<f64>().ok())
            .map(number_value)
            .unwrap_or(Value::Null),
    }
}

/// `instant` and `dateTime`.
pub fn date_time(value: &SourceValue) -> Value {
    Value::String(text(value))
}

pub fn date(value: &SourceValue) -> Value {
    match value {
        SourceValue::Timestamp(ts) => {
            let rendered = SourceValue::iso_timestamp(ts);
            Value::String(rendered[..10].to_string())
        }
        other => Value::String(text(other)),
    }
}

pub fn time(value: &SourceValue) -> Value {
    match value {
        SourceValue::Timestamp(ts) => {
            let rendered = SourceValue::iso_timestamp(ts);
            Value::String(rendered[11..].to_string())
        }
        other => Value::String(text(other)),
    }
}

/// `string`, `code`, `id`, `markdown`, `uri`, `oid` and `base64Binary`.
pub fn string(value: &SourceValue) -> Value {
    Value::String(text(value))
}

pub(crate) fn text(value: &SourceValue) -> String {
    match value {
        SourceValue::Text(s) => s.clone(),
        other => other.render(),
    }
}
