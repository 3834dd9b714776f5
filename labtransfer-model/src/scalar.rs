use chrono::NaiveDate;
use serde_json::{Number, Value};

/// Date format used for every date-valued attribute.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The small scalar taxonomy every generically projected attribute is
/// normalized into.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Float(f32),
    Bool(bool),
    Char(char),
}

impl Scalar {
    /// Blank text counts as missing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Integer(i) => Value::from(*i),
            Self::Decimal(d) => Number::from_f64(*d).map_or(Value::Null, Value::Number),
            // Through the shortest decimal text so 0.1f32 is written as 0.1.
            Self::Float(f) => f
                .to_string()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map_or(Value::Null, Value::Number),
            Self::Bool(b) => Value::Bool(*b),
            Self::Char(c) => Value::String(c.to_string()),
        }
    }
}

/// Declared type of a field, driving coercion of raw document values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Text,
    Integer,
    Decimal,
    Float,
    Bool,
    Char,
}

impl ScalarType {
    /// Coerces a raw document value into this type, or `None` when the
    /// value has no sensible reading as one.
    #[must_use]
    pub fn coerce(self, raw: &Value) -> Option<Scalar> {
        match self {
            Self::Text => match raw {
                Value::String(s) => Some(Scalar::Text(s.clone())),
                Value::Number(n) => Some(Scalar::Text(n.to_string())),
                Value::Bool(b) => Some(Scalar::Text(b.to_string())),
                _ => None,
            },
            Self::Integer => match raw {
                Value::Number(n) => n.as_i64().or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                        .map(|f| f as i64)
                }),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            }
            .map(Scalar::Integer),
            Self::Decimal => number(raw).map(Scalar::Decimal),
            Self::Float => number(raw).map(|f| Scalar::Float(f as f32)),
            Self::Bool => match raw {
                Value::Bool(b) => Some(Scalar::Bool(*b)),
                Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Some(Scalar::Bool(true)),
                Value::String(s) if s.trim().eq_ignore_ascii_case("false") => {
                    Some(Scalar::Bool(false))
                }
                _ => None,
            },
            Self::Char => match raw {
                Value::String(s) => {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Some(Scalar::Char(c)),
                        _ => None,
                    }
                }
                _ => None,
            },
        }
    }
}

fn number(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Formats a date the way documents carry it.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a document date.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}
