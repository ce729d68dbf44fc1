//! Typed values inferred from command-line tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A token after type inference.
///
/// Quoted tokens are always [`Str`](CoercedValue::Str); unquoted tokens are
/// tried as a boolean literal, an integer, then a float before falling back
/// to a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoercedValue {
    /// `True` or `False`.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Finite floating point number.
    Float(f64),
    /// Anything else, or any quoted token.
    Str(String),
}

impl CoercedValue {
    /// Short type name used in handler error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
        }
    }

    /// Returns the string payload of a [`Str`](Self::Str) value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the payload of an [`Int`](Self::Int) value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns a numeric payload; integers widen to `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the payload of a [`Bool`](Self::Bool) value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Renders the value so that coercing the output again (unquoted) yields the
/// same variant, except for strings that look like other types.
impl fmt::Display for CoercedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&CoercedValue> for serde_json::Value {
    fn from(value: &CoercedValue) -> Self {
        match value {
            CoercedValue::Bool(b) => Self::Bool(*b),
            CoercedValue::Int(n) => Self::from(*n),
            CoercedValue::Float(x) => Self::from(*x),
            CoercedValue::Str(s) => Self::String(s.clone()),
        }
    }
}

fn is_int_literal(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_float(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|x| x.is_finite())
}

fn strip_quotes(token: &str) -> &str {
    let mut chars = token.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && (first == '\'' || first == '"') => {
            &token[1..token.len() - 1]
        }
        _ => token,
    }
}

/// Infers the value of a single token.
///
/// A quoted token loses exactly one matching pair of outer quotes and is
/// returned verbatim as a string. An unquoted token becomes the first of
/// boolean (`True`/`False`, case-sensitive), integer, float or string that
/// accepts it. An integer literal outside the `i64` range stays a string
/// rather than losing digits as a float. This never fails.
///
/// # Examples
///
/// ```
/// use labelist_core::{coerce, CoercedValue};
///
/// assert_eq!(coerce("True", false), CoercedValue::Bool(true));
/// assert_eq!(coerce("42", false), CoercedValue::Int(42));
/// assert_eq!(coerce("3.14", false), CoercedValue::Float(3.14));
/// assert_eq!(coerce("42abc", false), CoercedValue::Str("42abc".into()));
/// assert_eq!(coerce("'123'", true), CoercedValue::Str("123".into()));
/// ```
pub fn coerce(token: &str, was_quoted: bool) -> CoercedValue {
    if was_quoted {
        return CoercedValue::Str(strip_quotes(token).to_string());
    }
    match token {
        "True" => return CoercedValue::Bool(true),
        "False" => return CoercedValue::Bool(false),
        _ => {}
    }
    if is_int_literal(token) {
        return token
            .parse()
            .map_or_else(|_| CoercedValue::Str(token.to_string()), CoercedValue::Int);
    }
    if let Some(x) = parse_float(token) {
        return CoercedValue::Float(x);
    }
    CoercedValue::Str(token.to_string())
}
