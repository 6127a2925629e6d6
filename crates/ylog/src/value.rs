//! Typed values used as format arguments and structured fields.

use std::{borrow::Cow, error::Error as StdError, fmt, time::Duration};

use serde::{Serialize, Serializer};

/// A single typed value passed to the logger, either as a positional format argument or as the
/// value of a structured field.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A string.
    Str(Cow<'static, str>),

    /// A signed integer.
    Int(i64),

    /// An unsigned integer.
    Uint(u64),

    /// A floating point number.
    Float(f64),

    /// A boolean.
    Bool(bool),

    /// A duration, rendered like `1.5s`.
    Duration(Duration),

    /// The rendered message of an error.
    Error(String),

    /// The `Debug` rendering of an arbitrary value.
    Opaque(String),
}

/// A structured field attached to a single record.
pub type Field = (&'static str, Value);

impl Value {
    /// A string known at compile time, stored without copying.
    pub const fn from_static(value: &'static str) -> Self {
        Self::Str(Cow::Borrowed(value))
    }

    /// Captures the `Display` output of an error.
    pub fn error(error: &(dyn StdError + 'static)) -> Self {
        Self::Error(error.to_string())
    }

    /// Captures the `Debug` output of any value.
    pub fn debug(value: &impl fmt::Debug) -> Self {
        Self::Opaque(format!("{value:?}"))
    }

    /// A short name of the variant, as used in formatting diagnostics (`%!d(string=abc)`).
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float64",
            Self::Bool(_) => "bool",
            Self::Duration(_) => "duration",
            Self::Error(_) => "error",
            Self::Opaque(_) => "opaque",
        }
    }

    pub(crate) fn is_str(&self) -> bool {
        matches!(self, Self::Str(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
            Self::Uint(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Duration(value) => write!(f, "{value:?}"),
            Self::Error(value) | Self::Opaque(value) => f.write_str(value),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Str(value) => serializer.serialize_str(value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Uint(value) => serializer.serialize_u64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Duration(value) => serializer.collect_str(&format_args!("{value:?}")),
            Self::Error(value) | Self::Opaque(value) => serializer.serialize_str(value),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(Cow::Owned(value.to_owned()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(Cow::Owned(value))
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Str(Cow::Owned(value.clone()))
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Self::Str(Cow::Owned(value.to_string()))
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Uint(u64::from(value))
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<isize> for Value {
    fn from(value: isize) -> Self {
        i64::try_from(value).map_or_else(|_| Self::debug(&value), Self::Int)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        u64::try_from(value).map_or_else(|_| Self::debug(&value), Self::Uint)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Self::Duration(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_default_stringification() {
        assert_eq!(Value::from("a").to_string(), "a");
        assert_eq!(Value::from(-5_i32).to_string(), "-5");
        assert_eq!(Value::from(7_usize).to_string(), "7");
        assert_eq!(Value::from(1.5_f64).to_string(), "1.5");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(Duration::from_millis(1500)).to_string(), "1.5s");
    }

    #[test]
    fn borrowed_strings_are_copied() {
        fn greeting(name: &str) -> Value {
            Value::from(name)
        }

        let value = {
            let name = String::from("ada");
            greeting(name.as_str())
        };
        assert_eq!(value, Value::from_static("ada"));
        assert!(matches!(Value::from_static("ada"), Value::Str(Cow::Borrowed("ada"))));
    }

    #[test]
    fn errors_and_opaque_values_are_rendered_eagerly() {
        let error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        assert_eq!(Value::error(&error), Value::Error("no such file".to_owned()));
        assert_eq!(
            Value::debug(&Some(3)),
            Value::Opaque("Some(3)".to_owned())
        );
    }

    #[test]
    fn serializes_by_type() {
        let values = vec![
            Value::from("x"),
            Value::from(3_u8),
            Value::from(false),
            Value::from(Duration::from_secs(2)),
        ];
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"["x",3,false,"2s"]"#
        );
    }
}
