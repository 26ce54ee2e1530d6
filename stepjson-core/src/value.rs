//! Typed coercion of primitive values.
//!
//! A [`Primitive`] keeps only its raw text. Typed values are produced on
//! demand, for a closed set of target kinds. The static path is
//! [`Primitive::get`], bounded by the sealed [`FromPrimitive`] trait, so
//! an unsupported type is a compile error. The dynamic path is
//! [`Primitive::get_named`], which takes a kind name at runtime and
//! reports unknown names as [`CoerceError::UnsupportedKind`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::element::Primitive;
use crate::error::CoerceError;

/// The closed set of kinds a primitive can be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    I8,
    I16,
    I32,
    I64,
    U32,
    F32,
    F64,
    Decimal,
    Bool,
    Char,
    DateTime,
    Byte,
}

/// Kind names accepted by [`ValueKind::from_name`], with common aliases.
static KIND_NAMES: phf::Map<&'static str, ValueKind> = phf::phf_map! {
    "string" => ValueKind::String,
    "str" => ValueKind::String,
    "i8" => ValueKind::I8,
    "sbyte" => ValueKind::I8,
    "i16" => ValueKind::I16,
    "short" => ValueKind::I16,
    "i32" => ValueKind::I32,
    "int" => ValueKind::I32,
    "i64" => ValueKind::I64,
    "long" => ValueKind::I64,
    "u32" => ValueKind::U32,
    "uint" => ValueKind::U32,
    "f32" => ValueKind::F32,
    "float" => ValueKind::F32,
    "f64" => ValueKind::F64,
    "double" => ValueKind::F64,
    "decimal" => ValueKind::Decimal,
    "bool" => ValueKind::Bool,
    "boolean" => ValueKind::Bool,
    "char" => ValueKind::Char,
    "datetime" => ValueKind::DateTime,
    "u8" => ValueKind::Byte,
    "byte" => ValueKind::Byte,
};

impl ValueKind {
    /// Look up a kind by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Result<Self, CoerceError> {
        KIND_NAMES
            .get(name.to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| CoerceError::UnsupportedKind {
                requested: name.to_owned(),
            })
    }

    /// Canonical name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U32 => "u32",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Decimal => "decimal",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::DateTime => "datetime",
            Self::Byte => "u8",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueKind {
    type Err = CoerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// A dynamically typed coercion result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U32(u32),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Bool(bool),
    Char(char),
    DateTime(NaiveDateTime),
    Byte(u8),
}

impl Value {
    /// The kind this value was coerced to.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::I8(_) => ValueKind::I8,
            Self::I16(_) => ValueKind::I16,
            Self::I32(_) => ValueKind::I32,
            Self::I64(_) => ValueKind::I64,
            Self::U32(_) => ValueKind::U32,
            Self::F32(_) => ValueKind::F32,
            Self::F64(_) => ValueKind::F64,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::Bool(_) => ValueKind::Bool,
            Self::Char(_) => ValueKind::Char,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Byte(_) => ValueKind::Byte,
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Types a primitive's raw text can be converted to.
///
/// Sealed: the set of target kinds is closed.
pub trait FromPrimitive: sealed::Sealed + Sized {
    const KIND: ValueKind;

    /// Parse `raw` according to this kind's textual grammar.
    fn from_raw(raw: &str) -> Option<Self>;

    /// Value handed out by [`Primitive::try_get`] on failure.
    fn zero() -> Self;
}

macro_rules! from_str_kind {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl FromPrimitive for $ty {
                const KIND: ValueKind = ValueKind::$kind;

                #[inline]
                fn from_raw(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }

                #[inline]
                fn zero() -> Self {
                    Self::default()
                }
            }
        )*
    };
}

from_str_kind! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u32 => U32,
    f32 => F32,
    f64 => F64,
    char => Char,
    u8 => Byte,
}

impl sealed::Sealed for String {}

impl FromPrimitive for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_raw(raw: &str) -> Option<Self> {
        Some(raw.to_owned())
    }

    fn zero() -> Self {
        String::new()
    }
}

impl sealed::Sealed for bool {}

impl FromPrimitive for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_raw(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    fn zero() -> Self {
        false
    }
}

impl sealed::Sealed for Decimal {}

impl FromPrimitive for Decimal {
    const KIND: ValueKind = ValueKind::Decimal;

    fn from_raw(raw: &str) -> Option<Self> {
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .ok()
    }

    fn zero() -> Self {
        Decimal::ZERO
    }
}

impl sealed::Sealed for NaiveDateTime {}

impl FromPrimitive for NaiveDateTime {
    const KIND: ValueKind = ValueKind::DateTime;

    /// RFC 3339 (normalised to UTC), ISO 8601 without offset using `T` or
    /// a space, or a bare date at midnight.
    fn from_raw(raw: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(dt);
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }

    /// The Unix epoch.
    fn zero() -> Self {
        NaiveDateTime::default()
    }
}

// ============================================================================
// Primitive accessors
// ============================================================================

impl Primitive {
    /// Convert the raw value to `T`.
    ///
    /// ```
    /// use stepjson_core::Primitive;
    ///
    /// let p = Primitive::new("count", "42");
    /// assert_eq!(p.get::<i32>().unwrap(), 42);
    /// assert!(p.get::<bool>().is_err());
    /// ```
    pub fn get<T: FromPrimitive>(&self) -> Result<T, CoerceError> {
        let raw = self.raw_value();
        let parsed = if self.is_set() { T::from_raw(raw) } else { None };
        parsed.ok_or_else(|| CoerceError::Format {
            kind: T::KIND,
            raw: raw.to_owned(),
        })
    }

    /// Convert the raw value to `T`, or `None` if it does not parse.
    pub fn get_opt<T: FromPrimitive>(&self) -> Option<T> {
        self.get().ok()
    }

    /// Non-failing conversion: a success flag plus the value, which is
    /// the kind's zero value when conversion fails.
    pub fn try_get<T: FromPrimitive>(&self) -> (bool, T) {
        match self.get() {
            Ok(value) => (true, value),
            Err(_) => (false, T::zero()),
        }
    }

    /// Convert to the kind named by `kind`, e.g. `"i32"` or `"datetime"`.
    pub fn get_named(&self, kind: &str) -> Result<Value, CoerceError> {
        self.get_kind(ValueKind::from_name(kind)?)
    }

    /// Convert to `kind`, returning a dynamically typed value.
    pub fn get_kind(&self, kind: ValueKind) -> Result<Value, CoerceError> {
        Ok(match kind {
            ValueKind::String => Value::String(self.get()?),
            ValueKind::I8 => Value::I8(self.get()?),
            ValueKind::I16 => Value::I16(self.get()?),
            ValueKind::I32 => Value::I32(self.get()?),
            ValueKind::I64 => Value::I64(self.get()?),
            ValueKind::U32 => Value::U32(self.get()?),
            ValueKind::F32 => Value::F32(self.get()?),
            ValueKind::F64 => Value::F64(self.get()?),
            ValueKind::Decimal => Value::Decimal(self.get()?),
            ValueKind::Bool => Value::Bool(self.get()?),
            ValueKind::Char => Value::Char(self.get()?),
            ValueKind::DateTime => Value::DateTime(self.get()?),
            ValueKind::Byte => Value::Byte(self.get()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(raw: &str) -> Primitive {
        Primitive::new("", raw)
    }

    #[test]
    fn test_integer_kinds() {
        assert_eq!(p("42").get::<i32>(), Ok(42));
        assert_eq!(p("-42").get::<i64>(), Ok(-42));
        assert_eq!(p("+7").get::<i16>(), Ok(7));
        assert_eq!(p("127").get::<i8>(), Ok(127));
        assert!(p("128").get::<i8>().is_err());
        assert_eq!(p("4000000000").get::<u32>(), Ok(4_000_000_000));
        assert!(p("-1").get::<u32>().is_err());
        assert_eq!(p("255").get::<u8>(), Ok(255));
        assert!(p("256").get::<u8>().is_err());
    }

    #[test]
    fn test_float_kinds() {
        assert_eq!(p("2.5").get::<f32>(), Ok(2.5));
        assert_eq!(p("-1.5e3").get::<f64>(), Ok(-1500.0));
        assert!(p("1.2.3").get::<f64>().is_err());
    }

    #[test]
    fn test_decimal() {
        assert_eq!(p("10.25").get::<Decimal>(), Ok(Decimal::new(1025, 2)));
        assert_eq!(p("1.5e2").get::<Decimal>(), Ok(Decimal::new(150, 0)));
        assert!(p("ten").get::<Decimal>().is_err());
    }

    #[test]
    fn test_bool_is_case_insensitive() {
        assert_eq!(p("true").get::<bool>(), Ok(true));
        assert_eq!(p("False").get::<bool>(), Ok(false));
        assert_eq!(p("TRUE").get::<bool>(), Ok(true));
        assert!(p("yes").get::<bool>().is_err());
    }

    #[test]
    fn test_char() {
        assert_eq!(p("x").get::<char>(), Ok('x'));
        assert_eq!(p("é").get::<char>(), Ok('é'));
        assert!(p("xy").get::<char>().is_err());
        assert!(p("").get::<char>().is_err());
    }

    #[test]
    fn test_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(p("2024-03-01T12:30:00").get::<NaiveDateTime>(), Ok(expected));
        assert_eq!(p("2024-03-01 12:30:00").get::<NaiveDateTime>(), Ok(expected));
        assert_eq!(p("2024-03-01T14:30:00+02:00").get::<NaiveDateTime>(), Ok(expected));
        assert_eq!(p("2024-03-01T12:30:00Z").get::<NaiveDateTime>(), Ok(expected));

        let midnight = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(p("2024-03-01").get::<NaiveDateTime>(), Ok(midnight));
        assert!(p("yesterday").get::<NaiveDateTime>().is_err());
    }

    #[test]
    fn test_string_is_unchanged() {
        assert_eq!(p("not-a-number").get::<String>(), Ok("not-a-number".to_owned()));
    }

    #[test]
    fn test_format_error_names_kind() {
        assert_eq!(
            p("abc").get::<i32>(),
            Err(CoerceError::Format {
                kind: ValueKind::I32,
                raw: "abc".to_owned()
            })
        );
    }

    #[test]
    fn test_unset_value_fails_every_kind() {
        let unset = Primitive::unset("k");
        assert!(unset.get::<String>().is_err());
        assert_eq!(unset.try_get::<i32>(), (false, 0));
    }

    #[test]
    fn test_try_get_defaults() {
        assert_eq!(p("not-a-number").try_get::<i32>(), (false, 0));
        assert_eq!(p("12").try_get::<i32>(), (true, 12));
        assert_eq!(p("x").try_get::<bool>(), (false, false));
        assert_eq!(p("x").try_get::<Decimal>(), (false, Decimal::ZERO));

        let (ok, epoch) = p("x").try_get::<NaiveDateTime>();
        assert!(!ok);
        assert_eq!(epoch.and_utc().timestamp(), 0);
    }

    #[test]
    fn test_get_opt() {
        assert_eq!(p("3").get_opt::<u8>(), Some(3));
        assert_eq!(p("x").get_opt::<u8>(), None);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ValueKind::from_name("int"), Ok(ValueKind::I32));
        assert_eq!(ValueKind::from_name("DateTime"), Ok(ValueKind::DateTime));
        assert_eq!("byte".parse::<ValueKind>(), Ok(ValueKind::Byte));
        assert_eq!(
            ValueKind::from_name("u128"),
            Err(CoerceError::UnsupportedKind {
                requested: "u128".to_owned()
            })
        );
    }

    #[test]
    fn test_every_kind_name_round_trips() {
        for kind in KIND_NAMES.values() {
            assert_eq!(ValueKind::from_name(kind.name()), Ok(*kind));
        }
    }

    #[test]
    fn test_get_named() {
        assert_eq!(p("42").get_named("long"), Ok(Value::I64(42)));
        assert_eq!(p("42").get_named("string"), Ok(Value::String("42".into())));
        assert!(matches!(
            p("42").get_named("vector3"),
            Err(CoerceError::UnsupportedKind { .. })
        ));
        assert!(matches!(
            p("abc").get_named("f64"),
            Err(CoerceError::Format { kind: ValueKind::F64, .. })
        ));
        assert_eq!(p("1").get_kind(ValueKind::U32).map(|v| v.kind()), Ok(ValueKind::U32));
        assert!(p("1").get_kind(ValueKind::Bool).is_err());
    }
}
