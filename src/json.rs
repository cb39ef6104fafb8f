//! Lenient numeric JSON decoding
//!
//! The explorer API encodes large integers inconsistently: the same field may
//! arrive as a JSON string (`"12345"`), a JSON number (`12345`), or null.
//! The `with`-modules here coerce all three representations into a strict
//! numeric type on decode, and always re-emit a canonical JSON number on
//! encode — decode-then-encode normalizes the representation rather than
//! round-tripping it byte for byte.
//!
//! Coercion rules, per numeric kind:
//! - JSON string: empty → zero; otherwise parsed with the type's canonical
//!   parser; unparsable input is a decode error carrying the raw value.
//! - JSON number: converted directly; out-of-range values are a decode error.
//! - JSON null (or an absent field combined with `#[serde(default)]`): zero.
//! - Any other token kind is a decode error carrying the raw token.
//!
//! # Example
//!
//! ```
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Balance {
//!     #[serde(default, with = "kaspa_rest_client::json::lenient_u64")]
//!     balance: u64,
//! }
//!
//! let parsed: Balance = serde_json::from_str(r#"{"balance": "500000000"}"#).unwrap();
//! assert_eq!(parsed.balance, 500_000_000);
//! // Encoding normalizes to a JSON number.
//! assert_eq!(serde_json::to_string(&parsed).unwrap(), r#"{"balance":500000000}"#);
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Shared coercion over the three tolerated token kinds.
///
/// `from_number` converts an in-range JSON number; returning `None` surfaces
/// as a decode error carrying the raw number.
fn coerce_numeric<'de, D, T>(
    deserializer: D,
    kind: &'static str,
    from_number: fn(&serde_json::Number) -> Option<T>,
) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr + Default,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(T::default()),
        Some(Value::String(s)) if s.is_empty() => Ok(T::default()),
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid value for {kind}: {s:?}"))),
        Some(Value::Number(n)) => from_number(&n)
            .ok_or_else(|| D::Error::custom(format!("invalid value for {kind}: {n}"))),
        Some(other) => Err(D::Error::custom(format!(
            "invalid value for {kind}: {other}"
        ))),
    }
}

/// String-or-number coercion for unsigned 32-bit fields
pub mod lenient_u32 {
    use serde::{Deserializer, Serializer};

    /// Decodes a JSON string, number, or null into a `u32`
    pub fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::coerce_numeric(deserializer, "u32", |n| {
            n.as_u64().and_then(|v| u32::try_from(v).ok())
        })
    }

    /// Encodes the value as a canonical JSON number
    pub fn serialize<S>(value: &u32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(*value)
    }
}

/// String-or-number coercion for unsigned 64-bit fields
pub mod lenient_u64 {
    use serde::{Deserializer, Serializer};

    /// Decodes a JSON string, number, or null into a `u64`
    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::coerce_numeric(deserializer, "u64", serde_json::Number::as_u64)
    }

    /// Encodes the value as a canonical JSON number
    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(*value)
    }
}

/// String-or-number coercion for signed 64-bit fields
pub mod lenient_i64 {
    use serde::{Deserializer, Serializer};

    /// Decodes a JSON string, number, or null into an `i64`
    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::coerce_numeric(deserializer, "i64", serde_json::Number::as_i64)
    }

    /// Encodes the value as a canonical JSON number
    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(*value)
    }
}

/// String-or-number coercion for arbitrary-precision decimal fields
pub mod lenient_decimal {
    use rust_decimal::Decimal;
    use serde::{Deserializer, Serializer};

    /// Decodes a JSON string, number, or null into a [`Decimal`]
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::coerce_numeric(deserializer, "decimal", |n| n.to_string().parse().ok())
    }

    /// Encodes the value as a canonical JSON number
    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::float::serialize(value, serializer)
    }
}
