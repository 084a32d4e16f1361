// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Literal values carried by `Constant` nodes.
//!
//! Integers are arbitrary precision, so they are stored as normalized decimal
//! digit strings rather than machine integers. Floats accept the non-finite
//! spellings `"inf"`, `"-inf"` and `"nan"` since JSON has no number for them.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("invalid integer literal '{0}'")]
    InvalidInt(String),
}

// ============================================================================
// Integers
// ============================================================================

/// A non-negative integer of any size, as decimal digits without leading zeros.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntLiteral(String);

impl IntLiteral {
    /// Parse decimal digits, allowing `_` separators and leading zeros.
    pub fn new(text: &str) -> Result<Self, LiteralError> {
        let digits: String = text.chars().filter(|c| *c != '_').collect();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LiteralError::InvalidInt(text.to_string()));
        }
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Ok(Self("0".to_string()))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn digits(&self) -> &str {
        &self.0
    }

    pub fn to_u128(&self) -> Option<u128> {
        self.0.parse().ok()
    }

    /// `Some(k)` when the value is exactly `10**k`.
    pub fn pow10_exponent(&self) -> Option<u32> {
        let rest = self.0.strip_prefix('1')?;
        if rest.bytes().all(|b| b == b'0') {
            u32::try_from(rest.len()).ok()
        } else {
            None
        }
    }

    /// `Some(k)` when the value is exactly `2**k`.
    pub fn pow2_exponent(&self) -> Option<u32> {
        if let Some(n) = self.to_u128() {
            return n.is_power_of_two().then(|| n.trailing_zeros());
        }
        // Beyond u128: halve the decimal string until it reaches 1.
        let mut digits = self.0.clone();
        let mut exponent = 0u32;
        while digits != "1" {
            let (quotient, odd) = halve(&digits);
            if odd {
                return None;
            }
            digits = quotient;
            exponent += 1;
        }
        Some(exponent)
    }
}

/// Long division of a decimal string by two: `(quotient, remainder_is_one)`.
fn halve(digits: &str) -> (String, bool) {
    let mut quotient = String::with_capacity(digits.len());
    let mut carry = 0u8;
    for b in digits.bytes() {
        let current = carry * 10 + (b - b'0');
        let q = current / 2;
        carry = current % 2;
        if !(quotient.is_empty() && q == 0) {
            quotient.push((b'0' + q) as char);
        }
    }
    if quotient.is_empty() {
        quotient.push('0');
    }
    (quotient, carry == 1)
}

impl fmt::Display for IntLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! int_literal_from {
    ($($t:ty),*) => {
        $(impl From<$t> for IntLiteral {
            fn from(value: $t) -> Self {
                Self(value.to_string())
            }
        })*
    };
}

int_literal_from!(u8, u16, u32, u64, u128, usize);

impl Serialize for IntLiteral {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for IntLiteral {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IntVisitor;

        impl Visitor<'_> for IntVisitor {
            type Value = IntLiteral;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or a string of decimal digits")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<IntLiteral, E> {
                Ok(IntLiteral::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<IntLiteral, E> {
                u64::try_from(v)
                    .map(IntLiteral::from)
                    .map_err(|_| E::custom(format!("negative integer literal {}", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<IntLiteral, E> {
                IntLiteral::new(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(IntVisitor)
    }
}

// ============================================================================
// Constant values
// ============================================================================

/// The value of a `Constant` node.
///
/// Serialized adjacently tagged: `{"type": "int", "value": "100000"}`,
/// `{"type": "none"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ConstantValue {
    None,
    Bool(bool),
    Int(IntLiteral),
    Float(#[serde(with = "float_serde")] f64),
    Complex {
        #[serde(with = "float_serde", default)]
        real: f64,
        #[serde(with = "float_serde")]
        imag: f64,
    },
    Str(String),
    Bytes(Vec<u8>),
    Ellipsis,
    Tuple(Vec<ConstantValue>),
}

impl ConstantValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstantValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, ConstantValue::Int(_))
    }
}

/// Serde adapter for floats that may be non-finite.
pub mod float_serde {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("nan")
        } else if *value > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        struct FloatVisitor;

        impl Visitor<'_> for FloatVisitor {
            type Value = f64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number or one of \"inf\", \"-inf\", \"nan\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
                Ok(v)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
                match v.to_ascii_lowercase().as_str() {
                    "inf" | "infinity" => Ok(f64::INFINITY),
                    "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
                    "nan" => Ok(f64::NAN),
                    other => other
                        .parse()
                        .map_err(|_| E::custom(format!("invalid float literal '{}'", v))),
                }
            }
        }

        deserializer.deserialize_any(FloatVisitor)
    }
}

/// Serde adapter for the `0`/`1` integer flags the parser emits for booleans.
pub mod flag_serde {
    use super::*;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        struct FlagVisitor;

        impl Visitor<'_> for FlagVisitor {
            type Value = bool;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a boolean or 0/1")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
                Ok(v)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
                Ok(v != 0)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
                Ok(v != 0)
            }
        }

        deserializer.deserialize_any(FlagVisitor)
    }
}
