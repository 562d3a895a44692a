//! Exact numeric bounds with symbolic infinities.
//!
//! A [`Bound`] is either an exact rational value or one of the two sentinels
//! [`Bound::NegInf`] / [`Bound::PosInf`]. The variant order makes the derived
//! `Ord` the sentinel-aware order: every finite value sits strictly between the
//! sentinels and each sentinel is only equal to itself. The free functions
//! ([`lt`], [`plus`], [`div`], ...) form the comparator used by the interval
//! algebra.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{ErrorInfo, FunmanError};

/// Textual form of the negative infinity sentinel.
pub const NEG_INFINITY: &str = "-inf";
/// Textual form of the positive infinity sentinel.
pub const POS_INFINITY: &str = "inf";

const MAX_DECIMAL_EXPONENT: i64 = 4096;

/// Finite exact value or an absorbing infinity sentinel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bound {
    /// Below every finite value.
    NegInf,
    /// Exact rational value.
    Finite(BigRational),
    /// Above every finite value.
    PosInf,
}

impl Bound {
    /// The negative infinity sentinel.
    pub fn neg_inf() -> Self {
        Bound::NegInf
    }

    /// The positive infinity sentinel.
    pub fn pos_inf() -> Self {
        Bound::PosInf
    }

    /// Finite zero.
    pub fn zero() -> Self {
        Bound::Finite(BigRational::zero())
    }

    /// Exact conversion from a float; infinities map to the sentinels.
    ///
    /// The conversion is exact with respect to the binary value of `value`,
    /// so `0.1` becomes the rational closest to what the float stores.
    pub fn from_f64(value: f64) -> Result<Self, FunmanError> {
        if value == f64::INFINITY {
            return Ok(Bound::PosInf);
        }
        if value == f64::NEG_INFINITY {
            return Ok(Bound::NegInf);
        }
        BigRational::from_float(value).map(Bound::Finite).ok_or_else(|| {
            FunmanError::Interval(
                ErrorInfo::new("not-a-number", "bound cannot be built from NaN")
                    .with_context("value", value.to_string()),
            )
        })
    }

    /// Parses a sentinel label, a decimal literal (`-1.25e3`) or a ratio (`3/4`).
    pub fn parse(text: &str) -> Result<Self, FunmanError> {
        let trimmed = text.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "-inf" | "-infinity" => return Ok(Bound::NegInf),
            "inf" | "+inf" | "infinity" | "+infinity" => return Ok(Bound::PosInf),
            _ => {}
        }
        if let Some(value) = parse_decimal(trimmed) {
            return Ok(Bound::Finite(value));
        }
        trimmed
            .parse::<BigRational>()
            .map(Bound::Finite)
            .map_err(|err| {
                FunmanError::Interval(
                    ErrorInfo::new("unparsable-bound", err.to_string())
                        .with_context("text", trimmed.to_string()),
                )
            })
    }

    /// Returns true for either sentinel.
    pub fn is_infinite(&self) -> bool {
        !self.is_finite()
    }

    /// Returns true for exact values.
    pub fn is_finite(&self) -> bool {
        matches!(self, Bound::Finite(_))
    }

    /// Borrows the exact value, if finite.
    pub fn as_finite(&self) -> Option<&BigRational> {
        match self {
            Bound::Finite(value) => Some(value),
            _ => None,
        }
    }

    /// Converts to a float. Sentinels map to the float infinities; a finite
    /// value that does not fit in an `f64` yields `None`.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Bound::NegInf => Some(f64::NEG_INFINITY),
            Bound::PosInf => Some(f64::INFINITY),
            Bound::Finite(value) => value.to_f64().filter(|converted| converted.is_finite()),
        }
    }

    /// Arithmetic negation; the sentinels swap.
    pub fn neg(&self) -> Bound {
        match self {
            Bound::NegInf => Bound::PosInf,
            Bound::PosInf => Bound::NegInf,
            Bound::Finite(value) => Bound::Finite(-value),
        }
    }
}

impl From<i64> for Bound {
    fn from(value: i64) -> Self {
        Bound::Finite(BigRational::from_integer(BigInt::from(value)))
    }
}

impl From<BigRational> for Bound {
    fn from(value: BigRational) -> Self {
        Bound::Finite(value)
    }
}

/// `a < b` under the sentinel order.
pub fn lt(a: &Bound, b: &Bound) -> bool {
    a < b
}

/// `a <= b` under the sentinel order.
pub fn lte(a: &Bound, b: &Bound) -> bool {
    a <= b
}

/// `a > b` under the sentinel order.
pub fn gt(a: &Bound, b: &Bound) -> bool {
    a > b
}

/// `a >= b` under the sentinel order.
pub fn gte(a: &Bound, b: &Bound) -> bool {
    a >= b
}

/// Sum of two bounds. A sentinel absorbs finite values and sentinels of the
/// same sign; the sum of opposite infinities is undefined and rejected.
pub fn plus(a: &Bound, b: &Bound) -> Result<Bound, FunmanError> {
    match (a, b) {
        (Bound::Finite(x), Bound::Finite(y)) => Ok(Bound::Finite(x + y)),
        (Bound::PosInf, Bound::NegInf) | (Bound::NegInf, Bound::PosInf) => {
            Err(FunmanError::Interval(
                ErrorInfo::new("opposite-infinities", "sum of -inf and inf is undefined")
                    .with_context("lhs", a.to_string())
                    .with_context("rhs", b.to_string()),
            ))
        }
        (Bound::PosInf, _) | (_, Bound::PosInf) => Ok(Bound::PosInf),
        (Bound::NegInf, _) | (_, Bound::NegInf) => Ok(Bound::NegInf),
    }
}

/// Difference `a - b`. Equal sentinels cancel to zero, which is the width of
/// a degenerate interval sitting on a sentinel.
pub fn minus(a: &Bound, b: &Bound) -> Bound {
    match (a, b) {
        (Bound::Finite(x), Bound::Finite(y)) => Bound::Finite(x - y),
        (Bound::PosInf, Bound::PosInf) | (Bound::NegInf, Bound::NegInf) => Bound::zero(),
        (Bound::PosInf, _) | (_, Bound::NegInf) => Bound::PosInf,
        (Bound::NegInf, _) | (_, Bound::PosInf) => Bound::NegInf,
    }
}

/// Product of two bounds with sign-aware sentinels; zero annihilates.
pub fn times(a: &Bound, b: &Bound) -> Bound {
    match (a, b) {
        (Bound::Finite(x), Bound::Finite(y)) => Bound::Finite(x * y),
        (Bound::Finite(x), sentinel) | (sentinel, Bound::Finite(x)) => {
            if x.is_zero() {
                Bound::zero()
            } else if x.is_positive() {
                sentinel.clone()
            } else {
                sentinel.neg()
            }
        }
        (Bound::PosInf, Bound::PosInf) | (Bound::NegInf, Bound::NegInf) => Bound::PosInf,
        _ => Bound::NegInf,
    }
}

/// Divides `a` by a normalizer. Sentinels survive division by a positive
/// number; a zero or negative normalizer yields zero.
pub fn div(a: &Bound, normalizer: &BigRational) -> Bound {
    if !normalizer.is_positive() {
        return Bound::zero();
    }
    match a {
        Bound::Finite(value) => Bound::Finite(value / normalizer),
        sentinel => sentinel.clone(),
    }
}

/// Parses a plain decimal literal exactly (no binary rounding).
pub fn parse_decimal(text: &str) -> Option<BigRational> {
    let (mantissa, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
        Some(idx) => (&text[..idx], text[idx + 1..].parse::<i64>().ok()?),
        None => (text, 0),
    };
    if exponent.abs() > MAX_DECIMAL_EXPONENT {
        return None;
    }
    let (negative, digits) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part
        .chars()
        .chain(frac_part.chars())
        .all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let mut numer: BigInt = format!("{int_part}{frac_part}").parse().ok()?;
    if negative {
        numer = -numer;
    }
    let scale = exponent - frac_part.len() as i64;
    let ten = BigInt::from(10u32);
    let value = if scale >= 0 {
        BigRational::from_integer(numer * num_traits::pow(ten, scale as usize))
    } else {
        BigRational::new(numer, num_traits::pow(ten, (-scale) as usize))
    };
    Some(value)
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::NegInf => f.write_str(NEG_INFINITY),
            Bound::PosInf => f.write_str(POS_INFINITY),
            Bound::Finite(value) => match (value.to_f64(), f.precision()) {
                (Some(approx), Some(precision)) if approx.is_finite() => {
                    write!(f, "{approx:.precision$}")
                }
                (Some(approx), None) if approx.is_finite() => write!(f, "{approx}"),
                _ => write!(f, "{value}"),
            },
        }
    }
}

impl Serialize for Bound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Bound::NegInf => serializer.serialize_str(NEG_INFINITY),
            Bound::PosInf => serializer.serialize_str(POS_INFINITY),
            Bound::Finite(value) => match self.to_f64() {
                Some(approx) => serializer.serialize_f64(approx),
                None => serializer.serialize_str(&value.to_string()),
            },
        }
    }
}

struct BoundVisitor;

impl<'de> Visitor<'de> for BoundVisitor {
    type Value = Bound;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a decimal string, \"-inf\" or \"inf\"")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Bound, E> {
        Ok(Bound::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Bound, E> {
        Ok(Bound::Finite(BigRational::from_integer(BigInt::from(value))))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Bound, E> {
        Bound::from_f64(value).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Bound, E> {
        Bound::parse(value).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Bound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BoundVisitor)
    }
}
