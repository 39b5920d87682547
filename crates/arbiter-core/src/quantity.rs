//! Resource quantities.
//!
//! A quantity is a fixed-point number with milli precision, written the way
//! cluster manifests write them: a decimal number followed by an optional
//! suffix.
//!
//! ```text
//! suffix   multiplier   format
//! m        10^-3        DecimalSI
//! (none)   1            DecimalSI
//! k M G    10^3..10^9   DecimalSI
//! T P E    10^12..10^18 DecimalSI
//! Ki Mi Gi 2^10..2^30   BinarySI
//! Ti Pi Ei 2^40..2^60   BinarySI
//! ```
//!
//! A decimal exponent (`"1e3"`, `"2E-1"`) may stand in for the suffix; a
//! bare `E` still means exa.
//!
//! Parsing and integer extraction are separate steps: `"500m"` parses
//! fine but has no integer value, so [`Quantity::as_i64`] returns `None`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Milli-units per whole unit.
const MILLI: i128 = 1000;

const BINARY_SUFFIXES: [(&str, u32); 6] = [
    ("Ei", 60),
    ("Pi", 50),
    ("Ti", 40),
    ("Gi", 30),
    ("Mi", 20),
    ("Ki", 10),
];

/// Errors produced while parsing a quantity string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("empty quantity")]
    Empty,

    #[error("invalid number in quantity {0:?}")]
    InvalidNumber(String),

    #[error("unknown suffix {suffix:?} in quantity {input:?}")]
    UnknownSuffix { input: String, suffix: String },

    #[error("quantity {0:?} is finer than milli precision")]
    Precision(String),

    #[error("quantity {0:?} is out of range")]
    Overflow(String),
}

/// How a quantity prefers to be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuantityFormat {
    /// Powers of ten (`"1500"`, `"250m"`). Used for CPU.
    #[default]
    DecimalSI,
    /// Powers of two (`"8Gi"`). Used for memory.
    BinarySI,
}

/// A resource amount with milli precision.
///
/// Equality and ordering compare the amount only; the format is a
/// rendering hint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity {
    milli: i128,
    format: QuantityFormat,
}

impl Quantity {
    /// A whole-unit quantity.
    pub fn new(value: i64, format: QuantityFormat) -> Self {
        Self {
            milli: i128::from(value) * MILLI,
            format,
        }
    }

    pub fn zero() -> Self {
        Self::new(0, QuantityFormat::DecimalSI)
    }

    /// Parse a quantity string such as `"4"`, `"1.5"`, `"250m"` or `"8Gi"`.
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(QuantityError::Empty);
        }

        let (negative, unsigned) = if let Some(rest) = s.strip_prefix('-') {
            (true, rest)
        } else {
            (false, s.strip_prefix('+').unwrap_or(s))
        };

        let split = unsigned
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(unsigned.len());
        let (number, suffix) = unsigned.split_at(split);

        let (multiplier, divisor, format) = match decimal_exponent(suffix) {
            Some(exp) => {
                let (multiplier, divisor) = exponent_multiplier(exp).ok_or_else(|| {
                    if exp < 0 {
                        QuantityError::Precision(input.to_string())
                    } else {
                        QuantityError::Overflow(input.to_string())
                    }
                })?;
                (multiplier, divisor, QuantityFormat::DecimalSI)
            }
            None => {
                let (multiplier, format) =
                    suffix_multiplier(suffix).ok_or_else(|| QuantityError::UnknownSuffix {
                        input: input.to_string(),
                        suffix: suffix.to_string(),
                    })?;
                (multiplier, 1, format)
            }
        };

        let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && frac.is_empty()) || frac.contains('.') {
            return Err(QuantityError::InvalidNumber(input.to_string()));
        }

        // Only ASCII digits remain, so a parse failure means the mantissa is too long.
        let mantissa: i128 = format!("{whole}{frac}")
            .parse()
            .map_err(|_| QuantityError::Overflow(input.to_string()))?;
        let scale = u32::try_from(frac.len())
            .ok()
            .and_then(|len| 10i128.checked_pow(len))
            .and_then(|scale| scale.checked_mul(divisor))
            .ok_or_else(|| QuantityError::Precision(input.to_string()))?;
        let scaled = mantissa
            .checked_mul(multiplier)
            .ok_or_else(|| QuantityError::Overflow(input.to_string()))?;
        if scaled % scale != 0 {
            return Err(QuantityError::Precision(input.to_string()));
        }

        let milli = scaled / scale;
        Ok(Self {
            milli: if negative { -milli } else { milli },
            format,
        })
    }

    /// The integer value, if the quantity is whole and fits in `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        if self.milli % MILLI != 0 {
            return None;
        }
        i64::try_from(self.milli / MILLI).ok()
    }

    /// The amount in thousandths of a unit.
    pub fn milli_value(&self) -> i128 {
        self.milli
    }

    pub fn format(&self) -> QuantityFormat {
        self.format
    }

    pub fn is_zero(&self) -> bool {
        self.milli == 0
    }
}

/// Exponent of a decimal-exponent suffix (`"e3"`, `"E-2"`).
///
/// A bare `"E"` is the exa suffix, not an exponent.
fn decimal_exponent(suffix: &str) -> Option<i32> {
    let digits = suffix.strip_prefix(['e', 'E'])?;
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// `(multiplier, divisor)` in milli-units for `10^exp`.
fn exponent_multiplier(exp: i32) -> Option<(i128, i128)> {
    let shift = exp.checked_add(3)?;
    let power = 10i128.checked_pow(shift.unsigned_abs())?;
    if shift >= 0 {
        Some((power, 1))
    } else {
        Some((1, power))
    }
}

/// Multiplier in milli-units for a suffix, plus the format it implies.
fn suffix_multiplier(suffix: &str) -> Option<(i128, QuantityFormat)> {
    let decimal = |exp: u32| Some((10i128.pow(exp), QuantityFormat::DecimalSI));
    match suffix {
        "m" => decimal(0),
        "" => decimal(3),
        "k" => decimal(6),
        "M" => decimal(9),
        "G" => decimal(12),
        "T" => decimal(15),
        "P" => decimal(18),
        "E" => decimal(21),
        _ => BINARY_SUFFIXES
            .iter()
            .find(|(s, _)| *s == suffix)
            .map(|(_, exp)| ((1i128 << exp) * MILLI, QuantityFormat::BinarySI)),
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.milli == other.milli
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.milli.cmp(&other.milli)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.milli % MILLI != 0 {
            return write!(f, "{}m", self.milli);
        }
        let value = self.milli / MILLI;
        if self.format == QuantityFormat::BinarySI && value != 0 {
            for (suffix, exp) in BINARY_SUFFIXES {
                let unit = 1i128 << exp;
                if value % unit == 0 {
                    return write!(f, "{}{suffix}", value / unit);
                }
            }
        }
        write!(f, "{value}")
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Quantity {
    type Error = QuantityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Quantity> for String {
    fn from(q: Quantity) -> Self {
        q.to_string()
    }
}
