//! Exact decimal amounts.
//!
//! Amounts arrive as decimal text in ether and are converted to wei with
//! integer arithmetic only. A conversion that would drop a non-zero digit
//! or overflow `U256` is an error, never a rounding.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::U256;

/// Decimals of the native unit (ether → wei).
pub const ETHER_DECIMALS: u32 = 18;

/// Largest accepted magnitude of a scientific-notation exponent.
const MAX_EXPONENT: i64 = 1_000;

/// Reasons an amount is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount must not be negative")]
    Negative,

    #[error("'{0}' is not a decimal number")]
    Malformed(String),

    #[error("amount has more than {decimals} decimal places")]
    PrecisionLoss { decimals: u32 },

    #[error("amount does not fit in 256 bits")]
    Overflow,
}

/// A non-negative decimal number: `mantissa * 10^-scale`.
///
/// Normalized so the mantissa carries no trailing zeros (zero is `0 * 10^0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount {
    mantissa: U256,
    scale: i64,
}

impl Amount {
    pub const ZERO: Amount = Amount {
        mantissa: U256::ZERO,
        scale: 0,
    };

    /// Convert to an integer count of the smallest unit with `decimals` places.
    pub fn to_base_units(&self, decimals: u32) -> Result<U256, AmountError> {
        if self.mantissa.is_zero() {
            return Ok(U256::ZERO);
        }

        let shift = i64::from(decimals) - self.scale;
        if shift < 0 {
            // Normalized mantissa has no trailing zeros, so dividing would drop digits.
            return Err(AmountError::PrecisionLoss { decimals });
        }

        let factor = U256::from(10u8)
            .checked_pow(U256::from(shift as u64))
            .ok_or(AmountError::Overflow)?;
        self.mantissa.checked_mul(factor).ok_or(AmountError::Overflow)
    }

    /// Convert ether to wei.
    pub fn to_wei(&self) -> Result<U256, AmountError> {
        self.to_base_units(ETHER_DECIMALS)
    }

    fn normalized(mut mantissa: U256, mut scale: i64) -> Self {
        if mantissa.is_zero() {
            return Self::ZERO;
        }
        let ten = U256::from(10u8);
        while (mantissa % ten).is_zero() {
            mantissa /= ten;
            scale -= 1;
        }
        Self { mantissa, scale }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(AmountError::Empty);
        }
        let malformed = || AmountError::Malformed(text.to_string());

        let text = match text.strip_prefix('-') {
            Some(rest) if rest.parse::<Amount>().is_ok() => return Err(AmountError::Negative),
            Some(_) => return Err(malformed()),
            None => text.strip_prefix('+').unwrap_or(text),
        };

        let (number, exponent) = match text.find(['e', 'E']) {
            Some(idx) => {
                let exp: i64 = text[idx + 1..].parse().map_err(|_| malformed())?;
                if exp.abs() > MAX_EXPONENT {
                    return Err(malformed());
                }
                (&text[..idx], exp)
            }
            None => (text, 0),
        };

        let (int_part, frac_part) = match number.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (number, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let digits = format!("{}{}", int_part, frac_part);
        let digits = digits.trim_start_matches('0');
        // Trailing zeros move into the scale so they never count against U256.
        let significant = digits.trim_end_matches('0');
        let dropped = (digits.len() - significant.len()) as i64;
        let mantissa = if significant.is_empty() {
            U256::ZERO
        } else {
            U256::from_str_radix(significant, 10).map_err(|_| AmountError::Overflow)?
        };

        let scale = frac_part.len() as i64 - exponent - dropped;

        Ok(Self::normalized(mantissa, scale))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.to_string();
        if self.scale <= 0 {
            return write!(f, "{}{}", digits, "0".repeat((-self.scale) as usize));
        }
        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", int_part, frac_part)
        } else {
            write!(f, "0.{}{}", "0".repeat(scale - digits.len()), digits)
        }
    }
}
