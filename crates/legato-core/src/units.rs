//! Base-unit / display-unit conversion
//!
//! Pure functions, no I/O. Every coin handled here uses 8 decimals, so
//! `display = base / 10^8` and `base = round(display * 10^8)`.
//!
//! `to_base_units` rounds the exact binary value of its input, so the only
//! error in a round trip is the one `to_display_units` makes when dividing.
//! That stays under half an octa while the display amount is below 2^26, so
//! `to_base_units(to_display_units(b)) == b` holds for every
//! `b <= MAX_EXACT_OCTAS`. Above it neighbouring octa amounts share an `f64`.

use crate::constants::{DECIMALS, OCTAS_PER_COIN};
use crate::{Octas, ProtocolError};

/// Largest base amount guaranteed to survive a display round trip (2^26 coins)
pub const MAX_EXACT_OCTAS: Octas = (1 << 26) * OCTAS_PER_COIN;

/// Convert a display amount to base units, rounding half away from zero.
pub fn to_base_units(display: f64) -> Result<Octas, ProtocolError> {
    if !display.is_finite() {
        return Err(ProtocolError::invalid_amount(format!(
            "{display} is not a finite number"
        )));
    }
    if display < 0.0 {
        return Err(ProtocolError::invalid_amount(format!(
            "{display} is negative"
        )));
    }

    let too_large = || {
        ProtocolError::invalid_amount(format!(
            "{display} exceeds the largest representable amount"
        ))
    };

    // display == mantissa * 2^exponent exactly
    let bits = display.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };

    // Anything >= 2^52 coins is far past u64::MAX octas
    if exponent >= 0 {
        return Err(too_large());
    }

    let shift = exponent.unsigned_abs();
    let scaled = mantissa as u128 * OCTAS_PER_COIN as u128;
    // scaled < 2^80, so it vanishes entirely
    if shift >= 128 {
        return Ok(0);
    }

    let whole = scaled >> shift;
    let remainder = scaled & ((1u128 << shift) - 1);
    let half = 1u128 << (shift - 1);
    let rounded = if remainder >= half { whole + 1 } else { whole };

    Octas::try_from(rounded).map_err(|_| too_large())
}

/// Convert base units to a display amount.
pub fn to_display_units(base: Octas) -> f64 {
    base as f64 / OCTAS_PER_COIN as f64
}

/// Convert a signed raw value (as parsed from an external response) to a
/// display amount.
pub fn to_display_units_signed(base: i128) -> Result<f64, ProtocolError> {
    if base < 0 {
        return Err(ProtocolError::invalid_amount(format!(
            "base amount {base} is negative"
        )));
    }
    let base = Octas::try_from(base).map_err(|_| {
        ProtocolError::invalid_amount(format!("base amount {base} does not fit in u64"))
    })?;
    Ok(to_display_units(base))
}

/// Render a display amount with a fixed number of decimal places.
pub fn format_display(amount: f64, places: usize) -> String {
    format!("{:.*}", places.min(DECIMALS as usize), amount)
}

/// Parse an amount as typed by the user. Empty input reads as zero.
pub fn parse_display(input: &str) -> Result<f64, ProtocolError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| ProtocolError::invalid_amount(format!("'{trimmed}' is not a number")))?;

    if !value.is_finite() || value < 0.0 {
        return Err(ProtocolError::invalid_amount(format!(
            "'{trimmed}' is not a non-negative amount"
        )));
    }

    Ok(value)
}
