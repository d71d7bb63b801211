//! Vault Yield Calculator
//!
//! Pure math, no async, no I/O. Cheap enough to run on every keystroke.
//!
//! Simple interest prorated by days to maturity:
//!   payout = principal + principal * rate * (days_remaining / 365)
//!
//! `days_remaining` is not clamped. Past maturity it goes negative and the
//! payout drops below principal; `Projection::expired` flags that case.

use legato_core::constants::{DAYS_PER_YEAR, SECONDS_PER_DAY};
use legato_core::{ProtocolError, Timestamp};

use crate::state::{MaturityTerm, Projection};

/// Fractional days from `now` until maturity
pub fn days_remaining(term: &MaturityTerm, now: Timestamp) -> f64 {
    term.maturity_timestamp.saturating_sub(now) as f64 / SECONDS_PER_DAY
}

/// Projected PT payout for depositing `principal` at `now`.
pub fn estimate(
    principal: f64,
    term: &MaturityTerm,
    now: Timestamp,
) -> Result<f64, ProtocolError> {
    if !principal.is_finite() || principal < 0.0 {
        return Err(ProtocolError::invalid_amount(format!(
            "principal {principal} must be a non-negative number"
        )));
    }
    if principal == 0.0 {
        return Ok(0.0);
    }

    let days = days_remaining(term, now);
    Ok(principal + principal * term.annual_rate * (days / DAYS_PER_YEAR))
}

/// `estimate` plus the day count and expiry flag
pub fn project(
    principal: f64,
    term: &MaturityTerm,
    now: Timestamp,
) -> Result<Projection, ProtocolError> {
    let payout = estimate(principal, term, now)?;
    let days = days_remaining(term, now);

    Ok(Projection {
        payout,
        days_remaining: days,
        expired: days < 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATURITY: Timestamp = 1_714_483_013;
    const DAY: Timestamp = 86_400;

    fn term() -> MaturityTerm {
        MaturityTerm::new(MATURITY, 0.05)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_full_year_remaining() {
        // 100 + 100 * 0.05 * 1
        let out = estimate(100.0, &term(), MATURITY - 365 * DAY).unwrap();
        assert_close(out, 105.0);
    }

    #[test]
    fn test_at_maturity_returns_principal() {
        assert_close(estimate(100.0, &term(), MATURITY).unwrap(), 100.0);
    }

    #[test]
    fn test_zero_principal_is_exactly_zero() {
        for now in [0, MATURITY - DAY, MATURITY, MATURITY + 400 * DAY] {
            assert_eq!(estimate(0.0, &term(), now).unwrap(), 0.0);
        }
        let high_rate = MaturityTerm::new(MATURITY, 12.0);
        assert_eq!(estimate(0.0, &high_rate, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_half_year_fractional_days() {
        // 182.5 days -> half the annual rate
        let now = MATURITY - (365 * DAY) / 2;
        assert_close(estimate(200.0, &term(), now).unwrap(), 205.0);
    }

    #[test]
    fn test_monotonic_in_principal() {
        let now = MATURITY - 30 * DAY;
        let principals = [0.0, 0.0001, 0.5, 1.0, 2.5, 100.0, 1_000_000.0];
        let outputs: Vec<f64> = principals
            .iter()
            .map(|p| estimate(*p, &term(), now).unwrap())
            .collect();

        for pair in outputs.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_past_maturity_is_not_clamped() {
        let now = MATURITY + 365 * DAY;
        assert_close(estimate(100.0, &term(), now).unwrap(), 95.0);

        let projection = project(100.0, &term(), now).unwrap();
        assert!(projection.expired);
        assert_close(projection.days_remaining, -365.0);
        assert!(projection.payout < 100.0);
    }

    #[test]
    fn test_rejects_bad_principal() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = estimate(bad, &term(), MATURITY).unwrap_err();
            assert_eq!(err.error_code(), "invalid_amount");
        }
    }

    #[test]
    fn test_project_before_maturity() {
        let projection = project(100.0, &term(), MATURITY - 73 * DAY).unwrap();
        assert!(!projection.expired);
        assert_close(projection.days_remaining, 73.0);
        assert_close(projection.payout, 101.0);
    }
}
