//! Duration strings for the aggregation interval (`30s`, `1m`, `1h30m`).

use std::time::Duration;

use crate::{GatorError, Result};

/// Fraction digits beyond this are ignored.
const MAX_FRACTION_DIGITS: u32 = 18;

fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 3_600 * 1_000_000_000,
        _ => return None,
    };
    Some(nanos)
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// Parse a positive duration made of `<number><unit>` terms.
///
/// Numbers may have a fractional part. Units are `ns`, `us` (or `µs`),
/// `ms`, `s`, `m` and `h`. Every term needs a unit, and a total of zero
/// is rejected.
pub fn parse_interval(input: &str) -> Result<Duration> {
    let invalid = || GatorError::InvalidInterval(input.to_string());

    let mut rest = input;
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after) = split_digits(rest);
        let (fraction, after) = match after.strip_prefix('.') {
            Some(after) => split_digits(after),
            None => ("", after),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }

        let unit_end = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_end);
        let scale = unit_nanos(unit).ok_or_else(invalid)?;

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let mut term = whole.checked_mul(scale).ok_or_else(invalid)?;

        let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS as usize)];
        if !fraction.is_empty() {
            let digits: u128 = fraction.parse().map_err(|_| invalid())?;
            term += digits * scale / 10u128.pow(fraction.len() as u32);
        }

        total = total.checked_add(term).ok_or_else(invalid)?;
        rest = after;
    }

    if total == 0 {
        return Err(invalid());
    }
    let nanos = u64::try_from(total).map_err(|_| invalid())?;
    Ok(Duration::from_nanos(nanos))
}
