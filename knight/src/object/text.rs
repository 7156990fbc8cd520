//! Text operations.
//!
//! All indices and lengths count characters, not bytes.

use crate::error::Runtime;

/// Convert text to an integer by scanning a numeric prefix.
///
/// Leading whitespace is skipped, then an optional `+` or `-`, then as many
/// decimal digits as possible. No digits means zero. Overlong digit runs wrap.
pub(crate) fn to_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.chars().next() {
        Some('-') => (true, &s[1..]),
        Some('+') => (false, &s[1..]),
        _ => (false, s),
    };

    let magnitude = digits
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0i64, |acc, d| acc.wrapping_mul(10).wrapping_add(d as i64));

    if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    }
}

/// Repeat text `count` times.
pub(crate) fn repeat(s: &str, count: i64) -> Result<String, Runtime> {
    let count = usize::try_from(count).map_err(|_| Runtime::NegativeRepeat(count))?;
    Ok(s.repeat(count))
}

fn out_of_range(start: i64, length: i64, s: &str) -> Runtime {
    Runtime::OutOfRange {
        start,
        end: start.saturating_add(length),
        length: s.chars().count(),
    }
}

/// Take `length` characters starting at `start`. Starting past the end gives
/// empty text, and the length is clamped to what is available.
pub(crate) fn get(s: &str, start: i64, length: i64) -> Result<String, Runtime> {
    let (Ok(from), Ok(count)) = (usize::try_from(start), usize::try_from(length)) else {
        return Err(out_of_range(start, length, s));
    };

    Ok(s.chars().skip(from).take(count).collect())
}

/// Replace the characters in `[start, start + length)` with `replacement`.
/// The range must lie within the text.
pub(crate) fn substitute(s: &str, start: i64, length: i64, replacement: &str) -> Result<String, Runtime> {
    let size = s.chars().count();
    let range = usize::try_from(start)
        .ok()
        .zip(usize::try_from(length).ok())
        .and_then(|(from, count)| from.checked_add(count).map(|to| (from, to)))
        .filter(|&(_, to)| to <= size);

    let Some((from, to)) = range else {
        return Err(out_of_range(start, length, s));
    };

    let mut ret = String::with_capacity(s.len() + replacement.len());
    ret.extend(s.chars().take(from));
    ret.push_str(replacement);
    ret.extend(s.chars().skip(to));
    Ok(ret)
}
