//! Scalar decoding and text capture.
//!
//! Numeric decoding follows `strtol`/`strtod` prefix semantics: leading
//! whitespace is skipped and the longest valid numeric prefix is consumed.
//! Decoding fails only when no characters form a number or the value is out
//! of representable range - `"10 km/h"` decodes to 10, `"km/h"` fails.
//!
//! Text capture preserves absence: a missing attribute or empty element
//! stays `None`, distinct from present-but-empty text, so "(unknown)"
//! sentinels are only ever used for true absence.

use std::fmt;

/// A decoded numeric observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Which numeric grammar a value element uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Integer,
    Float,
}

/// Decode element text according to the expected kind.
pub fn decode(kind: ScalarKind, text: &str) -> Option<Scalar> {
    match kind {
        ScalarKind::Integer => decode_integer(text).map(Scalar::Integer),
        ScalarKind::Float => decode_float(text).map(Scalar::Float),
    }
}

/// Decode the longest base-10 integer prefix. Fails when no digits were
/// consumed or the value does not fit in an `i64`.
pub fn decode_integer(text: &str) -> Option<i64> {
    let bytes = text.trim_start().as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    let mut value: i64 = 0;
    let mut consumed = 0usize;
    for &b in digits {
        if !b.is_ascii_digit() {
            break;
        }
        let digit = i64::from(b - b'0');
        // Accumulate toward the sign so i64::MIN stays representable.
        value = value.checked_mul(10)?;
        value = if negative {
            value.checked_sub(digit)?
        } else {
            value.checked_add(digit)?
        };
        consumed += 1;
    }
    if consumed == 0 {
        return None;
    }
    Some(value)
}

/// Decode the longest floating-point prefix (optional sign, digits,
/// optional fraction and exponent). Fails when no digits were consumed or
/// the magnitude overflows to infinity.
pub fn decode_float(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let prefix = float_prefix(trimmed);
    if prefix == 0 {
        return None;
    }
    let value: f64 = trimmed[..prefix].parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value)
}

/// Length of the longest prefix matching the float grammar, 0 if none.
/// An exponent marker only counts when followed by at least one digit,
/// matching `strtod` backtracking on input like `"1e"`.
fn float_prefix(s: &str) -> usize {
    let b = s.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let mut digits = 0usize;
    while b.get(i).is_some_and(|c| c.is_ascii_digit()) {
        i += 1;
        digits += 1;
    }
    if b.get(i) == Some(&b'.') {
        let mut j = i + 1;
        while b.get(j).is_some_and(|c| c.is_ascii_digit()) {
            j += 1;
            digits += 1;
        }
        if digits > 0 {
            i = j;
        }
    }
    if digits == 0 {
        return 0;
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let mut exp_digits = 0usize;
        while b.get(j).is_some_and(|c| c.is_ascii_digit()) {
            j += 1;
            exp_digits += 1;
        }
        if exp_digits > 0 {
            i = j;
        }
    }
    i
}

/// How captured text fields are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPolicy {
    /// Silently truncate to at most this many bytes, cutting back to a
    /// character boundary. Intentional degradation, not an error.
    Bounded(usize),
    /// Copy the exact text.
    Dynamic,
}

/// Capture element text or an attribute value under a policy. `None` in,
/// `None` out: absence is never conflated with the empty string.
pub fn capture(text: Option<&str>, policy: TextPolicy) -> Option<String> {
    let text = text?;
    match policy {
        TextPolicy::Dynamic => Some(text.to_owned()),
        TextPolicy::Bounded(max) => Some(truncate_to(text, max).to_owned()),
    }
}

fn truncate_to(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut cut = max;
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }
    &s[..cut]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_prefix_semantics() {
        assert_eq!(decode_integer("100"), Some(100));
        assert_eq!(decode_integer("  -42"), Some(-42));
        assert_eq!(decode_integer("+7"), Some(7));
        assert_eq!(decode_integer("10.5"), Some(10));
        assert_eq!(decode_integer("12abc"), Some(12));
        assert_eq!(decode_integer("abc"), None);
        assert_eq!(decode_integer(""), None);
        assert_eq!(decode_integer("-"), None);
    }

    #[test]
    fn integer_range() {
        assert_eq!(decode_integer("9223372036854775807"), Some(i64::MAX));
        assert_eq!(decode_integer("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(decode_integer("9223372036854775808"), None);
        assert_eq!(decode_integer("99999999999999999999999999"), None);
    }

    #[test]
    fn float_prefix_semantics() {
        assert_eq!(decode_float("12.5"), Some(12.5));
        assert_eq!(decode_float(" -0.25 "), Some(-0.25));
        assert_eq!(decode_float(".5"), Some(0.5));
        assert_eq!(decode_float("1."), Some(1.0));
        assert_eq!(decode_float("1e3"), Some(1000.0));
        assert_eq!(decode_float("1e"), Some(1.0)); // exponent backs off
        assert_eq!(decode_float("3.2km"), Some(3.2));
        assert_eq!(decode_float("abc"), None);
        assert_eq!(decode_float("."), None);
        assert_eq!(decode_float(""), None);
    }

    #[test]
    fn float_range() {
        assert_eq!(decode_float("1e999"), None);
        assert_eq!(decode_float("-1e999"), None);
    }

    #[test]
    fn capture_preserves_absence() {
        assert_eq!(capture(None, TextPolicy::Dynamic), None);
        assert_eq!(capture(Some(""), TextPolicy::Dynamic), Some(String::new()));
        assert_eq!(
            capture(Some("S1"), TextPolicy::Bounded(8)),
            Some("S1".to_owned())
        );
    }

    #[test]
    fn bounded_capture_truncates_on_char_boundary() {
        assert_eq!(
            capture(Some("abcdef"), TextPolicy::Bounded(3)),
            Some("abc".to_owned())
        );
        // "é" is two bytes; cutting inside it must back off.
        assert_eq!(
            capture(Some("aé"), TextPolicy::Bounded(2)),
            Some("a".to_owned())
        );
    }
}
