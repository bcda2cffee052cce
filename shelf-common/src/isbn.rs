//! ISBN identity core
//!
//! Cleaning, validation, ISBN-10↔ISBN-13 conversion, canonical-key
//! normalization, and variant-set computation. Everything here is pure and
//! store-agnostic; the reconciliation layer (`crate::reconcile`) and both
//! persisted shells build on these functions.
//!
//! Identifier rules:
//! - ISBN-10: 9 digits plus a final digit or `X` check character.
//! - ISBN-13: 13 digits, prefix `978` or `979`.
//! - The two forms are equivalent only under the `978` prefix conversion;
//!   `979`-prefixed ISBN-13s have no ISBN-10 form.
//! - Records are stored under the ISBN-13 (canonical) form.
//!
//! Validation surfaces failures as `IsbnError` values, never panics: a
//! mistyped ISBN is ordinary input, not a fault. The conversion functions
//! assume validated input and produce garbage-in/garbage-out (but panic-free)
//! results when that contract is broken.

use thiserror::Error;

/// Reserved identifier that bypasses validation and normalization entirely.
///
/// Always valid, always stored and retrieved verbatim, never converted.
pub const SENTINEL_ISBN: &str = "6666666666666";

/// Validation failures for ISBN input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsbnError {
    /// Cleaned input is neither 10 nor 13 characters
    #[error("expected 10 or 13 characters, got {0}")]
    InvalidLength(usize),

    /// ISBN-13 input outside the 978/979 bookland prefixes
    #[error("ISBN-13 must start with 978 or 979, got {0}")]
    InvalidPrefix(String),

    /// Character-class failure (non-digit where a digit is required)
    #[error("ISBN contains invalid characters")]
    InvalidFormat,

    /// Embedded check digit is inconsistent (strict validation only)
    #[error("ISBN check digit mismatch")]
    BadCheckDigit,
}

/// Strip whitespace and hyphens from raw ISBN input.
///
/// Formatting normalization only; performs no digit validation.
pub fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Validate raw ISBN input, returning the cleaned identifier.
///
/// Checks, in order: sentinel short-circuit, length (10 or 13), bookland
/// prefix for ISBN-13, then character classes (9 digits + digit/`X` for
/// ISBN-10, all digits for ISBN-13). Check digits are NOT verified here;
/// see [`validate_strict`].
pub fn validate(raw: &str) -> Result<String, IsbnError> {
    let cleaned = clean(raw);
    if cleaned == SENTINEL_ISBN {
        return Ok(cleaned);
    }

    match cleaned.chars().count() {
        10 => {
            let mut chars = cleaned.chars();
            let body_ok = chars.by_ref().take(9).all(|c| c.is_ascii_digit());
            let check_ok = chars
                .next()
                .is_some_and(|c| c.is_ascii_digit() || c == 'X' || c == 'x');
            if !body_ok || !check_ok {
                return Err(IsbnError::InvalidFormat);
            }
        }
        13 => {
            if !cleaned.starts_with("978") && !cleaned.starts_with("979") {
                return Err(IsbnError::InvalidPrefix(cleaned.chars().take(3).collect()));
            }
            if !cleaned.chars().all(|c| c.is_ascii_digit()) {
                return Err(IsbnError::InvalidFormat);
            }
        }
        n => return Err(IsbnError::InvalidLength(n)),
    }

    Ok(cleaned)
}

/// Validate raw ISBN input and verify the embedded check digit.
///
/// Same rules as [`validate`] plus mathematical consistency of the check
/// character. Opt-in; the permissive [`validate`] is the default throughout
/// the suite.
pub fn validate_strict(raw: &str) -> Result<String, IsbnError> {
    let cleaned = validate(raw)?;
    if cleaned == SENTINEL_ISBN {
        return Ok(cleaned);
    }

    let consistent = match cleaned.chars().count() {
        10 => {
            // Weighted sum over all 10 symbols must be divisible by 11,
            // with X counting as 10.
            let sum: u32 = cleaned
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    let value = match c {
                        'X' | 'x' => 10,
                        _ => c.to_digit(10).unwrap_or(0),
                    };
                    value * (10 - i as u32)
                })
                .sum();
            sum % 11 == 0
        }
        _ => {
            // EAN-13: alternating 1/3 weights over all 13 digits must be
            // divisible by 10.
            let sum: u32 = cleaned
                .chars()
                .enumerate()
                .map(|(i, c)| c.to_digit(10).unwrap_or(0) * if i % 2 == 0 { 1 } else { 3 })
                .sum();
            sum % 10 == 0
        }
    };

    if consistent {
        Ok(cleaned)
    } else {
        Err(IsbnError::BadCheckDigit)
    }
}

/// Convert a cleaned ISBN-10 to its ISBN-13 form.
///
/// Prefixes `978` to the first 9 digits and appends the EAN-13 check digit.
/// Assumes validated input.
pub fn to_isbn13(isbn10: &str) -> String {
    let partial: String = format!("978{}", isbn10.chars().take(9).collect::<String>());
    let sum: u32 = partial
        .chars()
        .enumerate()
        .map(|(i, c)| c.to_digit(10).unwrap_or(0) * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    let check = (10 - (sum % 10)) % 10;
    format!("{}{}", partial, check)
}

/// Convert a cleaned ISBN-13 to its ISBN-10 form, when one exists.
///
/// Returns `None` for `979`-prefixed codes, which have no ISBN-10
/// equivalent. Assumes validated input.
pub fn to_isbn10(isbn13: &str) -> Option<String> {
    if !isbn13.starts_with("978") {
        return None;
    }

    let partial: String = isbn13.chars().skip(3).take(9).collect();
    let sum: u32 = partial
        .chars()
        .enumerate()
        .map(|(i, c)| c.to_digit(10).unwrap_or(0) * (10 - i as u32))
        .sum();
    let check_char = match 11 - (sum % 11) {
        10 => 'X',
        11 => '0',
        d => char::from_digit(d, 10).unwrap_or('0'),
    };
    Some(format!("{}{}", partial, check_char))
}

/// Normalize raw ISBN input to its canonical storage key.
///
/// Sentinel and ISBN-13 input pass through cleaned; ISBN-10 input is
/// converted to ISBN-13. Input of any other length (callers that bypassed
/// validation) falls through cleaned and unchanged. Idempotent.
pub fn normalize(raw: &str) -> String {
    let cleaned = clean(raw);
    if cleaned == SENTINEL_ISBN {
        return cleaned;
    }

    match cleaned.chars().count() {
        13 => cleaned,
        10 => to_isbn13(&cleaned),
        _ => cleaned,
    }
}

/// Compute all identifier strings that may refer to the same stored record.
///
/// The cleaned input is always the first element. A `978`-prefixed ISBN-13
/// contributes its derived ISBN-10; an ISBN-10 contributes its derived
/// ISBN-13. Lookup probes these in order so a record is found regardless of
/// which form it was originally stored under.
pub fn variants(raw: &str) -> Vec<String> {
    let cleaned = clean(raw);
    if cleaned == SENTINEL_ISBN {
        return vec![cleaned];
    }

    let mut out = vec![cleaned.clone()];
    match cleaned.chars().count() {
        13 if cleaned.starts_with("978") => {
            if let Some(ten) = to_isbn10(&cleaned) {
                out.push(ten);
            }
        }
        10 => {
            let thirteen = to_isbn13(&cleaned);
            if thirteen != cleaned {
                out.push(thirteen);
            }
        }
        _ => {}
    }
    out
}
