//! Phone number utilities.
//!
//! Everything downstream (OTP store keys, Twilio `To`, the booked row) uses
//! the normalised `+<digits>` form produced here.

use once_cell::sync::Lazy;
use regex::Regex;

/// E.164 with at least 7 digits, country code included.
static E164_REGEX: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\+[1-9]\d{6,14}$").ok());

/// Normalise a phone number to `+<digits>`.
///
/// Formatting characters are dropped. A leading `00` becomes `+`; a single
/// leading `0` is replaced by `+<default_country_code>` when one is
/// configured; any other bare digit string is taken as already carrying its
/// country code. Returns an empty string when no digits remain.
pub fn normalize_phone(raw: &str, default_country_code: Option<&str>) -> String {
    let trimmed = raw.trim();
    let has_plus = trimmed.starts_with('+');
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return String::new();
    }
    if has_plus {
        return format!("+{digits}");
    }
    if let Some(rest) = digits.strip_prefix("00") {
        return format!("+{rest}");
    }
    if let (Some(rest), Some(cc)) = (digits.strip_prefix('0'), default_country_code) {
        let cc = cc.trim_start_matches('+');
        if !cc.is_empty() {
            return format!("+{cc}{rest}");
        }
    }
    format!("+{digits}")
}

/// Check that an already-normalised number is E.164: `+`, a non-zero first
/// digit, 7 to 15 digits in total.
pub fn is_valid_phone(normalized: &str) -> bool {
    E164_REGEX
        .as_ref()
        .is_some_and(|re| re.is_match(normalized))
}

/// Mask a phone number for logs (e.g. `+96****0001`).
pub fn mask_phone(phone: &str) -> String {
    let normalized: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}
