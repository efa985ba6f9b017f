//! Shared rule fragments
//!
//! Schemas are assembled from these builders rather than extending one
//! another: the patient schema reuses the same name/email/phone fragments as
//! the user schema, and every consent checkbox is the same fragment with its
//! own messages.

use crate::rule::{Check, FieldRule};
use regex::Regex;
use std::sync::LazyLock;

pub(crate) static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s\-'.]+$").expect("valid name pattern"));

pub(crate) static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[0-9]{10,15}$").expect("valid phone pattern"));

pub(crate) static POLICY_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-]+$").expect("valid policy number pattern"));

pub(crate) static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("valid email pattern")
});

const NAME_CHARSET_MESSAGE: &str =
    "Name can only contain letters, spaces, hyphens, and apostrophes";

/// Person name: trimmed, 2–100 characters, letters/spaces/hyphens/apostrophes/periods
pub fn person_name(
    field: &'static str,
    too_short: &'static str,
    too_long: &'static str,
) -> FieldRule {
    FieldRule::text(field)
        .trim()
        .min_chars(2, too_short)
        .max_chars(100, too_long)
        .pattern(&NAME_RE, NAME_CHARSET_MESSAGE)
}

/// Email address: trimmed, lower-cased, shape-checked, 5–254 characters
pub fn email(field: &'static str) -> FieldRule {
    FieldRule::text(field)
        .trim()
        .lowercase()
        .check(Check::Email, "Please enter a valid email address")
        .min_chars(5, "Email must be at least 5 characters")
        .max_chars(254, "Email must be less than 254 characters")
}

/// Primary phone: `+` and 10–15 digits, with digit-count messages first
pub fn phone(field: &'static str) -> FieldRule {
    FieldRule::text(field)
        .check(Check::MinDigits(10), "Phone number must be at least 10 digits")
        .check(Check::MaxDigits(15), "Phone number must be less than 15 digits")
        .pattern(
            &PHONE_RE,
            "Please enter a valid international phone number starting with +",
        )
}

/// Secondary phone: shape only, single message
pub fn contact_phone(field: &'static str, message: &'static str) -> FieldRule {
    FieldRule::text(field).pattern(&PHONE_RE, message)
}

/// Trimmed text bounded on both sides
pub fn bounded_text(
    field: &'static str,
    (min, too_short): (usize, &'static str),
    (max, too_long): (usize, &'static str),
) -> FieldRule {
    FieldRule::text(field)
        .trim()
        .min_chars(min, too_short)
        .max_chars(max, too_long)
}

/// Optional free text with an upper bound
pub fn optional_text(field: &'static str, max: usize, too_long: &'static str) -> FieldRule {
    FieldRule::text(field).optional().max_chars(max, too_long)
}

/// Non-empty selection (provider, physician)
pub fn selection(field: &'static str, message: &'static str) -> FieldRule {
    FieldRule::text(field).required(message).min_chars(1, message)
}

/// Consent checkbox: only literal `true` passes; missing and `false` report
/// different messages
pub fn consent(
    field: &'static str,
    missing: &'static str,
    refused: &'static str,
) -> FieldRule {
    FieldRule::boolean(field)
        .required(missing)
        .invalid(missing)
        .check(Check::IsTrue, refused)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carepulse_common::FieldValue;
    use chrono::{TimeZone, Utc};

    fn run(rule: &FieldRule, v: &str) -> Result<Option<FieldValue>, &'static str> {
        rule.apply(
            Some(&FieldValue::from(v)),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_email_shape() {
        let rule = email("email");
        assert!(run(&rule, "jane.doe+tag@mail.example.org").is_ok());
        assert!(run(&rule, "o'neil@example.ie").is_ok());
        assert_eq!(run(&rule, "jane@").unwrap_err(), "Please enter a valid email address");
        assert!(run(&rule, ".jane@example.com").is_err());
        assert!(run(&rule, "ja..ne@example.com").is_err());
        assert!(run(&rule, "jane@example.c").is_err());
        assert!(run(&rule, "jane doe@example.com").is_err());
    }

    #[test]
    fn test_phone_messages() {
        let rule = phone("phone");
        assert_eq!(run(&rule, "+123").unwrap_err(), "Phone number must be at least 10 digits");
        assert_eq!(
            run(&rule, "+1234567890123456").unwrap_err(),
            "Phone number must be less than 15 digits"
        );
        assert_eq!(
            run(&rule, "5551234567").unwrap_err(),
            "Please enter a valid international phone number starting with +"
        );
        assert!(run(&rule, "+123456789012345").is_ok());
        assert!(run(&rule, "+1 555 123 4567").is_err());
    }

    #[test]
    fn test_name_is_trimmed_before_length() {
        let rule = person_name("name", "short", "long");
        assert_eq!(run(&rule, "  J  ").unwrap_err(), "short");
        assert_eq!(run(&rule, "  Jo  ").unwrap(), Some(FieldValue::from("Jo")));
        assert_eq!(run(&rule, "Mary-Jane O'Neil Jr.").unwrap(), Some(FieldValue::from("Mary-Jane O'Neil Jr.")));
    }
}
