//! Display and input helpers used around the forms

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Longest input kept by [`sanitize_input`]
pub const MAX_INPUT_CHARS: usize = 1000;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script>").expect("valid script pattern"));
static JS_SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("valid scheme pattern"));
static EVENT_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bon\w+\s*=\s*"[^"]*""#).expect("valid attribute pattern"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("valid phone pattern"));

/// Drop angle brackets, trim, and cap the length
pub fn sanitize_input(input: &str) -> String {
    input
        .replace(['<', '>'], "")
        .trim()
        .chars()
        .take(MAX_INPUT_CHARS)
        .collect()
}

/// Strip script blocks, `javascript:` schemes and inline event handlers
pub fn sanitize_html(html: &str) -> String {
    let out = SCRIPT_RE.replace_all(html, "");
    let out = JS_SCHEME_RE.replace_all(&out, "");
    EVENT_ATTR_RE.replace_all(&out, "").into_owned()
}

/// `(555) 123-4567` for ten digits, the input unchanged otherwise
pub fn format_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        phone.to_string()
    }
}

/// `January 5, 2024`
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// `09:05 AM`
pub fn format_time(date: DateTime<Utc>) -> String {
    date.format("%I:%M %p").to_string()
}

/// Loose address shape check for hints
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// E.164-ish after removing spaces, dashes and parentheses
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    PHONE_RE.is_match(&compact)
}

/// Screen-reader label for a camelCase field name
pub fn aria_label(field: &str, required: bool) -> String {
    let mut words = String::with_capacity(field.len() + 8);
    for (i, c) in field.chars().enumerate() {
        if i == 0 {
            words.extend(c.to_uppercase());
        } else {
            if c.is_uppercase() {
                words.push(' ');
            }
            words.push(c);
        }
    }
    if required {
        words.push_str(", required");
    }
    words
}

/// Random element id such as `field-3f9a0c21b`
pub fn generate_id(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &suffix[..9])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sanitize_input() {
        assert_eq!(sanitize_input("  <b>Jane</b>  "), "bJane/b");
        assert_eq!(sanitize_input(&"x".repeat(2000)).len(), MAX_INPUT_CHARS);
    }

    #[test]
    fn test_sanitize_html() {
        let html = r#"<p onclick="steal()">Hi</p><SCRIPT>alert(1)</SCRIPT><a href="javascript:x()">y</a>"#;
        let clean = sanitize_html(html);
        assert_eq!(clean, r#"<p >Hi</p><a href="x()">y</a>"#);
    }

    #[test]
    fn test_formatting() {
        let d = Utc.with_ymd_and_hms(2024, 1, 5, 9, 5, 0).unwrap();
        assert_eq!(format_date(d), "January 5, 2024");
        assert_eq!(format_time(d), "09:05 AM");
        assert_eq!(format_phone_number("555-123-4567"), "(555) 123-4567");
        assert_eq!(format_phone_number("+44 7700"), "+44 7700");
    }

    #[test]
    fn test_predicates() {
        assert!(is_valid_email("jane@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(is_valid_phone("+1 (555) 123-4567"));
        assert!(!is_valid_phone("0123"));
    }

    #[test]
    fn test_aria_label() {
        assert_eq!(aria_label("birthDate", true), "Birth Date, required");
        assert_eq!(aria_label("email", false), "Email");
    }

    #[test]
    fn test_generate_id() {
        let a = generate_id("field");
        assert!(a.starts_with("field-"));
        assert_eq!(a.len(), "field-".len() + 9);
        assert_ne!(a, generate_id("field"));
    }
}
