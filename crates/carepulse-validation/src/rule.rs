//! Rule engine
//!
//! A [`FieldRule`] describes one field: the kind of value it expects, how the
//! raw value is normalized, whether it may be missing, and an ordered list of
//! predicates. Each predicate carries the message reported when it is the
//! first one to fail.
//!
//! ```text
//! raw value ─► presence ─► coerce to kind ─► normalize ─► predicates (first failure wins)
//! ```

use carepulse_common::FieldValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

/// Value kind a rule coerces its input into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Free text, select value, phone number
    Text,
    /// Calendar instant; text is coerced
    Date,
    /// Checkbox
    Bool,
    /// Upload file list
    Files,
}

impl ValueKind {
    fn default_invalid_message(self) -> &'static str {
        match self {
            ValueKind::Text => "Expected text",
            ValueKind::Date => "Please enter a valid date",
            ValueKind::Bool => "Expected a yes or no answer",
            ValueKind::Files => "Expected a list of files",
        }
    }
}

/// Text normalization applied before predicates run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    /// Strip leading/trailing whitespace
    Trim,
    /// Case-fold to lower case
    Lowercase,
}

/// Predicate over a coerced, normalized value
#[derive(Debug, Clone)]
pub enum Check {
    /// At least n characters
    MinChars(usize),
    /// At most n characters
    MaxChars(usize),
    /// Whole value matches
    Pattern(Regex),
    /// Address shape `local@domain.tld`
    Email,
    /// At least n ASCII digits
    MinDigits(usize),
    /// At most n ASCII digits
    MaxDigits(usize),
    /// One of a closed set of choices
    OneOf(&'static [&'static str]),
    /// On or after a fixed instant
    NotBefore(DateTime<Utc>),
    /// On or before the validation-time "now"
    NotAfterNow,
    /// Strictly after the validation-time "now"
    AfterNow,
    /// Literal `true`
    IsTrue,
}

impl Check {
    /// Evaluate against a coerced value. A check paired with the wrong kind
    /// never passes.
    pub fn passes(&self, value: &FieldValue, now: DateTime<Utc>) -> bool {
        match (self, value) {
            (Check::MinChars(n), FieldValue::Text(s)) => s.chars().count() >= *n,
            (Check::MaxChars(n), FieldValue::Text(s)) => s.chars().count() <= *n,
            (Check::Pattern(re), FieldValue::Text(s)) => re.is_match(s),
            (Check::Email, FieldValue::Text(s)) => is_email_shaped(s),
            (Check::MinDigits(n), FieldValue::Text(s)) => digit_count(s) >= *n,
            (Check::MaxDigits(n), FieldValue::Text(s)) => digit_count(s) <= *n,
            (Check::OneOf(choices), FieldValue::Text(s)) => choices.contains(&s.as_str()),
            (Check::NotBefore(min), FieldValue::Date(d)) => d >= min,
            (Check::NotAfterNow, FieldValue::Date(d)) => *d <= now,
            (Check::AfterNow, FieldValue::Date(d)) => *d > now,
            (Check::IsTrue, FieldValue::Bool(b)) => *b,
            _ => false,
        }
    }
}

/// A check and the message it reports
#[derive(Debug, Clone)]
pub struct Predicate {
    /// Condition
    pub check: Check,
    /// Message on failure
    pub message: &'static str,
}

/// What happens when the field is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Missing fails with this message
    Required(&'static str),
    /// Missing is valid and the field is left out of the output
    Optional,
}

/// Declarative rule for a single field
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: &'static str,
    kind: ValueKind,
    presence: Presence,
    invalid_message: &'static str,
    normalize: Vec<Normalize>,
    predicates: Vec<Predicate>,
}

impl FieldRule {
    /// Rule for a field of the given kind; required with the generic message
    pub fn new(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required("Required"),
            invalid_message: kind.default_invalid_message(),
            normalize: Vec::new(),
            predicates: Vec::new(),
        }
    }

    /// Text field
    pub fn text(name: &'static str) -> Self {
        Self::new(name, ValueKind::Text)
    }

    /// Date field (text input is coerced)
    pub fn date(name: &'static str) -> Self {
        Self::new(name, ValueKind::Date)
    }

    /// Boolean field
    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, ValueKind::Bool)
    }

    /// File-list field
    pub fn files(name: &'static str) -> Self {
        Self::new(name, ValueKind::Files)
    }

    /// Missing fails with `message`
    pub fn required(mut self, message: &'static str) -> Self {
        self.presence = Presence::Required(message);
        self
    }

    /// Missing is valid
    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    /// Message when the value has the wrong kind (or a date does not parse)
    pub fn invalid(mut self, message: &'static str) -> Self {
        self.invalid_message = message;
        self
    }

    /// Strip surrounding whitespace before checking
    pub fn trim(mut self) -> Self {
        self.normalize.push(Normalize::Trim);
        self
    }

    /// Lower-case before checking
    pub fn lowercase(mut self) -> Self {
        self.normalize.push(Normalize::Lowercase);
        self
    }

    /// Append a predicate
    pub fn check(mut self, check: Check, message: &'static str) -> Self {
        self.predicates.push(Predicate { check, message });
        self
    }

    /// Shorthand for [`Check::MinChars`]
    pub fn min_chars(self, n: usize, message: &'static str) -> Self {
        self.check(Check::MinChars(n), message)
    }

    /// Shorthand for [`Check::MaxChars`]
    pub fn max_chars(self, n: usize, message: &'static str) -> Self {
        self.check(Check::MaxChars(n), message)
    }

    /// Shorthand for [`Check::Pattern`]
    pub fn pattern(self, re: &Regex, message: &'static str) -> Self {
        self.check(Check::Pattern(re.clone()), message)
    }

    /// Field name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Expected kind
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Presence policy
    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// True unless the rule is optional
    pub fn is_required(&self) -> bool {
        matches!(self.presence, Presence::Required(_))
    }

    /// Apply the rule to the raw value.
    ///
    /// `Ok(None)` means an optional field was missing.
    pub fn apply(
        &self,
        raw: Option<&FieldValue>,
        now: DateTime<Utc>,
    ) -> Result<Option<FieldValue>, &'static str> {
        let raw = match raw {
            None | Some(FieldValue::Empty) => {
                return match self.presence {
                    Presence::Required(message) => Err(message),
                    Presence::Optional => Ok(None),
                };
            }
            Some(v) => v,
        };

        let value = self.coerce(raw).ok_or(self.invalid_message)?;

        if let Some(failed) = self.predicates.iter().find(|p| !p.check.passes(&value, now)) {
            return Err(failed.message);
        }

        Ok(Some(value))
    }

    fn coerce(&self, raw: &FieldValue) -> Option<FieldValue> {
        match (self.kind, raw) {
            (ValueKind::Text, FieldValue::Text(s)) => Some(FieldValue::Text(self.normalized(s))),
            (ValueKind::Date, FieldValue::Date(d)) => Some(FieldValue::Date(*d)),
            (ValueKind::Date, FieldValue::Text(s)) => parse_date(s).map(FieldValue::Date),
            (ValueKind::Bool, FieldValue::Bool(b)) => Some(FieldValue::Bool(*b)),
            (ValueKind::Files, FieldValue::Files(f)) => Some(FieldValue::Files(f.clone())),
            _ => None,
        }
    }

    fn normalized(&self, s: &str) -> String {
        self.normalize.iter().fold(s.to_string(), |acc, step| match step {
            Normalize::Trim => acc.trim().to_string(),
            Normalize::Lowercase => acc.to_lowercase(),
        })
    }
}

/// Parse the date shapes date inputs produce.
///
/// Accepts RFC 3339 instants, `YYYY-MM-DD` (midnight UTC) and naive
/// `YYYY-MM-DDTHH:MM[:SS]` / `YYYY-MM-DD HH:MM[:SS]` (read as UTC).
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.and_utc())
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}

fn is_email_shaped(s: &str) -> bool {
    !s.starts_with('.') && !s.contains("..") && crate::fragments::EMAIL_RE.is_match(s)
}
