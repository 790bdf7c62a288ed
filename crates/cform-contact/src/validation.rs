#![forbid(unsafe_code)]

//! Field validation.
//!
//! Validators are pure: they look only at the value they are given. Each
//! failure carries an [`ErrorKind`]; [`FieldError`] pairs it with the field
//! to produce the user-facing message.

use std::fmt;

use crate::config::ContactFormConfig;
use crate::field::FieldId;

/// Why a value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fewer than `min` characters.
    TooShort { min: usize, actual: usize },
    /// Empty or whitespace-only.
    MissingRequired,
    /// Does not match the expected shape.
    InvalidFormat,
}

/// The result of a validation operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    #[default]
    Valid,
    Invalid(ErrorKind),
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    #[must_use]
    pub fn error(&self) -> Option<&ErrorKind> {
        match self {
            Self::Valid => None,
            Self::Invalid(kind) => Some(kind),
        }
    }

    /// Combine two results, returning the first error if any.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::Valid => other,
            Self::Invalid(_) => self,
        }
    }
}

/// A trait for validating values of type `T`.
pub trait Validator<T: ?Sized>: Send + Sync {
    fn validate(&self, value: &T) -> ValidationResult;
}

/// Rejects empty values. Whitespace-only counts as empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Validator<str> for Required {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.trim().is_empty() {
            ValidationResult::Invalid(ErrorKind::MissingRequired)
        } else {
            ValidationResult::Valid
        }
    }
}

/// Requires at least `min` characters (Unicode scalar values).
#[derive(Debug, Clone, Copy)]
pub struct MinLength {
    pub min: usize,
}

impl MinLength {
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl Validator<str> for MinLength {
    fn validate(&self, value: &str) -> ValidationResult {
        let actual = value.chars().count();
        if actual < self.min {
            ValidationResult::Invalid(ErrorKind::TooShort {
                min: self.min,
                actual,
            })
        } else {
            ValidationResult::Valid
        }
    }
}

/// `local@domain.tld` email check.
///
/// The local part allows `A-Z a-z 0-9 . _ % + -`. The domain is one or more
/// dot-separated labels of `A-Z a-z 0-9 -`, ending in an alphabetic TLD of at
/// least two letters. Empty input is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Email;

impl Email {
    fn is_valid(value: &str) -> bool {
        let Some((local, domain)) = value.split_once('@') else {
            return false;
        };
        if local.is_empty()
            || !local
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
        {
            return false;
        }
        let Some((host, tld)) = domain.rsplit_once('.') else {
            return false;
        };
        let host_ok = !host.is_empty()
            && host.split('.').all(|label| {
                !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            });
        let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
        host_ok && tld_ok
    }
}

impl Validator<str> for Email {
    fn validate(&self, value: &str) -> ValidationResult {
        if Self::is_valid(value) {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ErrorKind::InvalidFormat)
        }
    }
}

/// A rejected field value, displayed as the inline error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FieldId,
    pub kind: ErrorKind,
}

impl FieldError {
    pub fn new(field: FieldId, kind: ErrorKind) -> Self {
        Self { field, kind }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field.key();
        match self.kind {
            ErrorKind::TooShort { min, .. } => {
                write!(f, "Error: {field} must have at least {min} characters.")
            }
            ErrorKind::MissingRequired => write!(f, "Error: {field} is a required field."),
            ErrorKind::InvalidFormat => match self.field {
                FieldId::Email => write!(f, "Error: {field} must be a valid email address."),
                _ => write!(f, "Error: {field} has an invalid format."),
            },
        }
    }
}

impl std::error::Error for FieldError {}

/// Validators bound to each field.
pub struct FieldRules {
    first_name: Box<dyn Validator<str>>,
    last_name: Box<dyn Validator<str>>,
    email: Box<dyn Validator<str>>,
}

impl fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRules").finish_non_exhaustive()
    }
}

impl Default for FieldRules {
    fn default() -> Self {
        Self::new(ContactFormConfig::DEFAULT_FIRST_NAME_MIN_LEN)
    }
}

impl FieldRules {
    /// Standard rules with the given first-name minimum.
    pub fn new(first_name_min_len: usize) -> Self {
        Self {
            first_name: Box::new(MinLength::new(first_name_min_len)),
            last_name: Box::new(Required),
            email: Box::new(Email),
        }
    }

    pub fn from_config(config: &ContactFormConfig) -> Self {
        Self::new(config.first_name_min_len)
    }

    /// Whether `field` has a rule at all.
    pub fn is_validated(&self, field: FieldId) -> bool {
        self.rule(field).is_some()
    }

    fn rule(&self, field: FieldId) -> Option<&dyn Validator<str>> {
        match field {
            FieldId::FirstName => Some(self.first_name.as_ref()),
            FieldId::LastName => Some(self.last_name.as_ref()),
            FieldId::Email => Some(self.email.as_ref()),
            FieldId::Message => None,
        }
    }

    /// Validate one field value.
    pub fn check(&self, field: FieldId, value: &str) -> Result<(), FieldError> {
        match self.rule(field).map(|rule| rule.validate(value)) {
            Some(ValidationResult::Invalid(kind)) => Err(FieldError::new(field, kind)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn min_length_counts_characters() {
        let v = MinLength::new(5);
        assert_eq!(
            v.validate("Bill"),
            ValidationResult::Invalid(ErrorKind::TooShort { min: 5, actual: 4 })
        );
        assert!(v.validate("Billy").is_valid());
        assert!(v.validate("Zoë A").is_valid());
        assert!(v.validate("日本語").is_invalid());
    }

    #[test]
    fn required_rejects_blank() {
        assert!(Required.validate("").is_invalid());
        assert!(Required.validate("   ").is_invalid());
        assert!(Required.validate("Paris").is_valid());
    }

    #[test]
    fn email_accepts_common_addresses() {
        for ok in [
            "billybernard54@gmail.com",
            "bluebill1049@hotmail.com",
            "first.last+tag@sub.example.co",
            "a_b%c-d@my-host.io",
        ] {
            assert!(Email.validate(ok).is_valid(), "{ok}");
        }
    }

    #[test]
    fn email_rejects_malformed() {
        for bad in [
            "",
            "Billy.com",
            "@gmail.com",
            "billy@",
            "billy@gmail",
            "billy@gmail.c",
            "billy@.com",
            "billy@gmail..com",
            "bil ly@gmail.com",
            "billy@gmail.c0m",
            "a@b@c.com",
            " billy@gmail.com",
        ] {
            assert!(Email.validate(bad).is_invalid(), "{bad:?}");
        }
    }

    #[test]
    fn messages_are_exact() {
        let rules = FieldRules::default();
        let msg = |field, value| rules.check(field, value).unwrap_err().to_string();
        assert_eq!(
            msg(FieldId::FirstName, "Bill"),
            "Error: firstName must have at least 5 characters."
        );
        assert_eq!(
            msg(FieldId::LastName, ""),
            "Error: lastName is a required field."
        );
        assert_eq!(
            msg(FieldId::Email, "Billy.com"),
            "Error: email must be a valid email address."
        );
    }

    #[test]
    fn configured_minimum_is_interpolated() {
        let rules = FieldRules::new(3);
        assert!(rules.check(FieldId::FirstName, "Bob").is_ok());
        assert_eq!(
            rules.check(FieldId::FirstName, "Al").unwrap_err().to_string(),
            "Error: firstName must have at least 3 characters."
        );
    }

    #[test]
    fn message_has_no_rule() {
        let rules = FieldRules::default();
        assert!(!rules.is_validated(FieldId::Message));
        assert!(rules.check(FieldId::Message, "").is_ok());
    }

    #[test]
    fn and_keeps_first_error() {
        let a = ValidationResult::Invalid(ErrorKind::MissingRequired);
        let b = ValidationResult::Invalid(ErrorKind::InvalidFormat);
        assert_eq!(a.clone().and(b), a);
        assert!(ValidationResult::Valid.and(ValidationResult::Valid).is_valid());
    }

    proptest! {
        #[test]
        fn min_length_boundary(s in "\\PC{0,12}") {
            let n = s.chars().count();
            prop_assert_eq!(MinLength::new(5).validate(&s).is_valid(), n >= 5);
        }

        #[test]
        fn generated_emails_are_valid(
            local in "[A-Za-z0-9._%+-]{1,16}",
            host in "[A-Za-z0-9-]{1,12}",
            tld in "[A-Za-z]{2,6}",
        ) {
            let addr = format!("{local}@{host}.{tld}");
            prop_assert!(Email.validate(&addr).is_valid(), "{}", addr);
        }

        #[test]
        fn anything_without_at_is_invalid(s in "[^@]{0,30}") {
            prop_assert!(Email.validate(&s).is_invalid());
        }
    }
}
