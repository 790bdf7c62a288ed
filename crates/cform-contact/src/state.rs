#![forbid(unsafe_code)]

//! Form state machine.
//!
//! # Invariants
//!
//! 1. `errors` reflects the current values: changing a field recomputes
//!    that field's entry before `set_value` returns.
//! 2. `submitted` is replaced as a whole, and only by a submit that passes
//!    every rule.
//! 3. Editing one field never touches another field's value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ContactFormConfig;
use crate::field::FieldId;
use crate::validation::{FieldError, FieldRules};

/// Values captured by a successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub message: String,
}

impl Submission {
    pub fn get(&self, field: FieldId) -> &str {
        match field {
            FieldId::FirstName => &self.first_name,
            FieldId::LastName => &self.last_name,
            FieldId::Email => &self.email,
            FieldId::Message => &self.message,
        }
    }

    pub fn has_message(&self) -> bool {
        !self.message.is_empty()
    }
}

/// Result of [`FormState::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(Submission),
    /// Every failing field, in focus order.
    Rejected(Vec<FieldError>),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

#[derive(Debug)]
pub struct FormState {
    values: [String; 4],
    errors: BTreeMap<FieldId, FieldError>,
    submitted: Option<Submission>,
    rules: FieldRules,
    clear_on_submit: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(FieldRules::default(), true)
    }
}

impl FormState {
    pub fn new(rules: FieldRules, clear_on_submit: bool) -> Self {
        Self {
            values: Default::default(),
            errors: BTreeMap::new(),
            submitted: None,
            rules,
            clear_on_submit,
        }
    }

    pub fn from_config(config: &ContactFormConfig) -> Self {
        Self::new(FieldRules::from_config(config), config.clear_on_submit)
    }

    const fn index(field: FieldId) -> usize {
        match field {
            FieldId::FirstName => 0,
            FieldId::LastName => 1,
            FieldId::Email => 2,
            FieldId::Message => 3,
        }
    }

    pub fn value(&self, field: FieldId) -> &str {
        &self.values[Self::index(field)]
    }

    /// Replace a field's value and revalidate that field.
    pub fn set_value(&mut self, field: FieldId, value: impl Into<String>) {
        let value = value.into();
        let result = self.rules.check(field, &value);
        debug!(
            field = field.key(),
            len = value.chars().count(),
            valid = result.is_ok(),
            "field changed"
        );
        match result {
            Ok(()) => {
                self.errors.remove(&field);
            }
            Err(err) => {
                self.errors.insert(field, err);
            }
        }
        self.values[Self::index(field)] = value;
    }

    pub fn error(&self, field: FieldId) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    /// Current errors in focus order.
    pub fn errors(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.values()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn submitted(&self) -> Option<&Submission> {
        self.submitted.as_ref()
    }

    pub fn clear_on_submit(&self) -> bool {
        self.clear_on_submit
    }

    /// Validate every field and, if all pass, record the submission.
    ///
    /// On rejection `errors` holds exactly the failing fields and the
    /// previous submission (if any) is kept.
    pub fn submit(&mut self) -> SubmitOutcome {
        let failures: Vec<FieldError> = FieldId::all()
            .filter_map(|field| self.rules.check(field, self.value(field)).err())
            .collect();

        self.errors = failures.iter().map(|e| (e.field, e.clone())).collect();

        if !failures.is_empty() {
            warn!(
                errors = failures.len(),
                fields = ?failures.iter().map(|e| e.field.key()).collect::<Vec<_>>(),
                "submit rejected"
            );
            return SubmitOutcome::Rejected(failures);
        }

        let submission = Submission {
            first_name: self.value(FieldId::FirstName).to_string(),
            last_name: self.value(FieldId::LastName).to_string(),
            email: self.value(FieldId::Email).to_string(),
            message: self.value(FieldId::Message).to_string(),
        };
        info!(
            has_message = submission.has_message(),
            cleared = self.clear_on_submit,
            "submit accepted"
        );
        self.submitted = Some(submission.clone());
        if self.clear_on_submit {
            self.values = Default::default();
        }
        SubmitOutcome::Accepted(submission)
    }
}
