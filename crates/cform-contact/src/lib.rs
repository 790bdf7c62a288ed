#![forbid(unsafe_code)]

//! Contact form: field rules, form state, and the terminal model that
//! renders them.

pub mod app;
pub mod cli;
pub mod config;
pub mod field;
pub mod state;
pub mod validation;

pub use app::{ContactFormApp, Msg};
pub use config::{ConfigError, ContactFormConfig};
pub use field::FieldId;
pub use state::{FormState, SubmitOutcome, Submission};
pub use validation::{ErrorKind, FieldError, FieldRules, ValidationResult, Validator};
