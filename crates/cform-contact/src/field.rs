#![forbid(unsafe_code)]

use std::fmt;

/// The four user-editable fields, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    FirstName,
    LastName,
    Email,
    Message,
}

impl FieldId {
    pub const ALL: [FieldId; 4] = [Self::FirstName, Self::LastName, Self::Email, Self::Message];

    /// Key used in error messages and serialized output.
    pub const fn key(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Message => "message",
        }
    }

    /// Visible label; also the input's accessible name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name*",
            Self::LastName => "Last Name*",
            Self::Email => "Email*",
            Self::Message => "Message",
        }
    }

    /// Default placeholder. The message area has none.
    pub const fn default_placeholder(self) -> Option<&'static str> {
        match self {
            Self::FirstName => Some("Edd"),
            Self::LastName => Some("Burke"),
            Self::Email => Some("bluebill1049@hotmail.com"),
            Self::Message => None,
        }
    }

    pub const fn is_multiline(self) -> bool {
        matches!(self, Self::Message)
    }

    pub fn all() -> impl Iterator<Item = FieldId> {
        Self::ALL.into_iter()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_match_error_vocabulary() {
        let keys: Vec<_> = FieldId::all().map(FieldId::key).collect();
        assert_eq!(keys, ["firstName", "lastName", "email", "message"]);
        assert_eq!(FieldId::Email.to_string(), "email");
    }

    #[test]
    fn only_message_is_multiline_and_unplaceheld() {
        for field in FieldId::all() {
            assert_eq!(field.is_multiline(), field == FieldId::Message);
            assert_eq!(field.default_placeholder().is_none(), field == FieldId::Message);
        }
    }
}
