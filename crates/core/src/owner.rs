use serde::{Deserialize, Serialize};

/// A raw owner reference as written in a rule file: a handle, an email, or
/// (for the blank filter input) neither. At most one of the two fields is
/// expected to be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Owner {
    pub handle: String,
    pub email: String,
}

impl Owner {
    pub fn handle(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            email: String::new(),
        }
    }

    pub fn email(email: impl Into<String>) -> Self {
        Self {
            handle: String::new(),
            email: email.into(),
        }
    }

    /// Classify free-form owner text the way rule files spell owners:
    /// a leading `@` marks a handle (stripped), anything containing `@`
    /// is an email, and everything else is a bare handle.
    pub fn parse(text: &str) -> Self {
        if let Some(handle) = text.strip_prefix('@') {
            return Self::handle(handle);
        }
        if text.contains('@') {
            return Self::email(text);
        }
        Self::handle(text)
    }

    /// True when neither a handle nor an email is present.
    pub fn is_blank(&self) -> bool {
        self.handle.is_empty() && self.email.is_empty()
    }

    /// Case-insensitive identity key. Two raw owners refer to the same
    /// identity iff their keys are equal.
    pub fn identity_key(&self) -> (String, String) {
        (self.handle.to_lowercase(), self.email.to_lowercase())
    }

    /// Lower-cased copy used for backend lookups.
    pub fn normalized(&self) -> Self {
        Self {
            handle: self.handle.to_lowercase(),
            email: self.email.to_lowercase(),
        }
    }

    /// Stable sort key used as the pagination cursor for owner listings.
    pub fn sort_key(&self) -> String {
        format!("{}{}", self.handle, self.email)
    }
}
