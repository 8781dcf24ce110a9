use serde::{Deserialize, Serialize};

/// An owner reference normalized to a concrete identity, or the `Any`
/// sentinel meaning "has some owner, identity unspecified".
///
/// The enum is closed on purpose: every consumption site (identity
/// comparison, display, predicate evaluation) matches exhaustively, so
/// adding a new owner kind is a compile-time-checked change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedOwner {
    Person { handle: String, email: String },
    Team { name: String },
    Any,
}

impl ResolvedOwner {
    pub fn person(handle: impl Into<String>, email: impl Into<String>) -> Self {
        Self::Person {
            handle: handle.into(),
            email: email.into(),
        }
    }

    pub fn team(name: impl Into<String>) -> Self {
        Self::Team { name: name.into() }
    }

    /// Variant-aware identity comparison. Two `Person`s are the same owner
    /// when their handles or their emails match (case-insensitively, empty
    /// fields never match); `Team`s compare by name. `Any` carries no
    /// identity and equals nothing here; predicate evaluation special-cases
    /// it instead.
    pub fn same_identity(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Person {
                    handle: ah,
                    email: ae,
                },
                Self::Person {
                    handle: bh,
                    email: be,
                },
            ) => {
                (!ah.is_empty() && ah.eq_ignore_ascii_case(bh))
                    || (!ae.is_empty() && ae.eq_ignore_ascii_case(be))
            }
            (Self::Team { name: a }, Self::Team { name: b }) => a.eq_ignore_ascii_case(b),
            (Self::Any, _) | (_, Self::Any) => false,
            (Self::Person { .. }, Self::Team { .. }) | (Self::Team { .. }, Self::Person { .. }) => {
                false
            }
        }
    }

    /// Display text: handle when present, otherwise email; team name for
    /// teams. `Any` renders empty.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Person { handle, email } => {
                if handle.is_empty() {
                    email
                } else {
                    handle
                }
            }
            Self::Team { name } => name,
            Self::Any => "",
        }
    }
}
