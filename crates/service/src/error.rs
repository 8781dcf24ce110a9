use thiserror::Error;

pub type Result<T> = std::result::Result<T, OwnershipError>;

/// Per-request failures. None of these are fatal to the process; the
/// triggering request fails and the next one starts clean.
#[derive(Error, Debug)]
pub enum OwnershipError {
    #[error("loading ownership ruleset: {0}")]
    RulesetLoad(String),

    #[error("identity backend: {0}")]
    ResolutionBackend(String),

    #[error("git backend: {0}")]
    Git(#[from] owners_gitserver::GitError),

    #[error("ownership ruleset: {0}")]
    Ruleset(#[from] owners_core::RulesetError),
}
