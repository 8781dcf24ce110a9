use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitError>;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("git backend: {0}")]
    Backend(String),

    #[error("no such file at this commit: {0}")]
    FileNotFound(String),

    #[error("parsing diff output: {0}")]
    Diff(#[from] DiffError),
}

/// Unrecoverable decode failure of a raw change-list. Never retried.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DiffError {
    #[error("diff output splits into an odd number of NUL-delimited fields")]
    UnevenPairs,
}
