use thiserror::Error;

pub type Result<T> = std::result::Result<T, RulesetError>;

#[derive(Error, Debug)]
pub enum RulesetError {
    #[error("invalid ownership pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },
}
