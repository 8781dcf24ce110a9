use owners_service::OwnershipError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    /// Every per-match lookup failure from one stream pass, combined.
    /// The affected matches were dropped; the rest of the stream was
    /// delivered.
    #[error("ownership filtering dropped matches: {}", join_errors(.0))]
    Accumulated(Vec<OwnershipError>),

    #[error("downstream result channel closed")]
    StreamClosed,
}

fn join_errors(errors: &[OwnershipError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulated_errors_render_each_cause() {
        let err = FilterError::Accumulated(vec![
            OwnershipError::RulesetLoad("a".to_string()),
            OwnershipError::ResolutionBackend("b".to_string()),
        ]);
        let text = err.to_string();
        assert!(text.contains("a"));
        assert!(text.contains("b"));
        assert!(text.contains("; "));
    }
}
