use crate::error::DiffError;
use serde::{Deserialize, Serialize};

const NUL: u8 = 0;

/// Added, modified, and deleted paths between two commits. Paths keep their
/// source order and are not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
}

/// Decode a raw change-list: a repeated sequence of `<status> NUL <path>
/// NUL`, with a NUL after the final path as well.
///
/// The first byte of the status field selects the bucket (`A`/`M`/`D`);
/// pairs with any other leading byte are skipped without error. Paths are
/// copied as-is (invalid UTF-8 is replaced, never rejected). Empty input
/// decodes to empty [`Changes`].
pub fn parse_git_diff(output: &[u8]) -> Result<Changes, DiffError> {
    if output.is_empty() {
        return Ok(Changes::default());
    }

    let mut trimmed = output;
    while let [rest @ .., NUL] = trimmed {
        trimmed = rest;
    }

    let fields: Vec<&[u8]> = trimmed.split(|byte| *byte == NUL).collect();
    if fields.len() % 2 != 0 {
        return Err(DiffError::UnevenPairs);
    }

    let mut changes = Changes::default();
    for pair in fields.chunks_exact(2) {
        let path = String::from_utf8_lossy(pair[1]).into_owned();
        match pair[0].first() {
            Some(b'A') => changes.added.push(path),
            Some(b'M') => changes.modified.push(path),
            Some(b'D') => changes.deleted.push(path),
            _ => {}
        }
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn empty_input_is_empty_changes() {
        assert_eq!(parse_git_diff(b"").expect("empty is fine"), Changes::default());
    }

    #[test]
    fn splits_statuses_into_buckets() {
        let parsed = parse_git_diff(b"A\x00x.go\x00D\x00y.go\x00").expect("valid");
        assert_eq!(
            parsed,
            Changes {
                added: vec!["x.go".to_string()],
                modified: Vec::new(),
                deleted: vec!["y.go".to_string()],
            }
        );
    }

    #[test]
    fn only_the_first_status_byte_matters() {
        let parsed = parse_git_diff(b"M100\x00renamed.go\x00").expect("valid");
        assert_eq!(parsed.modified, vec!["renamed.go".to_string()]);
    }

    #[test]
    fn unknown_statuses_are_skipped_silently() {
        let parsed = parse_git_diff(b"R\x00from.go\x00A\x00new.go\x00").expect("valid");
        assert_eq!(parsed.added, vec!["new.go".to_string()]);
        assert!(parsed.modified.is_empty());
        assert!(parsed.deleted.is_empty());
    }

    #[test]
    fn odd_field_count_is_malformed() {
        assert_eq!(
            parse_git_diff(b"A\x00x.go\x00M\x00").unwrap_err(),
            DiffError::UnevenPairs
        );
    }

    #[test]
    fn lone_nul_is_malformed() {
        // Trimming the separators leaves a single empty field.
        assert_eq!(parse_git_diff(b"\x00").unwrap_err(), DiffError::UnevenPairs);
    }

    #[test]
    fn duplicate_paths_pass_through() {
        let parsed = parse_git_diff(b"A\x00x.go\x00A\x00x.go\x00").expect("valid");
        assert_eq!(parsed.added, vec!["x.go".to_string(), "x.go".to_string()]);
    }

    fn encode(pairs: &[(char, String)]) -> Vec<u8> {
        let mut out = Vec::new();
        for (status, path) in pairs {
            out.extend_from_slice(status.to_string().as_bytes());
            out.push(0);
            out.extend_from_slice(path.as_bytes());
            out.push(0);
        }
        out
    }

    proptest! {
        #[test]
        fn proptest_recovers_every_classified_pair(
            pairs in prop::collection::vec(
                (prop::sample::select(vec!['A', 'M', 'D']), "[a-z0-9/._-]{1,20}"),
                0..16,
            )
        ) {
            let parsed = parse_git_diff(&encode(&pairs)).expect("well-formed");
            let expect = |status: char| -> Vec<String> {
                pairs
                    .iter()
                    .filter(|(s, _)| *s == status)
                    .map(|(_, p)| p.clone())
                    .collect()
            };
            prop_assert_eq!(&parsed.added, &expect('A'));
            prop_assert_eq!(&parsed.modified, &expect('M'));
            prop_assert_eq!(&parsed.deleted, &expect('D'));
            prop_assert_eq!(
                parsed.added.len() + parsed.modified.len() + parsed.deleted.len(),
                pairs.len()
            );
        }

        #[test]
        fn proptest_unknown_statuses_never_error(
            pairs in prop::collection::vec(
                (prop::sample::select(vec!['A', 'M', 'D', 'R', 'C', 'T']), "[a-z0-9/._-]{1,20}"),
                0..16,
            )
        ) {
            let parsed = parse_git_diff(&encode(&pairs)).expect("well-formed");
            let classified = pairs
                .iter()
                .filter(|(s, _)| matches!(s, 'A' | 'M' | 'D'))
                .count();
            prop_assert_eq!(
                parsed.added.len() + parsed.modified.len() + parsed.deleted.len(),
                classified
            );
        }
    }
}
