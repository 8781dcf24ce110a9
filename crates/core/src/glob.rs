use crate::error::{Result, RulesetError};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Default [`crate::PathMatcher`] implementation: each rule pattern is
/// compiled to a small glob set, and the last matching rule wins, following
/// CODEOWNERS precedence.
#[derive(Debug)]
pub struct GlobMatcher {
    compiled: Vec<GlobSet>,
}

impl GlobMatcher {
    /// Compile one glob set per rule pattern, in rule order.
    pub fn compile<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let compiled = patterns
            .into_iter()
            .map(compile_pattern)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { compiled })
    }
}

impl crate::PathMatcher for GlobMatcher {
    fn rule_index(&self, path: &str) -> Option<usize> {
        // Later rules take precedence over earlier ones.
        self.compiled
            .iter()
            .rposition(|globs| globs.is_match(path))
    }
}

/// Translate a single rule-file pattern into globs:
/// - a leading `/` (or any interior `/`) anchors the pattern to the root,
///   otherwise it matches at any directory depth;
/// - a trailing `/` restricts the pattern to everything under a directory;
/// - a bare pattern matches both the file itself and everything under a
///   directory of that name.
fn compile_pattern(pattern: &str) -> Result<GlobSet> {
    let trimmed = pattern.trim();
    let anchored = trimmed.trim_end_matches('/').contains('/');
    let dir_only = trimmed.ends_with('/');
    let stem = trimmed.trim_start_matches('/').trim_end_matches('/');

    let mut globs = Vec::new();
    if dir_only {
        globs.push(format!("{stem}/**"));
    } else {
        globs.push(stem.to_string());
        globs.push(format!("{stem}/**"));
    }

    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        let glob = if anchored {
            glob
        } else {
            format!("**/{glob}")
        };
        let compiled = GlobBuilder::new(&glob)
            .literal_separator(true)
            .build()
            .map_err(|source| RulesetError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        builder.add(compiled);
    }
    builder
        .build()
        .map_err(|source| RulesetError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}
