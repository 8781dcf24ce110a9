use crate::error::Result;
use crate::glob::GlobMatcher;
use crate::ids::{CommitId, RepoId};
use crate::owner::Owner;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single pattern-to-owners mapping entry from a rule file. Immutable
/// once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRule {
    pub pattern: String,
    pub line_number: i32,
    pub owners: Vec<Owner>,
}

/// Where a rule file's text lives. Only needed to render provenance, never
/// for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RulesetSource {
    /// Rule file ingested out-of-band and stored keyed by repository.
    Ingested { repo_id: RepoId },
    /// Rule file committed to the repository itself.
    Committed { commit: CommitId, path: String },
}

impl fmt::Display for RulesetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingested { repo_id } => write!(f, "ingested rule file for repo {repo_id}"),
            Self::Committed { commit, path } => write!(f, "{path}@{commit}"),
        }
    }
}

/// The `match(path) -> rule-or-none` capability. The matching algorithm is
/// a collaborator: hosts with their own rule evaluation plug it in here.
pub trait PathMatcher: Send + Sync {
    /// Index into the ruleset's rule list of the best-matching rule for
    /// `path`, or `None` when no rule applies.
    fn rule_index(&self, path: &str) -> Option<usize>;
}

/// The full ordered collection of ownership rules loaded from one commit's
/// rule file, plus the matcher that picks the winning rule for a path.
pub struct Ruleset {
    source: RulesetSource,
    rules: Vec<OwnershipRule>,
    matcher: Box<dyn PathMatcher>,
}

impl Ruleset {
    pub fn new(
        source: RulesetSource,
        rules: Vec<OwnershipRule>,
        matcher: Box<dyn PathMatcher>,
    ) -> Self {
        Self {
            source,
            rules,
            matcher,
        }
    }

    /// Build a ruleset backed by the default glob matcher compiled from the
    /// rules' own patterns.
    pub fn with_glob_matcher(source: RulesetSource, rules: Vec<OwnershipRule>) -> Result<Self> {
        let matcher = GlobMatcher::compile(rules.iter().map(|r| r.pattern.as_str()))?;
        Ok(Self::new(source, rules, Box::new(matcher)))
    }

    pub fn source(&self) -> &RulesetSource {
        &self.source
    }

    pub fn rules(&self) -> &[OwnershipRule] {
        &self.rules
    }

    pub fn best_match_index(&self, path: &str) -> Option<usize> {
        self.matcher
            .rule_index(path)
            .filter(|idx| *idx < self.rules.len())
    }

    pub fn best_match(&self, path: &str) -> Option<&OwnershipRule> {
        self.best_match_index(path).map(|idx| &self.rules[idx])
    }
}

impl fmt::Debug for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ruleset")
            .field("source", &self.source)
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}
