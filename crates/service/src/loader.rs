use crate::error::Result;
use async_trait::async_trait;
use owners_core::{CommitId, RepoId, RepoName, Ruleset, RulesetSource};
use owners_gitserver::{GitBackend, GitError};
use std::sync::Arc;

/// Fetches and parses one commit's rule file. `Ok(None)` means no rule
/// file exists there, which callers must treat as "no one owns anything"
/// rather than an error; only transport/parse failures are errors.
#[async_trait]
pub trait RulesetLoader: Send + Sync {
    async fn load_ruleset(
        &self,
        repo_id: RepoId,
        repo_name: &RepoName,
        commit: &CommitId,
    ) -> Result<Option<Ruleset>>;
}

/// Turns rule-file text into a [`Ruleset`]. Parsing the rule syntax is a
/// collaborator concern; this crate only moves the bytes.
pub trait RuleFileParser: Send + Sync {
    fn parse(&self, source: RulesetSource, text: &[u8]) -> Result<Ruleset>;
}

/// Well-known locations of a committed rule file, probed in order; the
/// first hit wins.
const RULE_FILE_PATHS: &[&str] = &[
    "CODEOWNERS",
    ".github/CODEOWNERS",
    ".gitlab/CODEOWNERS",
    "docs/CODEOWNERS",
];

/// Loads a committed rule file straight from the version-control backend.
pub struct GitRulesetLoader {
    git: Arc<dyn GitBackend>,
    parser: Arc<dyn RuleFileParser>,
}

impl GitRulesetLoader {
    pub fn new(git: Arc<dyn GitBackend>, parser: Arc<dyn RuleFileParser>) -> Self {
        Self { git, parser }
    }
}

#[async_trait]
impl RulesetLoader for GitRulesetLoader {
    async fn load_ruleset(
        &self,
        _repo_id: RepoId,
        repo_name: &RepoName,
        commit: &CommitId,
    ) -> Result<Option<Ruleset>> {
        for path in RULE_FILE_PATHS {
            match self.git.read_file(repo_name, commit, path).await {
                Ok(text) => {
                    log::debug!("rule file {path} found for {repo_name}@{commit}");
                    let source = RulesetSource::Committed {
                        commit: commit.clone(),
                        path: (*path).to_string(),
                    };
                    return self.parser.parse(source, &text).map(Some);
                }
                Err(GitError::FileNotFound(_)) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(None)
    }
}
