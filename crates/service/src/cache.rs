use crate::error::Result;
use crate::loader::RulesetLoader;
use crate::resolver::{OwnerResolver, ResolutionContext};
use owners_core::{CommitId, Owner, RepoId, RepoName, ResolvedOwner, Ruleset};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const POISONED: &str = "ownership cache mutex poisoned";

/// Ownership data for one `(repository, commit)` pair. Immutable once
/// built; ownership of a fixed commit never changes, so entries are reused
/// for the process lifetime without invalidation.
#[derive(Debug)]
pub struct CacheEntry {
    repo_id: RepoId,
    commit: CommitId,
    ruleset: Option<Ruleset>,
    /// Resolved owners per rule, index-aligned with `ruleset.rules()`.
    rule_owners: Vec<Vec<ResolvedOwner>>,
    /// Lazily memoized winning-rule index per requested path.
    path_index: Mutex<HashMap<String, Option<usize>>>,
}

impl CacheEntry {
    fn empty(repo_id: RepoId, commit: CommitId) -> Self {
        Self {
            repo_id,
            commit,
            ruleset: None,
            rule_owners: Vec::new(),
            path_index: Mutex::new(HashMap::new()),
        }
    }

    pub fn repo_id(&self) -> RepoId {
        self.repo_id
    }

    pub fn commit(&self) -> &CommitId {
        &self.commit
    }

    pub fn ruleset(&self) -> Option<&Ruleset> {
        self.ruleset.as_ref()
    }

    /// Resolved owners of the best-matching rule for `path`; empty when no
    /// rule matches or the commit has no rule file.
    pub fn find_owners(&self, path: &str) -> Vec<ResolvedOwner> {
        let Some(ruleset) = &self.ruleset else {
            return Vec::new();
        };

        let memoized = self.path_index.lock().expect(POISONED).get(path).copied();
        let rule_idx = match memoized {
            Some(idx) => idx,
            None => {
                // Matching runs outside the lock; a racing duplicate match
                // for the same path lands on the same answer.
                let idx = ruleset.best_match_index(path);
                self.path_index
                    .lock()
                    .expect(POISONED)
                    .insert(path.to_string(), idx);
                idx
            }
        };

        rule_idx
            .and_then(|idx| self.rule_owners.get(idx))
            .cloned()
            .unwrap_or_default()
    }
}

/// Memoizes ownership per `(repository, commit)`. Repeated lookups for the
/// same key never refetch nor re-resolve. Two concurrent first requests for
/// the same key may both do the fill work; the first inserted entry wins
/// and the duplicate is discarded, which is harmless because the data is
/// idempotent to recompute.
pub struct OwnershipCache {
    loader: Arc<dyn RulesetLoader>,
    resolver: OwnerResolver,
    entries: Mutex<HashMap<(RepoId, CommitId), Arc<CacheEntry>>>,
}

impl OwnershipCache {
    pub fn new(loader: Arc<dyn RulesetLoader>, resolver: OwnerResolver) -> Self {
        Self {
            loader,
            resolver,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Ownership data for the given key, built on first request. A commit
    /// without a rule file yields an empty entry, not an error.
    pub async fn get_ownership(
        &self,
        repo_id: RepoId,
        repo_name: &RepoName,
        commit: &CommitId,
    ) -> Result<Arc<CacheEntry>> {
        let key = (repo_id, commit.clone());
        if let Some(entry) = self.entries.lock().expect(POISONED).get(&key) {
            return Ok(Arc::clone(entry));
        }

        log::debug!("ownership cache miss for {repo_name}@{commit}");
        let entry = Arc::new(self.load_entry(repo_id, repo_name, commit).await?);

        let mut entries = self.entries.lock().expect(POISONED);
        Ok(Arc::clone(entries.entry(key).or_insert(entry)))
    }

    async fn load_entry(
        &self,
        repo_id: RepoId,
        repo_name: &RepoName,
        commit: &CommitId,
    ) -> Result<CacheEntry> {
        let Some(ruleset) = self
            .loader
            .load_ruleset(repo_id, repo_name, commit)
            .await?
        else {
            log::debug!("no ownership ruleset for {repo_name}@{commit}");
            return Ok(CacheEntry::empty(repo_id, commit.clone()));
        };

        // One batch resolution for the whole ruleset, sliced back per rule.
        let flat: Vec<Owner> = ruleset
            .rules()
            .iter()
            .flat_map(|rule| rule.owners.iter().cloned())
            .collect();
        let ctx = ResolutionContext {
            repo_id: Some(repo_id),
        };
        let resolved = self.resolver.resolve_owners(&flat, &ctx).await?;

        let mut rule_owners = Vec::with_capacity(ruleset.rules().len());
        let mut offset = 0;
        for rule in ruleset.rules() {
            let next = offset + rule.owners.len();
            rule_owners.push(resolved[offset..next].to_vec());
            offset = next;
        }

        Ok(CacheEntry {
            repo_id,
            commit: commit.clone(),
            ruleset: Some(ruleset),
            rule_owners,
            path_index: Mutex::new(HashMap::new()),
        })
    }
}
