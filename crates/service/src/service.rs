use crate::aggregate::{aggregate_paths, AggregatedOwnership, RuleProvenance};
use crate::cache::OwnershipCache;
use crate::connection::{page_window, PageArgs};
use crate::error::Result;
use crate::loader::RulesetLoader;
use crate::resolver::{IdentityBackend, OwnerResolver, ResolutionContext};
use once_cell::sync::OnceCell;
use owners_core::{CommitId, Owner, RepoId, RepoName, ResolvedOwner};
use owners_gitserver::GitBackend;
use serde::Serialize;
use std::sync::Arc;

/// One owner of a file, with the rule that says so.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOwner {
    pub owner: ResolvedOwner,
    pub reason: RuleProvenance,
}

/// One page of a single file's owners plus connection metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileOwnership {
    pub owners: Vec<FileOwner>,
    pub total_count: usize,
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}

/// Long-lived ownership service: owns the collaborators and the one
/// process-wide ownership cache. Constructed once by the host process and
/// passed by reference into each request's handling path; there is no
/// ambient global.
pub struct OwnService {
    git: Arc<dyn GitBackend>,
    loader: Arc<dyn RulesetLoader>,
    identities: Arc<dyn IdentityBackend>,
    cache: OnceCell<Arc<OwnershipCache>>,
}

impl OwnService {
    pub fn new(
        git: Arc<dyn GitBackend>,
        loader: Arc<dyn RulesetLoader>,
        identities: Arc<dyn IdentityBackend>,
    ) -> Self {
        Self {
            git,
            loader,
            identities,
            cache: OnceCell::new(),
        }
    }

    /// The process-wide ownership cache. Exactly one caller constructs it;
    /// concurrent first callers block until construction completes and then
    /// observe the same instance.
    pub fn ownership_cache(&self) -> Arc<OwnershipCache> {
        Arc::clone(self.cache.get_or_init(|| {
            log::info!("constructing process-wide ownership cache");
            Arc::new(OwnershipCache::new(
                Arc::clone(&self.loader),
                OwnerResolver::new(Arc::clone(&self.identities)),
            ))
        }))
    }

    pub fn resolver(&self) -> OwnerResolver {
        OwnerResolver::new(Arc::clone(&self.identities))
    }

    /// Resolve raw owner filter inputs (as typed in a search query) into
    /// owners ready for predicate matching. The empty string stands for
    /// "any owner".
    pub async fn resolve_filter_inputs(&self, inputs: &[String]) -> Result<Vec<ResolvedOwner>> {
        let raw: Vec<Owner> = inputs
            .iter()
            .map(|input| {
                if input.is_empty() {
                    Owner::default()
                } else {
                    Owner::parse(&input.to_lowercase())
                }
            })
            .collect();
        self.resolver()
            .resolve_owners(&raw, &ResolutionContext::default())
            .await
    }

    /// Per-owner file counts across every path at `commit`, sorted by
    /// descending count (ties by owner sort key) and windowed by `page`.
    /// A commit without a rule file aggregates to nothing.
    pub async fn aggregate_owners(
        &self,
        repo_id: RepoId,
        repo_name: &RepoName,
        commit: &CommitId,
        page: &PageArgs,
    ) -> Result<AggregatedOwnership> {
        let Some(ruleset) = self
            .loader
            .load_ruleset(repo_id, repo_name, commit)
            .await?
        else {
            return Ok(AggregatedOwnership::default());
        };

        let paths = self.git.list_files(repo_name, commit, None).await?;
        log::debug!(
            "aggregating ownership over {} paths for {repo_name}@{commit}",
            paths.len()
        );

        let ctx = ResolutionContext {
            repo_id: Some(repo_id),
        };
        let owners = aggregate_paths(&ruleset, &paths, &self.resolver(), &ctx).await?;

        let keys: Vec<&str> = owners.iter().map(|o| o.sort_key.as_str()).collect();
        let window = page_window(&keys, page.after.as_deref(), page.first);
        let total_count = owners.len();
        Ok(AggregatedOwnership {
            owners: owners[window.start..window.end].to_vec(),
            total_count,
            next_cursor: window.next_cursor,
            has_next_page: window.has_next_page,
        })
    }

    /// Owners of the single best-matching rule for `path`, sorted by owner
    /// display text and windowed by `page` (cursor = display text). A
    /// missing ruleset or an unmatched path yields an empty connection.
    pub async fn file_ownership(
        &self,
        repo_id: RepoId,
        repo_name: &RepoName,
        commit: &CommitId,
        path: &str,
        page: &PageArgs,
    ) -> Result<FileOwnership> {
        let Some(ruleset) = self
            .loader
            .load_ruleset(repo_id, repo_name, commit)
            .await?
        else {
            return Ok(FileOwnership::default());
        };
        let Some(rule) = ruleset.best_match(path) else {
            return Ok(FileOwnership::default());
        };

        let mut raw: Vec<Owner> = rule.owners.clone();
        raw.sort_by(|a, b| owner_text(a).cmp(owner_text(b)));

        let texts: Vec<&str> = raw.iter().map(owner_text).collect();
        let window = page_window(&texts, page.after.as_deref(), page.first);

        // Only the windowed slice is resolved; the full total still counts
        // every owner on the rule.
        let ctx = ResolutionContext {
            repo_id: Some(repo_id),
        };
        let resolved = self
            .resolver()
            .resolve_owners(&raw[window.start..window.end], &ctx)
            .await?;

        let reason = RuleProvenance {
            line_number: rule.line_number,
            source: ruleset.source().clone(),
        };
        Ok(FileOwnership {
            owners: resolved
                .into_iter()
                .map(|owner| FileOwner {
                    owner,
                    reason: reason.clone(),
                })
                .collect(),
            total_count: raw.len(),
            next_cursor: window.next_cursor,
            has_next_page: window.has_next_page,
        })
    }
}

fn owner_text(owner: &Owner) -> &str {
    if owner.handle.is_empty() {
        &owner.email
    } else {
        &owner.handle
    }
}
