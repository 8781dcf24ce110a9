use crate::diff::{parse_git_diff, Changes};
use crate::error::Result;
use async_trait::async_trait;
use owners_core::{CommitId, RepoName};

/// Transport to the version-control backend. Implementations are expected
/// to surface transport failures as [`crate::GitError::Backend`]; no method
/// here retries internally.
#[async_trait]
pub trait GitBackend: Send + Sync {
    /// Archive of the repository at `commit`, restricted to `paths` when
    /// non-empty.
    async fn fetch_archive(
        &self,
        repo: &RepoName,
        commit: &CommitId,
        paths: &[String],
    ) -> Result<Vec<u8>>;

    /// Contents of a single file at a repo commit.
    async fn read_file(&self, repo: &RepoName, commit: &CommitId, path: &str) -> Result<Vec<u8>>;

    /// All paths at `commit`, optionally narrowed by a backend-interpreted
    /// glob pattern.
    async fn list_files(
        &self,
        repo: &RepoName,
        commit: &CommitId,
        path_pattern: Option<&str>,
    ) -> Result<Vec<String>>;

    /// Raw NUL-delimited change-list between two commits, the input to
    /// [`parse_git_diff`].
    async fn diff_raw(
        &self,
        repo: &RepoName,
        commit_a: &CommitId,
        commit_b: &CommitId,
    ) -> Result<Vec<u8>>;

    /// The paths that changed between two commits, decoded.
    async fn git_diff(
        &self,
        repo: &RepoName,
        commit_a: &CommitId,
        commit_b: &CommitId,
    ) -> Result<Changes> {
        let raw = self.diff_raw(repo, commit_a, commit_b).await?;
        log::debug!(
            "decoding {} diff bytes for {repo} {commit_a}..{commit_b}",
            raw.len()
        );
        Ok(parse_git_diff(&raw)?)
    }
}
