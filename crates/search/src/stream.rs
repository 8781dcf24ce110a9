use owners_core::{CommitId, RepoId, RepoName};
use serde::{Deserialize, Serialize};

/// One batch of results emitted by the search pipeline. Events keep their
/// batching boundaries through every filter stage; stages may thin an
/// event's matches but never merge or reorder events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEvent {
    pub matches: Vec<SearchMatch>,
}

impl SearchEvent {
    pub fn new(matches: Vec<SearchMatch>) -> Self {
        Self { matches }
    }
}

/// A single search result. Ownership filtering only applies to file
/// matches; every other variant passes through unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchMatch {
    File(FileMatch),
    Commit(CommitMatch),
}

/// Content match inside one file at one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMatch {
    pub repo_id: RepoId,
    pub repo_name: RepoName,
    pub commit: CommitId,
    pub path: String,
    pub line_matches: Vec<LineMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMatch {
    pub line_number: u32,
    pub preview: String,
}

/// Match against commit metadata rather than a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMatch {
    pub repo_name: RepoName,
    pub commit: CommitId,
    pub message_preview: String,
}
