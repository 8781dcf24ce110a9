//! # Owners Core
//!
//! Shared data model for code ownership: repository identifiers, raw and
//! resolved owners, ownership rules, and the ruleset matcher seam.
//!
//! ## Model
//!
//! ```text
//! rule file (one commit)
//!     │
//!     ├──> OwnershipRule[]  (pattern, line number, raw owners)
//!     │
//!     └──> Ruleset
//!            ├─ RulesetSource (ingested vs committed provenance)
//!            └─ PathMatcher   (pluggable `match(path) -> rule` capability)
//!
//! raw Owner ──resolution──> ResolvedOwner (Person | Team | Any)
//! ```
//!
//! The matching algorithm itself is a collaborator: embedders plug their own
//! [`PathMatcher`] into a [`Ruleset`]. [`GlobMatcher`] is the provided
//! default with CODEOWNERS-style last-match-wins semantics.

mod error;
mod glob;
mod ids;
mod owner;
mod resolved;
mod rules;

pub use error::{Result, RulesetError};
pub use glob::GlobMatcher;
pub use ids::{CommitId, RepoId, RepoName};
pub use owner::Owner;
pub use resolved::ResolvedOwner;
pub use rules::{OwnershipRule, PathMatcher, Ruleset, RulesetSource};
