//! # Owners Service
//!
//! Ownership decisions for a code-search engine: who owns a file, cached
//! per repository+commit, plus per-owner aggregation with cursor paging.
//!
//! ## Architecture
//!
//! ```text
//! RulesetLoader ──┐
//!                 ├──> OwnershipCache ──> CacheEntry.find_owners(path)
//! IdentityBackend ┘         │
//!      │                    └─ built once per (repo, commit), lives for
//!      │                       the process: ownership of a fixed commit
//!      │                       never changes
//!      │
//!      └──> OwnerResolver (raw handle/email -> Person | Team | Any)
//!
//! OwnService (constructed once, injected everywhere)
//!      ├──> ownership_cache()    one-time guarded construction
//!      ├──> aggregate_owners()   per-owner file counts, paged
//!      └──> file_ownership()     owners of one path, paged
//! ```

mod aggregate;
mod cache;
mod connection;
mod error;
mod loader;
mod resolver;
mod service;

pub use aggregate::{AggregatedOwner, AggregatedOwnership, RuleProvenance};
pub use cache::{CacheEntry, OwnershipCache};
pub use connection::PageArgs;
pub use error::{OwnershipError, Result};
pub use loader::{GitRulesetLoader, RuleFileParser, RulesetLoader};
pub use resolver::{IdentityBackend, IdentityMatch, OwnerResolver, ResolutionContext};
pub use service::{FileOwner, FileOwnership, OwnService};
