//! # Owners Search
//!
//! Ownership filtering for a streaming search pipeline.
//!
//! ## Pipeline
//!
//! ```text
//! producer workers ──SearchEvent──> FilteredSender (clonable)
//!                                        │
//!                                        ├─ file match: look up owners,
//!                                        │  apply include/exclude predicates,
//!                                        │  keep or drop
//!                                        ├─ non-file match: pass through
//!                                        │
//!                                        └──bounded channel──> downstream sink
//!
//! lookup failures accumulate (mutex held per append) and surface once,
//! after the stream completes; the stream itself keeps flowing.
//! ```

mod error;
mod filter;
mod stream;

pub use error::FilterError;
pub use filter::{filter_stream, FilterConfig, FilteredSender, OwnershipFilter};
pub use stream::{CommitMatch, FileMatch, LineMatch, SearchEvent, SearchMatch};
