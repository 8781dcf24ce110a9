use crate::error::FilterError;
use crate::stream::{SearchEvent, SearchMatch};
use owners_core::ResolvedOwner;
use owners_service::{OwnershipCache, OwnershipError};
use std::mem;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

const POISONED: &str = "filter error accumulator mutex poisoned";

#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Capacity of the bounded channel between producers and the
    /// downstream sink; full means backpressure on the producers.
    pub channel_capacity: usize,
}

impl FilterConfig {
    pub fn with_defaults() -> Self {
        Self {
            channel_capacity: 64,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

struct FilterShared {
    cache: Arc<OwnershipCache>,
    include: Vec<ResolvedOwner>,
    exclude: Vec<ResolvedOwner>,
    downstream: mpsc::Sender<SearchEvent>,
    /// Per-match lookup failures across the whole pass. The lock is held
    /// only for the append; sends never hold it.
    errors: Mutex<Vec<OwnershipError>>,
}

/// One ownership-filtering pass over a result stream. Hand out as many
/// [`FilteredSender`]s as there are producer workers, then call
/// [`OwnershipFilter::finish`] once the producers are done to learn about
/// dropped matches.
pub struct OwnershipFilter {
    shared: Arc<FilterShared>,
}

impl OwnershipFilter {
    pub fn new(
        cache: Arc<OwnershipCache>,
        include: Vec<ResolvedOwner>,
        exclude: Vec<ResolvedOwner>,
        downstream: mpsc::Sender<SearchEvent>,
    ) -> Self {
        Self {
            shared: Arc::new(FilterShared {
                cache,
                include,
                exclude,
                downstream,
                errors: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Create a pass together with its bounded downstream channel; the
    /// returned receiver is the filtered result stream.
    pub fn channel(
        cache: Arc<OwnershipCache>,
        include: Vec<ResolvedOwner>,
        exclude: Vec<ResolvedOwner>,
        config: &FilterConfig,
    ) -> (Self, mpsc::Receiver<SearchEvent>) {
        let (downstream, filtered) = mpsc::channel(config.channel_capacity);
        (Self::new(cache, include, exclude, downstream), filtered)
    }

    /// A handle for one producer worker. Cheap to clone; all handles feed
    /// the same downstream channel and the same error accumulator.
    pub fn sender(&self) -> FilteredSender {
        FilteredSender {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Combine the failures accumulated while filtering. `Ok(())` when
    /// every lookup succeeded.
    pub fn finish(self) -> Result<(), FilterError> {
        let errors = mem::take(&mut *self.shared.errors.lock().expect(POISONED));
        if errors.is_empty() {
            Ok(())
        } else {
            log::warn!(
                "ownership filtering dropped matches for {} lookup failure(s)",
                errors.len()
            );
            Err(FilterError::Accumulated(errors))
        }
    }
}

/// Clonable event sink used by upstream producer workers, possibly
/// concurrently. Each send evaluates the event's file matches against the
/// include/exclude predicates and forwards the thinned event downstream in
/// the caller's task, preserving event order per producer and batching
/// boundaries.
#[derive(Clone)]
pub struct FilteredSender {
    shared: Arc<FilterShared>,
}

impl FilteredSender {
    /// Filter one event and forward it. Lookup failures drop the affected
    /// match and accumulate; only a closed downstream channel fails the
    /// send itself.
    pub async fn send(&self, event: SearchEvent) -> Result<(), FilterError> {
        let mut kept = Vec::with_capacity(event.matches.len());
        for result in event.matches {
            match result {
                SearchMatch::File(file) => {
                    let ownership = self
                        .shared
                        .cache
                        .get_ownership(file.repo_id, &file.repo_name, &file.commit)
                        .await;
                    match ownership {
                        Ok(entry) => {
                            let owners = entry.find_owners(&file.path);
                            if keep_match(&owners, &self.shared.include, &self.shared.exclude) {
                                kept.push(SearchMatch::File(file));
                            }
                        }
                        Err(err) => {
                            log::warn!("ownership lookup failed for {}: {err}", file.path);
                            self.shared.errors.lock().expect(POISONED).push(err);
                        }
                    }
                }
                other => kept.push(other),
            }
        }

        self.shared
            .downstream
            .send(SearchEvent { matches: kept })
            .await
            .map_err(|_| FilterError::StreamClosed)
    }
}

/// Drive a whole upstream channel through one filtering pass: single
/// producer convenience over [`OwnershipFilter`].
pub async fn filter_stream(
    cache: Arc<OwnershipCache>,
    include: Vec<ResolvedOwner>,
    exclude: Vec<ResolvedOwner>,
    mut upstream: mpsc::Receiver<SearchEvent>,
    downstream: mpsc::Sender<SearchEvent>,
) -> Result<(), FilterError> {
    let filter = OwnershipFilter::new(cache, include, exclude, downstream);
    let sender = filter.sender();
    while let Some(event) = upstream.recv().await {
        sender.send(event).await?;
    }
    filter.finish()
}

/// Include predicates are conjunctive: every include owner must be among
/// the file's owners. Exclude predicates are disjunctive: any hit drops
/// the match. `Any` stands for "has at least one owner".
fn keep_match(
    owners: &[ResolvedOwner],
    include: &[ResolvedOwner],
    exclude: &[ResolvedOwner],
) -> bool {
    include.iter().all(|owner| contains_owner(owners, owner))
        && !exclude.iter().any(|owner| contains_owner(owners, owner))
}

fn contains_owner(owners: &[ResolvedOwner], want: &ResolvedOwner) -> bool {
    match want {
        ResolvedOwner::Any => !owners.is_empty(),
        _ => owners.iter().any(|owner| owner.same_identity(want)),
    }
}
