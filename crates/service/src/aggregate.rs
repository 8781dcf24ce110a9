use crate::error::Result;
use crate::resolver::{OwnerResolver, ResolutionContext};
use owners_core::{Owner, ResolvedOwner, Ruleset, RulesetSource};
use serde::Serialize;
use std::collections::HashMap;

/// The rule that made an owner count: line number plus where the rule
/// file's text lives. Rendered as provenance alongside aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleProvenance {
    pub line_number: i32,
    pub source: RulesetSource,
}

/// One owner's aggregate over a path listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedOwner {
    pub owner: ResolvedOwner,
    pub file_count: u64,
    /// First-encountered matching rule; aggregates are order-independent in
    /// content, so any matching rule serves as the example.
    pub example: RuleProvenance,
    /// Pagination cursor for this owner: raw handle + email.
    pub sort_key: String,
}

/// One page of aggregated owners plus connection metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedOwnership {
    pub owners: Vec<AggregatedOwner>,
    /// Distinct owner count over the whole aggregate, independent of the
    /// pagination window.
    pub total_count: usize,
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}

struct OwnerTally {
    raw: Owner,
    file_count: u64,
    example: RuleProvenance,
}

/// Fold per-owner file counts over `paths`, resolve the distinct owners in
/// one batch, and sort: descending file count, ties by ascending sort key
/// so the order is deterministic across runs.
pub(crate) async fn aggregate_paths(
    ruleset: &Ruleset,
    paths: &[String],
    resolver: &OwnerResolver,
    ctx: &ResolutionContext,
) -> Result<Vec<AggregatedOwner>> {
    let mut tallies: Vec<OwnerTally> = Vec::new();
    let mut by_key: HashMap<(String, String), usize> = HashMap::new();

    for path in paths {
        let Some(rule) = ruleset.best_match(path) else {
            continue;
        };
        for owner in &rule.owners {
            let idx = *by_key.entry(owner.identity_key()).or_insert_with(|| {
                tallies.push(OwnerTally {
                    raw: owner.clone(),
                    file_count: 0,
                    example: RuleProvenance {
                        line_number: rule.line_number,
                        source: ruleset.source().clone(),
                    },
                });
                tallies.len() - 1
            });
            tallies[idx].file_count += 1;
        }
    }

    let raws: Vec<Owner> = tallies.iter().map(|t| t.raw.clone()).collect();
    let resolved = resolver.resolve_owners(&raws, ctx).await?;

    let mut owners: Vec<AggregatedOwner> = tallies
        .into_iter()
        .zip(resolved)
        .map(|(tally, owner)| AggregatedOwner {
            owner,
            file_count: tally.file_count,
            example: tally.example,
            sort_key: tally.raw.sort_key(),
        })
        .collect();

    owners.sort_by(|a, b| {
        b.file_count
            .cmp(&a.file_count)
            .then_with(|| a.sort_key.cmp(&b.sort_key))
    });
    Ok(owners)
}
