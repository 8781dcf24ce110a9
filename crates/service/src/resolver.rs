use crate::error::{OwnershipError, Result};
use async_trait::async_trait;
use owners_core::{Owner, RepoId, ResolvedOwner};
use std::sync::Arc;

/// One identity lookup result, index-aligned with the queried owners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityMatch {
    Person { handle: String, email: String },
    Team { name: String },
    Unresolved,
}

/// Scope hints for identity lookups, e.g. restricting team resolution to
/// one repository's namespace.
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    pub repo_id: Option<RepoId>,
}

/// The identity lookup collaborator. Receives already lower-cased owners
/// and must return exactly one [`IdentityMatch`] per input, in order.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    async fn lookup_identities(
        &self,
        owners: &[Owner],
        ctx: &ResolutionContext,
    ) -> Result<Vec<IdentityMatch>>;
}

/// Maps raw handle/email pairs to [`ResolvedOwner`]s through the identity
/// backend, one output per input.
#[derive(Clone)]
pub struct OwnerResolver {
    backend: Arc<dyn IdentityBackend>,
}

impl OwnerResolver {
    pub fn new(backend: Arc<dyn IdentityBackend>) -> Self {
        Self { backend }
    }

    /// Resolve a batch, order-preserving. Blank owners become
    /// [`ResolvedOwner::Any`] without touching the backend; everything else
    /// is looked up lower-cased in a single call. The whole batch fails
    /// together so the output stays index-aligned with the input.
    pub async fn resolve_owners(
        &self,
        raw: &[Owner],
        ctx: &ResolutionContext,
    ) -> Result<Vec<ResolvedOwner>> {
        let mut lookups = Vec::new();
        let mut lookup_indices = Vec::new();
        for (idx, owner) in raw.iter().enumerate() {
            if !owner.is_blank() {
                lookups.push(owner.normalized());
                lookup_indices.push(idx);
            }
        }

        let matches = if lookups.is_empty() {
            Vec::new()
        } else {
            let matches = self.backend.lookup_identities(&lookups, ctx).await?;
            if matches.len() != lookups.len() {
                return Err(OwnershipError::ResolutionBackend(format!(
                    "expected {} identities, backend returned {}",
                    lookups.len(),
                    matches.len()
                )));
            }
            matches
        };

        let mut resolved = vec![ResolvedOwner::Any; raw.len()];
        for ((idx, looked_up), identity) in
            lookup_indices.iter().zip(&lookups).zip(matches)
        {
            resolved[*idx] = match identity {
                IdentityMatch::Person { handle, email } => ResolvedOwner::Person { handle, email },
                IdentityMatch::Team { name } => ResolvedOwner::Team { name },
                // Keep unresolved references displayable rather than
                // dropping them: output stays one-per-input.
                IdentityMatch::Unresolved => ResolvedOwner::Person {
                    handle: looked_up.handle.clone(),
                    email: looked_up.email.clone(),
                },
            };
        }
        Ok(resolved)
    }
}
