//! Persistent author profile cache.
//!
//! Resolving "who wrote this tweet" costs one contract read per author, so
//! the cache outlives individual refreshes: an author is fetched the first
//! time they appear and then served from memory until explicitly
//! invalidated (e.g. the connected user changed their own profile).

use dwitter_domain::{Address, Profile, Tweet};
use dwitter_gateway::{GatewayError, ProfileContract, actions};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::debug;

/// Address → profile cache with explicit invalidation.
///
/// `Some(profile)` is a resolved profile (possibly unregistered);
/// `None` records that the contract answered but had nothing usable.
/// Transient provider failures are not cached and retry on next sight.
#[derive(Default)]
pub struct AuthorProfileCache {
    entries: RwLock<HashMap<Address, Option<Profile>>>,
}

impl AuthorProfileCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves profiles for `authors`, fetching only those never seen.
    ///
    /// Fetches run one at a time in author order. Returns the projection for
    /// exactly the requested authors; entries that could not be resolved map
    /// to `None`.
    pub async fn resolve(
        &self,
        handle: &dyn ProfileContract,
        authors: &[Address],
    ) -> HashMap<Address, Option<Profile>> {
        for author in authors {
            if self.entries.read().await.contains_key(author) {
                continue;
            }
            match actions::fetch_profile(handle, author).await {
                Ok(profile) => {
                    self.entries
                        .write()
                        .await
                        .insert(author.clone(), Some(profile));
                }
                Err(GatewayError::Provider(_)) => {
                    // Transient; retried the next time this author shows up.
                }
                Err(_) => {
                    self.entries.write().await.insert(author.clone(), None);
                }
            }
        }

        let entries = self.entries.read().await;
        authors
            .iter()
            .map(|author| (author.clone(), entries.get(author).cloned().flatten()))
            .collect()
    }

    /// Drops the cached entry for `address` so the next sight re-fetches.
    pub async fn invalidate(&self, address: &Address) {
        if self.entries.write().await.remove(address).is_some() {
            debug!(address = %address, "invalidated cached author profile");
        }
    }

    /// Number of cached authors.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Distinct tweet authors in first-seen order.
#[must_use]
pub fn distinct_authors(tweets: &[Tweet]) -> Vec<Address> {
    let mut seen = HashSet::new();
    let mut authors = Vec::new();
    for tweet in tweets {
        if seen.insert(tweet.author.clone()) {
            authors.push(tweet.author.clone());
        }
    }
    authors
}

#[cfg(test)]
mod tests {
    use super::*;
    use dwitter_gateway::{ContractConnector, DeploymentConfig};
    use dwitter_simulation::{InMemoryChain, SimConnector};
    use std::sync::Arc;

    fn tweet(author: &Address, id: u64) -> Tweet {
        Tweet {
            id,
            author: author.clone(),
            content: "gm".into(),
            timestamp: 0,
            likes: 0,
        }
    }

    #[test]
    fn test_distinct_authors_first_seen_order() {
        let a = Address::random();
        let b = Address::random();
        let tweets = vec![tweet(&a, 0), tweet(&b, 0), tweet(&a, 1)];
        assert_eq!(distinct_authors(&tweets), vec![a, b]);
    }

    async fn chain_and_handles() -> (Arc<InMemoryChain>, dwitter_gateway::ContractHandles) {
        let config = DeploymentConfig::new(Address::random(), Address::random());
        let chain = InMemoryChain::deploy(&config);
        let handles = SimConnector::new(chain.clone(), config).bind().await.unwrap();
        (chain, handles)
    }

    #[tokio::test]
    async fn test_resolve_fetches_each_author_once() {
        let (chain, handles) = chain_and_handles().await;
        let author = Address::random();
        chain.register(&author, "Alice", "hi").await;

        let cache = AuthorProfileCache::new();
        let resolved = cache
            .resolve(handles.profiles.as_ref(), &[author.clone()])
            .await;
        assert_eq!(
            resolved[&author].as_ref().unwrap().display_name,
            "Alice"
        );

        let reads = chain.profile_reads();
        cache
            .resolve(handles.profiles.as_ref(), &[author.clone()])
            .await;
        assert_eq!(chain.profile_reads(), reads);
    }

    #[tokio::test]
    async fn test_provider_failure_is_not_cached() {
        let (chain, handles) = chain_and_handles().await;
        let author = Address::random();
        chain.register(&author, "Alice", "hi").await;

        let cache = AuthorProfileCache::new();
        chain.set_offline(true);
        let resolved = cache
            .resolve(handles.profiles.as_ref(), &[author.clone()])
            .await;
        assert!(resolved[&author].is_none());
        assert!(cache.is_empty().await);

        chain.set_offline(false);
        let resolved = cache
            .resolve(handles.profiles.as_ref(), &[author.clone()])
            .await;
        assert!(resolved[&author].is_some());
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let (chain, handles) = chain_and_handles().await;
        let author = Address::random();
        chain.register(&author, "Alice", "hi").await;

        let cache = AuthorProfileCache::new();
        cache
            .resolve(handles.profiles.as_ref(), &[author.clone()])
            .await;
        chain.register(&author, "Alicia", "hi").await;

        // Still the cached name until invalidated.
        let resolved = cache
            .resolve(handles.profiles.as_ref(), &[author.clone()])
            .await;
        assert_eq!(resolved[&author].as_ref().unwrap().display_name, "Alice");

        cache.invalidate(&author).await;
        let resolved = cache
            .resolve(handles.profiles.as_ref(), &[author.clone()])
            .await;
        assert_eq!(resolved[&author].as_ref().unwrap().display_name, "Alicia");
    }
}
