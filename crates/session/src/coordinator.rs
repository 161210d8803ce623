//! View sync coordinator.
//!
//! Every user intent follows the same shape: check preconditions, issue the
//! contract call, then re-fetch the authoritative state and publish a fresh
//! snapshot. There is no optimistic update and no rollback; the re-fetch is
//! the only feedback a failed write produces.

use crate::authors::{AuthorProfileCache, distinct_authors};
use crate::error::SessionError;
use crate::session::{Session, SessionManager};
use crate::snapshot::ViewSnapshot;
use dwitter_domain::{Address, Profile, Tweet};
use dwitter_gateway::actions;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// Keeps the rendered snapshot consistent with on-chain state.
///
/// Refreshes are tagged at dispatch with the session generation and a
/// per-resource epoch; a completion is applied only if both are still
/// current, so a slow re-fetch can neither overwrite a newer one nor
/// resurrect data after a disconnect.
pub struct ViewSyncCoordinator {
    session: Arc<SessionManager>,
    authors: AuthorProfileCache,
    snapshot_tx: watch::Sender<ViewSnapshot>,
    profile_epoch: AtomicU64,
    tweets_epoch: AtomicU64,
}

impl ViewSyncCoordinator {
    #[must_use]
    pub fn new(session: Arc<SessionManager>) -> Self {
        let (snapshot_tx, _) = watch::channel(ViewSnapshot::default());
        Self {
            session,
            authors: AuthorProfileCache::new(),
            snapshot_tx,
            profile_epoch: AtomicU64::new(0),
            tweets_epoch: AtomicU64::new(0),
        }
    }

    /// Current snapshot (cloned; the held copy is replace-only).
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Subscribes to snapshot replacements; each received value is a full,
    /// internally consistent snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Connects the session and runs the initial full refresh.
    pub async fn connect(&self) -> Result<Address, SessionError> {
        let session = self.session.connect().await?;
        self.refresh_all(&session).await;
        Ok(session.address)
    }

    /// Disconnects and clears the snapshot synchronously.
    ///
    /// Any fetch still in flight resolves against a stale generation and is
    /// discarded, so Connected-only data cannot reappear afterwards.
    pub async fn disconnect(&self) -> Result<(), SessionError> {
        self.session.disconnect().await?;
        self.snapshot_tx.send_replace(ViewSnapshot::default());
        Ok(())
    }

    /// Re-runs the full fetch for the current session.
    pub async fn refresh(&self) -> Result<(), SessionError> {
        let session = self.require_session().await?;
        self.refresh_all(&session).await;
        Ok(())
    }

    /// Submits a profile, then re-fetches profile and registration.
    pub async fn create_profile(
        &self,
        display_name: &str,
        bio: &str,
    ) -> Result<(), SessionError> {
        let session = self.require_session().await?;
        // Failure is deliberately absorbed; the re-fetch below is the signal.
        let _ = actions::submit_profile(
            session.handles.profiles.as_ref(),
            &session.address,
            display_name,
            bio,
        )
        .await;
        self.authors.invalidate(&session.address).await;
        self.refresh_profile(&session).await;
        Ok(())
    }

    /// Submits a tweet, then re-fetches the entire tweet list.
    pub async fn create_tweet(&self, content: &str) -> Result<(), SessionError> {
        let session = self.require_registered().await?;
        let _ = actions::submit_tweet(session.handles.tweets.as_ref(), &session.address, content)
            .await;
        self.refresh_tweets(&session).await;
        Ok(())
    }

    /// Submits a like for `(author, id)`, then re-fetches the tweet list.
    pub async fn like_tweet(&self, author: &Address, id: u64) -> Result<(), SessionError> {
        let session = self.require_registered().await?;
        let _ = actions::submit_like(
            session.handles.tweets.as_ref(),
            &session.address,
            author,
            id,
        )
        .await;
        self.refresh_tweets(&session).await;
        Ok(())
    }

    /// Submits an unlike for `(author, id)`, then re-fetches the tweet list.
    pub async fn unlike_tweet(&self, author: &Address, id: u64) -> Result<(), SessionError> {
        let session = self.require_registered().await?;
        let _ = actions::submit_unlike(
            session.handles.tweets.as_ref(),
            &session.address,
            author,
            id,
        )
        .await;
        self.refresh_tweets(&session).await;
        Ok(())
    }

    async fn require_session(&self) -> Result<Session, SessionError> {
        self.session
            .current()
            .await
            .ok_or(SessionError::NotConnected)
    }

    async fn require_registered(&self) -> Result<Session, SessionError> {
        let session = self.require_session().await?;
        if !self.snapshot_tx.borrow().is_registered {
            return Err(SessionError::NotRegistered);
        }
        Ok(session)
    }

    /// Full refresh: both fetches run concurrently and a single consistent
    /// snapshot is published once both have resolved.
    async fn refresh_all(&self, session: &Session) {
        let generation = self.session.generation();
        let profile_epoch = tick(&self.profile_epoch);
        let tweets_epoch = tick(&self.tweets_epoch);

        let ((profile, is_registered), (tweets, author_profiles)) =
            tokio::join!(self.load_profile(session), self.load_timeline(session));

        let applied = self.snapshot_tx.send_if_modified(|snapshot| {
            if self.session.generation() != generation
                || self.profile_epoch.load(Ordering::SeqCst) != profile_epoch
                || self.tweets_epoch.load(Ordering::SeqCst) != tweets_epoch
            {
                return false;
            }
            *snapshot = ViewSnapshot {
                account: Some(session.address.clone()),
                profile,
                is_registered,
                tweets,
                author_profiles,
            };
            true
        });
        if !applied {
            debug!(generation, "discarded stale full refresh");
        }
    }

    async fn refresh_profile(&self, session: &Session) {
        let generation = self.session.generation();
        let epoch = tick(&self.profile_epoch);

        let (profile, is_registered) = self.load_profile(session).await;

        let applied = self.snapshot_tx.send_if_modified(|snapshot| {
            if self.session.generation() != generation
                || self.profile_epoch.load(Ordering::SeqCst) != epoch
            {
                return false;
            }
            let mut next = snapshot.clone();
            next.account = Some(session.address.clone());
            next.profile = profile;
            next.is_registered = is_registered;
            *snapshot = next;
            true
        });
        if !applied {
            debug!(epoch, "discarded stale profile refresh");
        }
    }

    async fn refresh_tweets(&self, session: &Session) {
        let generation = self.session.generation();
        let epoch = tick(&self.tweets_epoch);

        let (tweets, author_profiles) = self.load_timeline(session).await;

        let applied = self.snapshot_tx.send_if_modified(|snapshot| {
            if self.session.generation() != generation
                || self.tweets_epoch.load(Ordering::SeqCst) != epoch
            {
                return false;
            }
            let mut next = snapshot.clone();
            next.tweets = tweets;
            next.author_profiles = author_profiles;
            *snapshot = next;
            true
        });
        if !applied {
            debug!(epoch, "discarded stale timeline refresh");
        }
    }

    /// Read degradation happens here, not in the gateway: a failed profile
    /// fetch renders as the empty (unregistered) profile.
    async fn load_profile(&self, session: &Session) -> (Profile, bool) {
        let profile = actions::fetch_profile(session.handles.profiles.as_ref(), &session.address)
            .await
            .unwrap_or_default();
        let is_registered = profile.is_registered();
        (profile, is_registered)
    }

    /// A failed tweet fetch renders as the empty timeline.
    async fn load_timeline(
        &self,
        session: &Session,
    ) -> (Vec<Tweet>, HashMap<Address, Option<Profile>>) {
        let tweets = actions::fetch_all_tweets(session.handles.tweets.as_ref())
            .await
            .unwrap_or_default();
        let authors = distinct_authors(&tweets);
        let author_profiles = self
            .authors
            .resolve(session.handles.profiles.as_ref(), &authors)
            .await;
        (tweets, author_profiles)
    }
}

fn tick(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionPhase;
    use dwitter_gateway::DeploymentConfig;
    use dwitter_simulation::{InMemoryChain, SimConnector, SimWallet};

    struct Harness {
        chain: Arc<InMemoryChain>,
        config: DeploymentConfig,
    }

    impl Harness {
        fn new() -> Self {
            let config = DeploymentConfig::new(Address::random(), Address::random());
            let chain = InMemoryChain::deploy(&config);
            Self { chain, config }
        }

        /// Builds a session manager + coordinator for one account.
        fn user(&self, account: &Address) -> (Arc<SessionManager>, Arc<ViewSyncCoordinator>) {
            let wallet = Arc::new(SimWallet::with_accounts(vec![account.clone()]));
            let connector = Arc::new(SimConnector::new(self.chain.clone(), self.config.clone()));
            let session = Arc::new(SessionManager::new(wallet, connector));
            let coordinator = Arc::new(ViewSyncCoordinator::new(session.clone()));
            (session, coordinator)
        }
    }

    #[tokio::test]
    async fn test_unregistered_account_has_empty_profile() {
        let harness = Harness::new();
        let account = Address::random();
        let (_, coordinator) = harness.user(&account);

        coordinator.connect().await.unwrap();

        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.account, Some(account));
        assert_eq!(snapshot.profile, Profile::default());
        assert!(!snapshot.is_registered);
        assert!(snapshot.tweets.is_empty());
    }

    #[tokio::test]
    async fn test_profile_round_trip() {
        let harness = Harness::new();
        let (_, coordinator) = harness.user(&Address::random());

        coordinator.connect().await.unwrap();
        coordinator.create_profile("Alice", "hi").await.unwrap();

        let snapshot = coordinator.snapshot();
        assert!(snapshot.is_registered);
        assert_eq!(snapshot.profile, Profile::new("Alice", "hi"));
    }

    #[tokio::test]
    async fn test_create_tweet_appears_in_snapshot() {
        let harness = Harness::new();
        let account = Address::random();
        let (_, coordinator) = harness.user(&account);

        coordinator.connect().await.unwrap();
        coordinator.create_profile("Alice", "hi").await.unwrap();
        coordinator.create_tweet("hello world").await.unwrap();

        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.tweets.len(), 1);
        let tweet = &snapshot.tweets[0];
        assert_eq!(tweet.author, account);
        assert_eq!(tweet.content, "hello world");
        assert_eq!(tweet.likes, 0);
    }

    #[tokio::test]
    async fn test_mutations_require_connection_and_registration() {
        let harness = Harness::new();
        let (_, coordinator) = harness.user(&Address::random());

        assert_eq!(
            coordinator.create_profile("Alice", "").await.unwrap_err(),
            SessionError::NotConnected
        );

        coordinator.connect().await.unwrap();
        assert_eq!(
            coordinator.create_tweet("gm").await.unwrap_err(),
            SessionError::NotRegistered
        );
        assert_eq!(
            coordinator.like_tweet(&Address::random(), 0).await.unwrap_err(),
            SessionError::NotRegistered
        );
    }

    #[tokio::test]
    async fn test_like_unlike_round_trip() {
        let harness = Harness::new();
        let account = Address::random();
        let (_, coordinator) = harness.user(&account);

        coordinator.connect().await.unwrap();
        coordinator.create_profile("Alice", "hi").await.unwrap();
        coordinator.create_tweet("gm").await.unwrap();

        coordinator.like_tweet(&account, 0).await.unwrap();
        assert_eq!(coordinator.snapshot().tweets[0].likes, 1);

        coordinator.unlike_tweet(&account, 0).await.unwrap();
        assert_eq!(coordinator.snapshot().tweets[0].likes, 0);
    }

    #[tokio::test]
    async fn test_unlike_below_zero_is_absorbed() {
        let harness = Harness::new();
        let account = Address::random();
        let (_, coordinator) = harness.user(&account);

        coordinator.connect().await.unwrap();
        coordinator.create_profile("Alice", "hi").await.unwrap();
        coordinator.create_tweet("gm").await.unwrap();

        // The contract reverts; the coordinator resyncs and moves on.
        coordinator.unlike_tweet(&account, 0).await.unwrap();
        assert_eq!(coordinator.snapshot().tweets[0].likes, 0);
        assert_eq!(harness.chain.likes_of(&account, 0).await, Some(0));
    }

    #[tokio::test]
    async fn test_rapid_double_like_converges() {
        let harness = Harness::new();
        let account = Address::random();
        let (_, coordinator) = harness.user(&account);

        coordinator.connect().await.unwrap();
        coordinator.create_profile("Alice", "hi").await.unwrap();
        coordinator.create_tweet("gm").await.unwrap();

        let (a, b) = tokio::join!(
            coordinator.like_tweet(&account, 0),
            coordinator.like_tweet(&account, 0)
        );
        a.unwrap();
        b.unwrap();

        let on_chain = harness.chain.likes_of(&account, 0).await.unwrap();
        assert_eq!(on_chain, 2);
        assert_eq!(coordinator.snapshot().tweets[0].likes, on_chain);
    }

    #[tokio::test]
    async fn test_disconnect_discards_late_initial_fetch() {
        let harness = Harness::new();
        let account = Address::random();
        let (session, coordinator) = harness.user(&account);

        harness.chain.pause();
        let connect = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.connect().await })
        };
        while session.phase().await != SessionPhase::Connected {
            tokio::task::yield_now().await;
        }

        coordinator.disconnect().await.unwrap();
        harness.chain.resume();
        connect.await.unwrap().unwrap();

        let snapshot = coordinator.snapshot();
        assert_eq!(session.phase().await, SessionPhase::Disconnected);
        assert!(snapshot.account.is_none());
        assert!(snapshot.tweets.is_empty());
        assert!(!snapshot.is_registered);
    }

    #[tokio::test]
    async fn test_read_failure_degrades_to_defaults() {
        let harness = Harness::new();
        let account = Address::random();
        let (_, coordinator) = harness.user(&account);

        coordinator.connect().await.unwrap();
        coordinator.create_profile("Alice", "hi").await.unwrap();
        coordinator.create_tweet("gm").await.unwrap();

        harness.chain.set_offline(true);
        coordinator.refresh().await.unwrap();
        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.profile, Profile::default());
        assert!(snapshot.tweets.is_empty());

        harness.chain.set_offline(false);
        coordinator.refresh().await.unwrap();
        let snapshot = coordinator.snapshot();
        assert!(snapshot.is_registered);
        assert_eq!(snapshot.tweets.len(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_shows_up_as_missing_mutation() {
        let harness = Harness::new();
        let account = Address::random();
        let (_, coordinator) = harness.user(&account);

        coordinator.connect().await.unwrap();
        coordinator.create_profile("Alice", "hi").await.unwrap();

        harness.chain.set_offline(true);
        coordinator.create_tweet("lost in the void").await.unwrap();
        harness.chain.set_offline(false);

        coordinator.refresh().await.unwrap();
        assert!(coordinator.snapshot().tweets.is_empty());
    }

    #[tokio::test]
    async fn test_author_profiles_resolve_once_per_author() {
        let harness = Harness::new();
        let account = Address::random();
        let (_, coordinator) = harness.user(&account);

        coordinator.connect().await.unwrap();
        coordinator.create_profile("Alice", "hi").await.unwrap();
        coordinator.create_tweet("first").await.unwrap();

        let reads = harness.chain.profile_reads();
        coordinator.create_tweet("second").await.unwrap();
        // The only author is already cached; the timeline refresh must not
        // re-fetch their profile.
        assert_eq!(harness.chain.profile_reads(), reads);
    }

    #[tokio::test]
    async fn test_profile_change_invalidates_author_cache() {
        let harness = Harness::new();
        let account = Address::random();
        let (_, coordinator) = harness.user(&account);

        coordinator.connect().await.unwrap();
        coordinator.create_profile("Alice", "hi").await.unwrap();
        coordinator.create_tweet("gm").await.unwrap();

        coordinator.create_profile("Alicia", "hi").await.unwrap();
        coordinator.refresh().await.unwrap();

        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.display_name_for(&account), "Alicia");
        assert_eq!(
            snapshot.author_profiles[&account].as_ref().unwrap().display_name,
            "Alicia"
        );
    }

    #[tokio::test]
    async fn test_end_to_end_alice_and_bob() {
        let harness = Harness::new();
        let alice: Address = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1111"
            .parse()
            .unwrap();
        let bob: Address = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2222"
            .parse()
            .unwrap();
        let (_, alice_view) = harness.user(&alice);
        let (_, bob_view) = harness.user(&bob);

        alice_view.connect().await.unwrap();
        assert!(!alice_view.snapshot().is_registered);
        alice_view.create_profile("Alice", "hi").await.unwrap();
        assert!(alice_view.snapshot().is_registered);
        assert_eq!(alice_view.snapshot().profile.display_name, "Alice");

        alice_view.create_tweet("hello world").await.unwrap();
        let tweet = alice_view.snapshot().tweets[0].clone();
        assert_eq!(tweet.author, alice);
        assert_eq!(tweet.content, "hello world");
        assert_eq!(tweet.likes, 0);

        bob_view.connect().await.unwrap();
        bob_view.create_profile("Bob", "").await.unwrap();
        bob_view.like_tweet(&alice, tweet.id).await.unwrap();

        let bob_snapshot = bob_view.snapshot();
        assert_eq!(bob_snapshot.tweets[0].likes, 1);
        assert_eq!(bob_snapshot.display_name_for(&alice), "Alice");

        alice_view.refresh().await.unwrap();
        assert_eq!(alice_view.snapshot().tweets[0].likes, 1);
    }
}
