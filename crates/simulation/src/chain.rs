//! Deterministic in-memory stand-in for the two deployed contracts.

use async_trait::async_trait;
use dwitter_domain::{
    Address, MAX_BIO_LENGTH, MAX_DISPLAY_NAME_LENGTH, MAX_TWEET_LENGTH, Profile, Tweet,
};
use dwitter_gateway::{
    DeploymentConfig, GatewayError, GatewayResult, ProfileContract, TweetContract,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{Notify, RwLock};
use tracing::debug;

/// Block timestamp the simulated chain boots with.
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

#[derive(Default)]
struct ChainState {
    profiles: HashMap<Address, Profile>,
    /// Global tweet list in append order.
    tweets: Vec<Tweet>,
    /// Per-author id counters; ids are array indices in the real contract.
    next_id: HashMap<Address, u64>,
}

/// A simulated chain hosting one tweet contract and one profile contract.
///
/// Enforces the same rules the deployed contracts do: registration before
/// tweeting, length caps, like counts floored at zero. Fault injection:
/// `set_offline` makes every call fail at the provider layer, and
/// `pause`/`resume` holds calls in flight for race and cancellation tests.
pub struct InMemoryChain {
    tweet_address: Address,
    profile_address: Address,
    state: RwLock<ChainState>,
    /// Logical block clock, unix seconds.
    clock: AtomicU64,
    offline: AtomicBool,
    paused: AtomicBool,
    resume_notify: Notify,
    profile_reads: AtomicU64,
}

impl InMemoryChain {
    /// Deploys both contracts at the configured addresses.
    #[must_use]
    pub fn deploy(config: &DeploymentConfig) -> Arc<Self> {
        Arc::new(Self {
            tweet_address: config.tweet_contract.clone(),
            profile_address: config.profile_contract.clone(),
            state: RwLock::new(ChainState::default()),
            clock: AtomicU64::new(GENESIS_TIMESTAMP),
            offline: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            profile_reads: AtomicU64::new(0),
        })
    }

    pub fn tweet_address(&self) -> &Address {
        &self.tweet_address
    }

    pub fn profile_address(&self) -> &Address {
        &self.profile_address
    }

    /// Advances the block clock.
    pub fn advance_time(&self, secs: u64) {
        self.clock.fetch_add(secs, Ordering::SeqCst);
    }

    /// Current block timestamp.
    pub fn timestamp(&self) -> u64 {
        self.clock.load(Ordering::SeqCst)
    }

    /// When offline, every call fails with a provider error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Holds all subsequent calls until [`resume`](Self::resume).
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Releases calls held by [`pause`](Self::pause).
    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.resume_notify.notify_waiters();
    }

    /// Number of profile reads served.
    pub fn profile_reads(&self) -> u64 {
        self.profile_reads.load(Ordering::SeqCst)
    }

    /// Test fixture: writes a profile directly, bypassing the call path.
    pub async fn register(&self, address: &Address, display_name: &str, bio: &str) {
        self.state
            .write()
            .await
            .profiles
            .insert(address.clone(), Profile::new(display_name, bio));
    }

    /// On-chain like count for `(author, id)`, if the tweet exists.
    pub async fn likes_of(&self, author: &Address, id: u64) -> Option<u64> {
        self.state
            .read()
            .await
            .tweets
            .iter()
            .find(|t| t.author == *author && t.id == id)
            .map(|t| t.likes)
    }

    pub async fn tweet_count(&self) -> usize {
        self.state.read().await.tweets.len()
    }

    async fn gate(&self) -> GatewayResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(GatewayError::Provider("node offline".into()));
        }
        loop {
            if !self.paused.load(Ordering::SeqCst) {
                return Ok(());
            }
            let resumed = self.resume_notify.notified();
            if !self.paused.load(Ordering::SeqCst) {
                return Ok(());
            }
            resumed.await;
        }
    }

    async fn get_profile(&self, address: &Address) -> GatewayResult<Profile> {
        self.gate().await?;
        self.profile_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .state
            .read()
            .await
            .profiles
            .get(address)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_profile(&self, from: &Address, display_name: &str, bio: &str) -> GatewayResult<()> {
        self.gate().await?;
        if display_name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
            return Err(GatewayError::Revert("display name too long".into()));
        }
        if bio.chars().count() > MAX_BIO_LENGTH {
            return Err(GatewayError::Revert("bio too long".into()));
        }
        self.state
            .write()
            .await
            .profiles
            .insert(from.clone(), Profile::new(display_name, bio));
        debug!(from = %from, "profile stored");
        Ok(())
    }

    async fn get_all_tweets(&self) -> GatewayResult<Vec<Tweet>> {
        self.gate().await?;
        Ok(self.state.read().await.tweets.clone())
    }

    async fn create_tweet(&self, from: &Address, content: &str) -> GatewayResult<()> {
        self.gate().await?;
        let timestamp = self.timestamp();
        let mut state = self.state.write().await;
        if !state
            .profiles
            .get(from)
            .is_some_and(Profile::is_registered)
        {
            return Err(GatewayError::Revert("caller is not registered".into()));
        }
        if content.chars().count() > MAX_TWEET_LENGTH {
            return Err(GatewayError::Revert("tweet too long".into()));
        }
        let id = state.next_id.entry(from.clone()).or_insert(0);
        let tweet_id = *id;
        *id += 1;
        state.tweets.push(Tweet {
            id: tweet_id,
            author: from.clone(),
            content: content.to_string(),
            timestamp,
            likes: 0,
        });
        debug!(from = %from, id = tweet_id, "tweet stored");
        Ok(())
    }

    async fn like_tweet(&self, _from: &Address, author: &Address, id: u64) -> GatewayResult<()> {
        self.gate().await?;
        let mut state = self.state.write().await;
        let tweet = state
            .tweets
            .iter_mut()
            .find(|t| t.author == *author && t.id == id)
            .ok_or_else(|| GatewayError::Revert("tweet does not exist".into()))?;
        tweet.likes += 1;
        Ok(())
    }

    async fn unlike_tweet(&self, _from: &Address, author: &Address, id: u64) -> GatewayResult<()> {
        self.gate().await?;
        let mut state = self.state.write().await;
        let tweet = state
            .tweets
            .iter_mut()
            .find(|t| t.author == *author && t.id == id)
            .ok_or_else(|| GatewayError::Revert("tweet does not exist".into()))?;
        if tweet.likes == 0 {
            return Err(GatewayError::Revert("tweet has no likes".into()));
        }
        tweet.likes -= 1;
        Ok(())
    }
}

/// Handle bound to the chain's tweet contract deployment.
pub(crate) struct SimTweetHandle {
    pub(crate) chain: Arc<InMemoryChain>,
}

#[async_trait]
impl TweetContract for SimTweetHandle {
    async fn get_all_tweets(&self) -> GatewayResult<Vec<Tweet>> {
        self.chain.get_all_tweets().await
    }

    async fn create_tweet(&self, from: &Address, content: &str) -> GatewayResult<()> {
        self.chain.create_tweet(from, content).await
    }

    async fn like_tweet(&self, from: &Address, author: &Address, id: u64) -> GatewayResult<()> {
        self.chain.like_tweet(from, author, id).await
    }

    async fn unlike_tweet(&self, from: &Address, author: &Address, id: u64) -> GatewayResult<()> {
        self.chain.unlike_tweet(from, author, id).await
    }
}

/// Handle bound to the chain's profile contract deployment.
pub(crate) struct SimProfileHandle {
    pub(crate) chain: Arc<InMemoryChain>,
}

#[async_trait]
impl ProfileContract for SimProfileHandle {
    async fn get_profile(&self, address: &Address) -> GatewayResult<Profile> {
        self.chain.get_profile(address).await
    }

    async fn set_profile(
        &self,
        from: &Address,
        display_name: &str,
        bio: &str,
    ) -> GatewayResult<()> {
        self.chain.set_profile(from, display_name, bio).await
    }
}
