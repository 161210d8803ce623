use crate::error::GatewayResult;
use async_trait::async_trait;
use dwitter_domain::{Address, Profile, Tweet};
use std::sync::Arc;

/// The tweet contract capability.
///
/// Mutating calls are issued "from" the given address; signing happens in
/// the wallet provider, not here.
#[async_trait]
pub trait TweetContract: Send + Sync {
    /// Returns every tweet in contract-defined order.
    ///
    /// The order is an external assumption (append order in practice) and is
    /// passed through untouched; display-time reversal is the caller's job.
    async fn get_all_tweets(&self) -> GatewayResult<Vec<Tweet>>;

    async fn create_tweet(&self, from: &Address, content: &str) -> GatewayResult<()>;

    async fn like_tweet(&self, from: &Address, author: &Address, id: u64) -> GatewayResult<()>;

    async fn unlike_tweet(&self, from: &Address, author: &Address, id: u64) -> GatewayResult<()>;
}

/// The profile contract capability.
#[async_trait]
pub trait ProfileContract: Send + Sync {
    /// Returns the stored profile, or the empty profile for addresses that
    /// never registered.
    async fn get_profile(&self, address: &Address) -> GatewayResult<Profile>;

    async fn set_profile(
        &self,
        from: &Address,
        display_name: &str,
        bio: &str,
    ) -> GatewayResult<()>;
}

/// The pair of bound contract handles a live session owns.
#[derive(Clone)]
pub struct ContractHandles {
    pub tweets: Arc<dyn TweetContract>,
    pub profiles: Arc<dyn ProfileContract>,
}

impl std::fmt::Debug for ContractHandles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractHandles").finish_non_exhaustive()
    }
}

/// Binds contract handles against the configured deployment addresses.
///
/// The analog of instantiating contract objects from a web3 provider at
/// connect time: one bind per successful wallet connection.
#[async_trait]
pub trait ContractConnector: Send + Sync {
    async fn bind(&self) -> GatewayResult<ContractHandles>;
}
