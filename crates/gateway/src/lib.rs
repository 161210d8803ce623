//! Contract and wallet boundary for the Dwitter client.
//!
//! Everything on the other side of these traits is an external collaborator:
//! the wallet provider holds the keys, the two deployed contracts hold the
//! state and the business rules. This crate only names the capabilities the
//! client needs and normalizes their outcomes:
//! - Boundary traits for the wallet, the tweet contract and the profile contract
//! - A typed failure taxonomy instead of swallow-and-default
//! - Thin gateway operations that log every boundary call
//! - Deployment address configuration

/// Gateway operations over bound contract handles.
pub mod actions;
/// Deployment address configuration.
pub mod config;
/// Contract capability traits.
pub mod contracts;
/// Error types.
pub mod error;
/// Wallet provider capability.
pub mod wallet;

pub use actions::{
    fetch_all_tweets, fetch_profile, submit_like, submit_profile, submit_tweet, submit_unlike,
};
pub use config::{ConfigError, DeploymentConfig, PROFILE_CONTRACT_ENV, TWEET_CONTRACT_ENV};
pub use contracts::{ContractConnector, ContractHandles, ProfileContract, TweetContract};
pub use error::{GatewayError, GatewayResult};
pub use wallet::{WalletError, WalletProvider};
