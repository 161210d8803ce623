//! Normalized gateway operations.
//!
//! One intent, one contract call, one log line on failure. Errors propagate
//! typed; deciding between "degrade to a default" and "surface" is the
//! coordinator's call, not the gateway's.

use crate::contracts::{ProfileContract, TweetContract};
use crate::error::GatewayResult;
use dwitter_domain::{Address, Profile, Tweet};
use tracing::{debug, warn};

/// Fetches the profile stored for `address`.
///
/// An empty display name can mean "never registered" or, on some contracts,
/// a missing entity; callers derive registration from the returned profile.
pub async fn fetch_profile(
    handle: &dyn ProfileContract,
    address: &Address,
) -> GatewayResult<Profile> {
    match handle.get_profile(address).await {
        Ok(profile) => {
            debug!(address = %address, registered = profile.is_registered(), "fetched profile");
            Ok(profile)
        }
        Err(e) => {
            warn!(address = %address, error = %e, "profile fetch failed");
            Err(e)
        }
    }
}

/// Fetches every tweet in contract-defined order.
pub async fn fetch_all_tweets(handle: &dyn TweetContract) -> GatewayResult<Vec<Tweet>> {
    match handle.get_all_tweets().await {
        Ok(tweets) => {
            debug!(count = tweets.len(), "fetched tweet list");
            Ok(tweets)
        }
        Err(e) => {
            warn!(error = %e, "tweet list fetch failed");
            Err(e)
        }
    }
}

/// Issues a state-changing `setProfile` call signed by `from`.
pub async fn submit_profile(
    handle: &dyn ProfileContract,
    from: &Address,
    display_name: &str,
    bio: &str,
) -> GatewayResult<()> {
    match handle.set_profile(from, display_name, bio).await {
        Ok(()) => {
            debug!(from = %from, "profile submitted");
            Ok(())
        }
        Err(e) => {
            warn!(from = %from, error = %e, "profile submission failed");
            Err(e)
        }
    }
}

/// Issues a state-changing `createTweet` call signed by `from`.
pub async fn submit_tweet(
    handle: &dyn TweetContract,
    from: &Address,
    content: &str,
) -> GatewayResult<()> {
    match handle.create_tweet(from, content).await {
        Ok(()) => {
            debug!(from = %from, chars = content.chars().count(), "tweet submitted");
            Ok(())
        }
        Err(e) => {
            warn!(from = %from, error = %e, "tweet submission failed");
            Err(e)
        }
    }
}

/// Issues a `likeTweet` call for `(author, id)` signed by `from`.
pub async fn submit_like(
    handle: &dyn TweetContract,
    from: &Address,
    author: &Address,
    id: u64,
) -> GatewayResult<()> {
    match handle.like_tweet(from, author, id).await {
        Ok(()) => {
            debug!(from = %from, author = %author, id, "like submitted");
            Ok(())
        }
        Err(e) => {
            warn!(from = %from, author = %author, id, error = %e, "like submission failed");
            Err(e)
        }
    }
}

/// Issues an `unLikeTweet` call for `(author, id)` signed by `from`.
pub async fn submit_unlike(
    handle: &dyn TweetContract,
    from: &Address,
    author: &Address,
    id: u64,
) -> GatewayResult<()> {
    match handle.unlike_tweet(from, author, id).await {
        Ok(()) => {
            debug!(from = %from, author = %author, id, "unlike submitted");
            Ok(())
        }
        Err(e) => {
            warn!(from = %from, author = %author, id, error = %e, "unlike submission failed");
            Err(e)
        }
    }
}
