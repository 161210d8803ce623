use crate::value_objects::address::Address;
use serde::{Deserialize, Serialize};

/// Content cap enforced by the tweet contract.
pub const MAX_TWEET_LENGTH: usize = 280;

/// A tweet as returned by the contract.
///
/// `id` is only unique per author; the full identity is `(author, id)`.
/// All fields, including `likes` and `timestamp`, are computed on chain and
/// never adjusted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: u64,
    pub author: Address,
    pub content: String,
    pub timestamp: u64, // unix seconds
    pub likes: u64,
}

impl Tweet {
    #[must_use]
    pub fn key(&self) -> TweetKey {
        TweetKey {
            author: self.author.clone(),
            id: self.id,
        }
    }
}

/// The contract-level identity of a tweet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TweetKey {
    pub author: Address,
    pub id: u64,
}
