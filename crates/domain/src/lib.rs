//! Domain types for the Dwitter client core.
//!
//! Entities mirror the on-chain data model: the contract is the source of
//! truth, local copies are read-only caches replaced wholesale on fetch.

pub mod entities;
pub mod value_objects;

pub use entities::profile::{MAX_BIO_LENGTH, MAX_DISPLAY_NAME_LENGTH, Profile};
pub use entities::tweet::{MAX_TWEET_LENGTH, Tweet, TweetKey};
pub use value_objects::address::{Address, AddressParseError};
