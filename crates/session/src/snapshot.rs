//! The rendered view of on-chain state.

use dwitter_domain::{Address, Profile, Tweet};
use std::collections::HashMap;

/// Fallback author name when no registered profile resolves.
pub const ANONYMOUS: &str = "Anonymous";

/// The coordinator's current view of profile and tweet state.
///
/// Replaced wholesale on every publish; fields are never patched in place.
/// Rendering reads this and nothing else.
#[derive(Debug, Clone, Default)]
pub struct ViewSnapshot {
    /// The connected account, if any.
    pub account: Option<Address>,
    /// The connected account's profile; empty when unregistered (or when the
    /// fetch failed, indistinguishably).
    pub profile: Profile,
    /// Derived: the profile's display name is non-empty.
    pub is_registered: bool,
    /// Full tweet list in contract-defined order.
    pub tweets: Vec<Tweet>,
    /// Resolved profiles for the distinct authors of `tweets`.
    pub author_profiles: HashMap<Address, Option<Profile>>,
}

impl ViewSnapshot {
    /// Tweets in display order: contract order reversed, newest first.
    pub fn display_tweets(&self) -> impl Iterator<Item = &Tweet> {
        self.tweets.iter().rev()
    }

    /// Name to render for `author`.
    ///
    /// The connected user's own tweets prefer the locally held profile over
    /// the fetched one; anyone without a resolvable registered profile
    /// renders as [`ANONYMOUS`].
    #[must_use]
    pub fn display_name_for(&self, author: &Address) -> &str {
        if self.account.as_ref() == Some(author) && self.profile.is_registered() {
            return &self.profile.display_name;
        }
        match self.author_profiles.get(author) {
            Some(Some(profile)) if profile.is_registered() => &profile.display_name,
            _ => ANONYMOUS,
        }
    }
}
