use serde::{Deserialize, Serialize};

/// Display name cap enforced by the profile contract.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 50;
/// Bio cap enforced by the profile contract.
pub const MAX_BIO_LENGTH: usize = 160;

/// A user profile, keyed by address and owned by the profile contract.
///
/// The contract returns the empty profile for addresses that never
/// registered, so "no profile" and the default value are the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub display_name: String,
    pub bio: String,
}

impl Profile {
    #[must_use]
    pub fn new(display_name: impl Into<String>, bio: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            bio: bio.into(),
        }
    }

    /// A profile counts as registered iff its display name is non-empty.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        !self.display_name.is_empty()
    }
}
