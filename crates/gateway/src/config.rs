use dwitter_domain::{Address, AddressParseError};
use std::env;

/// Environment variable holding the tweet contract deployment address.
pub const TWEET_CONTRACT_ENV: &str = "DWITTER_TWEET_CONTRACT_ADDRESS";
/// Environment variable holding the profile contract deployment address.
pub const PROFILE_CONTRACT_ENV: &str = "DWITTER_PROFILE_CONTRACT_ADDRESS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid address in {0}: {1}")]
    Invalid(&'static str, AddressParseError),
}

/// The two deployment addresses the client is pointed at.
///
/// Nothing here checks that contracts actually live at these addresses;
/// a misconfigured deployment simply fails at bind or call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    pub tweet_contract: Address,
    pub profile_contract: Address,
}

impl DeploymentConfig {
    #[must_use]
    pub fn new(tweet_contract: Address, profile_contract: Address) -> Self {
        Self {
            tweet_contract,
            profile_contract,
        }
    }

    /// Loads both addresses from the environment.
    ///
    /// # Errors
    /// Returns an error if either variable is missing or not a valid address.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            tweet_contract: read_address(TWEET_CONTRACT_ENV)?,
            profile_contract: read_address(PROFILE_CONTRACT_ENV)?,
        })
    }
}

fn read_address(var: &'static str) -> Result<Address, ConfigError> {
    let raw = env::var(var).map_err(|_| ConfigError::Missing(var))?;
    raw.parse().map_err(|e| ConfigError::Invalid(var, e))
}
