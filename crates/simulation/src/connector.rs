//! Binds contract handles against the simulated chain.

use crate::chain::{InMemoryChain, SimProfileHandle, SimTweetHandle};
use async_trait::async_trait;
use dwitter_gateway::{
    ContractConnector, ContractHandles, DeploymentConfig, GatewayError, GatewayResult,
};
use std::sync::Arc;

/// Connector pointed at a chain plus the configured deployment addresses.
///
/// Binding fails if the configuration names addresses nothing is deployed
/// at, which is how a misconfigured environment shows up in practice.
pub struct SimConnector {
    chain: Arc<InMemoryChain>,
    config: DeploymentConfig,
}

impl SimConnector {
    #[must_use]
    pub fn new(chain: Arc<InMemoryChain>, config: DeploymentConfig) -> Self {
        Self { chain, config }
    }

    /// Connector whose configuration matches the chain's own deployments.
    #[must_use]
    pub fn for_chain(chain: Arc<InMemoryChain>) -> Self {
        let config = DeploymentConfig::new(
            chain.tweet_address().clone(),
            chain.profile_address().clone(),
        );
        Self { chain, config }
    }
}

#[async_trait]
impl ContractConnector for SimConnector {
    async fn bind(&self) -> GatewayResult<ContractHandles> {
        if self.config.tweet_contract != *self.chain.tweet_address() {
            return Err(GatewayError::Provider(format!(
                "no tweet contract deployed at {}",
                self.config.tweet_contract
            )));
        }
        if self.config.profile_contract != *self.chain.profile_address() {
            return Err(GatewayError::Provider(format!(
                "no profile contract deployed at {}",
                self.config.profile_contract
            )));
        }
        Ok(ContractHandles {
            tweets: Arc::new(SimTweetHandle {
                chain: self.chain.clone(),
            }),
            profiles: Arc::new(SimProfileHandle {
                chain: self.chain.clone(),
            }),
        })
    }
}
