//! In-process doubles for the wallet and both contracts.
//!
//! Everything the client treats as external — the wallet provider, the
//! tweet contract, the profile contract — has a deterministic in-memory
//! stand-in here, with the same business rules the deployed contracts
//! enforce. Used by the test suites and the demo CLI:
//! - [`InMemoryChain`]: profiles, tweets, like accounting, a logical clock
//! - Fault injection: an offline switch and a pause gate for race tests
//! - [`SimWallet`]: scriptable account access outcomes
//! - [`SimConnector`]: binds handles against the chain's deployments

/// The simulated chain and its contract handles.
pub mod chain;
/// Contract handle binding.
pub mod connector;
/// Scriptable wallet provider.
pub mod wallet;

pub use chain::{GENESIS_TIMESTAMP, InMemoryChain};
pub use connector::SimConnector;
pub use wallet::SimWallet;
