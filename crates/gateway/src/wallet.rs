use async_trait::async_trait;
use dwitter_domain::Address;

/// Errors from the wallet provider boundary.
///
/// `Unavailable` is the one failure the UI surfaces as a blocking notice;
/// the other variants leave the session disconnected and are only logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    /// No wallet capability is present at all.
    #[error("no wallet provider available")]
    Unavailable,
    /// The user declined the account request.
    #[error("connection request rejected: {0}")]
    Rejected(String),
    /// The provider failed for some other reason.
    #[error("wallet provider error: {0}")]
    Provider(String),
}

/// External wallet capability: key management and account selection live
/// entirely on the other side of this trait.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Requests account access.
    ///
    /// May suspend indefinitely while the user decides in the wallet UI;
    /// there is no timeout at this layer.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;
}
