use dwitter_gateway::{GatewayError, WalletError};

/// Errors surfaced by the session manager and coordinator.
///
/// Read and write failures at the contract boundary are absorbed by the
/// coordinator (the resync is the signal); only connect failures and
/// precondition violations reach the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No wallet capability is present; the one failure surfaced as a
    /// blocking notice.
    #[error("no wallet provider available")]
    WalletUnavailable,
    /// The user declined the connect request.
    #[error("wallet connection rejected: {0}")]
    Rejected(String),
    /// The wallet provider failed for some other reason.
    #[error("wallet provider error: {0}")]
    WalletFailed(String),
    /// The wallet approved the request but returned no accounts.
    #[error("wallet returned no accounts")]
    NoAccounts,
    /// A connect attempt is already pending.
    #[error("a connect attempt is already in progress")]
    ConnectInProgress,
    /// A session is already active.
    #[error("already connected")]
    AlreadyConnected,
    /// The operation requires an active session.
    #[error("not connected")]
    NotConnected,
    /// The operation requires a registered profile.
    #[error("profile registration required")]
    NotRegistered,
    /// Contract handle binding failed during connect.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl From<WalletError> for SessionError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::Unavailable => SessionError::WalletUnavailable,
            WalletError::Rejected(reason) => SessionError::Rejected(reason),
            WalletError::Provider(reason) => SessionError::WalletFailed(reason),
        }
    }
}
