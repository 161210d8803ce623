//! Scriptable wallet provider.

use async_trait::async_trait;
use dwitter_domain::Address;
use dwitter_gateway::{WalletError, WalletProvider};

enum Mode {
    Available,
    Unavailable,
    Rejecting,
    /// Never resolves; models a user who leaves the approval dialog open.
    Pending,
}

/// Wallet double whose `request_accounts` outcome is fixed at construction.
pub struct SimWallet {
    accounts: Vec<Address>,
    mode: Mode,
}

impl SimWallet {
    /// A wallet that approves and returns `accounts`.
    #[must_use]
    pub fn with_accounts(accounts: Vec<Address>) -> Self {
        Self {
            accounts,
            mode: Mode::Available,
        }
    }

    /// No wallet capability at all.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            accounts: Vec::new(),
            mode: Mode::Unavailable,
        }
    }

    /// A wallet whose user declines the request.
    #[must_use]
    pub fn rejecting() -> Self {
        Self {
            accounts: Vec::new(),
            mode: Mode::Rejecting,
        }
    }

    /// A wallet that never answers.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            accounts: Vec::new(),
            mode: Mode::Pending,
        }
    }
}

#[async_trait]
impl WalletProvider for SimWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        match self.mode {
            Mode::Available => Ok(self.accounts.clone()),
            Mode::Unavailable => Err(WalletError::Unavailable),
            Mode::Rejecting => Err(WalletError::Rejected("user denied account access".into())),
            Mode::Pending => std::future::pending().await,
        }
    }
}
