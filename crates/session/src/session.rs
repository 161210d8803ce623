//! Wallet/contract session state machine.

use crate::error::SessionError;
use dwitter_domain::Address;
use dwitter_gateway::{ContractConnector, ContractHandles, WalletProvider};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Observable session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session; the initial state.
    Disconnected,
    /// A connect attempt is pending on the wallet provider.
    Connecting,
    /// A session is active.
    Connected,
}

/// A live session: the connected address plus both bound contract handles.
///
/// The handles exist iff the address does; there is no half-connected state.
#[derive(Clone, Debug)]
pub struct Session {
    pub address: Address,
    pub handles: ContractHandles,
}

#[derive(Clone, Default)]
enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Connected(Session),
}

/// Owns wallet connection state and its lifecycle.
///
/// At most one session is active per instance, and at most one connect
/// attempt is in flight: a second `connect` while one is pending is
/// rejected instead of racing it.
pub struct SessionManager {
    wallet: Arc<dyn WalletProvider>,
    connector: Arc<dyn ContractConnector>,
    state: RwLock<SessionState>,
    /// Bumped on every successful connect and every disconnect; consumers
    /// tag in-flight work with the value observed at dispatch time.
    generation: AtomicU64,
}

impl SessionManager {
    /// Creates a new manager in the Disconnected state.
    pub fn new(wallet: Arc<dyn WalletProvider>, connector: Arc<dyn ContractConnector>) -> Self {
        Self {
            wallet,
            connector,
            state: RwLock::new(SessionState::Disconnected),
            generation: AtomicU64::new(0),
        }
    }

    /// Connects: requests account access, then binds both contract handles.
    ///
    /// Suspends while the user decides in the wallet UI. The first returned
    /// account becomes the connected address. On any failure the machine
    /// returns to Disconnected.
    pub async fn connect(&self) -> Result<Session, SessionError> {
        {
            let mut state = self.state.write().await;
            match &*state {
                SessionState::Disconnected => *state = SessionState::Connecting,
                SessionState::Connecting => return Err(SessionError::ConnectInProgress),
                SessionState::Connected(_) => return Err(SessionError::AlreadyConnected),
            }
        }

        match self.try_connect().await {
            Ok(session) => {
                let mut state = self.state.write().await;
                *state = SessionState::Connected(session.clone());
                self.generation.fetch_add(1, Ordering::SeqCst);
                info!(address = %session.address, "wallet connected");
                Ok(session)
            }
            Err(e) => {
                let mut state = self.state.write().await;
                *state = SessionState::Disconnected;
                warn!(error = %e, "wallet connect failed");
                Err(e)
            }
        }
    }

    async fn try_connect(&self) -> Result<Session, SessionError> {
        let accounts = self.wallet.request_accounts().await?;
        let address = accounts
            .into_iter()
            .next()
            .ok_or(SessionError::NoAccounts)?;
        let handles = self.connector.bind().await?;
        Ok(Session { address, handles })
    }

    /// Disconnects: clears the address and both handles.
    ///
    /// Local state reset only; the external provider is not notified.
    pub async fn disconnect(&self) -> Result<(), SessionError> {
        let mut state = self.state.write().await;
        match &*state {
            SessionState::Connected(session) => {
                info!(address = %session.address, "wallet disconnected");
                *state = SessionState::Disconnected;
                self.generation.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            _ => Err(SessionError::NotConnected),
        }
    }

    /// Returns the active session, if any.
    pub async fn current(&self) -> Option<Session> {
        match &*self.state.read().await {
            SessionState::Connected(session) => Some(session.clone()),
            _ => None,
        }
    }

    /// Returns the observable phase.
    pub async fn phase(&self) -> SessionPhase {
        match &*self.state.read().await {
            SessionState::Disconnected => SessionPhase::Disconnected,
            SessionState::Connecting => SessionPhase::Connecting,
            SessionState::Connected(_) => SessionPhase::Connected,
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.phase().await == SessionPhase::Connected
    }

    /// Current session generation; see the field invariant.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
