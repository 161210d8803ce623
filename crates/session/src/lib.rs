//! Session lifecycle and view synchronization.
//!
//! This crate is the coordination core of the client: it owns the
//! wallet/contract session and keeps the locally rendered snapshot
//! consistent with on-chain state across connects, disconnects and
//! mutations:
//! - Session state machine with a single in-flight connect guard
//! - Mutate-then-refetch flow for profile, tweet and like actions
//! - Wholesale snapshot publication over a watch channel
//! - Stale refresh suppression via generation/epoch tagging
//! - Persistent author profile cache

/// Prelude module for convenient imports.
pub mod prelude;

/// Author profile cache.
pub mod authors;
/// View sync coordinator.
pub mod coordinator;
/// Error types.
pub mod error;
/// Session state machine.
pub mod session;
/// View snapshot.
pub mod snapshot;

pub use authors::AuthorProfileCache;
pub use coordinator::ViewSyncCoordinator;
pub use error::SessionError;
pub use session::{Session, SessionManager, SessionPhase};
pub use snapshot::ViewSnapshot;
