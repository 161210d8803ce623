//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use dwitter_session::prelude::*;
//! ```

pub use crate::authors::AuthorProfileCache;
pub use crate::coordinator::ViewSyncCoordinator;
pub use crate::error::SessionError;
pub use crate::session::{Session, SessionManager, SessionPhase};
pub use crate::snapshot::ViewSnapshot;
