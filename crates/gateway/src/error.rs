/// Errors surfaced by contract boundary calls.
///
/// The caller decides whether to degrade to a default value or to surface
/// the failure; the gateway never hides the distinction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The contract signalled that the requested entity does not exist.
    #[error("not found")]
    NotFound,
    /// The node or provider failed before the call reached the contract.
    #[error("provider error: {0}")]
    Provider(String),
    /// The contract rejected the call.
    #[error("reverted: {0}")]
    Revert(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;
