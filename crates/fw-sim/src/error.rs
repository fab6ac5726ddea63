use fw_core::slots::EntitySlot;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Recoverable per-entity failures raised during tick processing.
///
/// These are the only expected runtime errors in the core: the tick processor
/// answers any of them by retiring the offending entity and moving on.
/// Invariant breaches (slot exhaustion, double-free, duplicate zone
/// membership) panic instead; they are caller bugs, not runtime conditions.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A stage referenced a slot that holds no entity.
    #[error("no entity registered at {0}")]
    EntityNotFound(EntitySlot),

    /// A behavior stage failed with a stage-specific message.
    #[error("stage fault: {0}")]
    StageFault(String),
}
