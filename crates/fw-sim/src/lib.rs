//! Tick-synchronous world simulation for Fenwold.
//!
//! Orchestrates the `fw-core` data model into a running world: an
//! [`registry::EntityRegistry`] per entity collection keeps the slot table,
//! zone index, collision overlay, and event bus consistent through lifecycle
//! operations; a [`tick::TickProcessor`] drives one pass over each collection
//! per clock cycle, isolating any single entity's failure from the rest of
//! the world.

/// World clock: the monotonic cycle counter.
pub mod clock;
/// Configuration for a simulation world.
pub mod config;
/// Error types for the simulation crate.
pub mod error;
/// Synchronous lifecycle and keyed event bus.
pub mod events;
/// Lifecycle orchestration for one entity collection.
pub mod registry;
/// Top-level world orchestrator.
pub mod simulation;
/// Per-tick processing with failure isolation.
pub mod tick;

/// Re-export of [`clock::WorldClock`].
pub use clock::WorldClock;
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of the event bus types.
pub use events::{EventBus, KeyedFamily, Lifecycle, compose_key};
/// Re-export of [`registry::EntityRegistry`].
pub use registry::EntityRegistry;
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-exports of the tick processing types.
pub use tick::{TickContext, TickProcessor, TickStage};
