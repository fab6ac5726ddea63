use std::fmt;

use rand::rngs::StdRng;

use fw_core::collision::CollisionOverlay;
use fw_core::entity::WorldEntity;
use fw_core::slots::EntitySlot;

use crate::error::{SimError, SimResult};
use crate::registry::EntityRegistry;

/// Mutable context handed to each stage while it processes one entity.
///
/// Stages reach the entity and the rest of the world through the registry, so
/// every structural mutation (relocation, despawn of another entity) flows
/// through the registry's documented operations.
pub struct TickContext<'a, T: WorldEntity> {
    /// The collection being processed.
    pub registry: &'a mut EntityRegistry<T>,
    /// Shared walkability overlay, for registry operations that move occupancy.
    pub collision: &'a mut CollisionOverlay,
    /// The world clock cycle this tick runs under.
    pub cycle: u64,
    /// Seeded RNG for behavior stages.
    pub rng: &'a mut StdRng,
}

impl<T: WorldEntity> TickContext<'_, T> {
    /// The entity under processing, or [`SimError::EntityNotFound`].
    pub fn entity(&self, slot: EntitySlot) -> SimResult<&T> {
        self.registry.get(slot).ok_or(SimError::EntityNotFound(slot))
    }

    /// Mutable access to the entity under processing.
    pub fn entity_mut(&mut self, slot: EntitySlot) -> SimResult<&mut T> {
        self.registry
            .get_mut(slot)
            .ok_or(SimError::EntityNotFound(slot))
    }

    fn evict(&mut self, slot: EntitySlot, stage: &str, error: &SimError) {
        match self.registry.get(slot) {
            Some(entity) => {
                let label = entity.label();
                tracing::error!(stage, %error, entity = %label, "stage failed; evicting entity");
                self.registry.del(slot, self.collision);
            }
            None => {
                tracing::error!(
                    stage,
                    %error,
                    slot = slot.index(),
                    "stage failed for an entity it already retired"
                );
            }
        }
    }
}

/// One ordered step applied to every live entity each tick.
///
/// Stages run after the built-in clock sync and in registration order. An
/// `Err` return retires the entity it was processing; it must not leave other
/// entities in a half-mutated state.
pub trait TickStage<T: WorldEntity>: fmt::Debug {
    /// Human-readable name, used in eviction diagnostics.
    fn name(&self) -> &str;

    /// Process one entity.
    fn run(&mut self, ctx: &mut TickContext<'_, T>, slot: EntitySlot) -> SimResult<()>;
}

/// Drives one pass over a collection per world tick.
///
/// Traversal is the slot table's ascending order, snapshotted when the pass
/// starts: every entity live at that moment is processed exactly once, unless
/// an earlier entity's stage retires it first, in which case it is skipped.
/// Entities admitted mid-pass are first processed on the next tick.
///
/// A failing stage never aborts the pass. The error is logged with the
/// entity's identity and the offending entity alone is forcibly retired: a
/// full retirement, so NPCs despawn and players are disconnected.
pub struct TickProcessor<T: WorldEntity> {
    stages: Vec<Box<dyn TickStage<T>>>,
}

impl<T: WorldEntity> Default for TickProcessor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: WorldEntity> TickProcessor<T> {
    /// Create a processor with no behavior stages.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Register a stage. Stages run in registration order.
    pub fn add_stage<S: TickStage<T> + 'static>(&mut self, stage: S) {
        self.stages.push(Box::new(stage));
    }

    /// Number of registered stages.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Run one pass over every live entity in `registry`.
    ///
    /// For each entity: sync its cached clock to `cycle` first (delay
    /// baselines must read the current tick, not the previous one), then run
    /// the behavior stages with per-entity failure isolation.
    pub fn process(
        &mut self,
        registry: &mut EntityRegistry<T>,
        collision: &mut CollisionOverlay,
        cycle: u64,
        rng: &mut StdRng,
    ) {
        let snapshot = registry.occupied_slots();
        let mut ctx = TickContext {
            registry,
            collision,
            cycle,
            rng,
        };
        for slot in snapshot {
            // Retired by an earlier entity's stage this tick.
            if !ctx.registry.contains(slot) {
                continue;
            }
            if let Some(entity) = ctx.registry.get_mut(slot) {
                entity.presence_mut().clock = cycle;
            }
            for stage in &mut self.stages {
                if let Err(error) = stage.run(&mut ctx, slot) {
                    ctx.evict(slot, stage.name(), &error);
                    break;
                }
                // The stage may have retired its own entity; stop cleanly.
                if !ctx.registry.contains(slot) {
                    break;
                }
            }
        }
    }
}

impl<T: WorldEntity> fmt::Debug for TickProcessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickProcessor")
            .field("stages", &self.stages)
            .finish()
    }
}
