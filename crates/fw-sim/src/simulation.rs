use rand::SeedableRng;
use rand::rngs::StdRng;

use fw_core::collision::CollisionOverlay;
use fw_core::entity::{Npc, Player};
use fw_core::slots::EntitySlot;

use crate::clock::WorldClock;
use crate::config::SimConfig;
use crate::registry::EntityRegistry;
use crate::tick::{TickProcessor, TickStage};

/// The top-level world orchestrator.
///
/// Owns the NPC and player registries, the collision overlay both write
/// into, the world clock, one tick processor per collection, and the seeded
/// RNG threaded into behavior stages. The external scheduler calls
/// [`Simulation::tick`] exactly once per discrete time step.
pub struct Simulation {
    npcs: EntityRegistry<Npc>,
    players: EntityRegistry<Player>,
    collision: CollisionOverlay,
    clock: WorldClock,
    npc_stages: TickProcessor<Npc>,
    player_stages: TickProcessor<Player>,
    rng: StdRng,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("cycle", &self.clock.cycle())
            .field("npcs", &self.npcs.len())
            .field("players", &self.players.len())
            .finish()
    }
}

impl Simulation {
    /// Create a world from the given configuration.
    pub fn new(config: SimConfig) -> Self {
        Self {
            npcs: EntityRegistry::new(config.npc_capacity),
            players: EntityRegistry::new(config.player_capacity),
            collision: CollisionOverlay::new(),
            clock: WorldClock::new(),
            npc_stages: TickProcessor::new(),
            player_stages: TickProcessor::new(),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Register an NPC behavior stage. Stages run in registration order.
    pub fn add_npc_stage<S: TickStage<Npc> + 'static>(&mut self, stage: S) {
        self.npc_stages.add_stage(stage);
    }

    /// Register a player behavior stage. Stages run in registration order.
    pub fn add_player_stage<S: TickStage<Player> + 'static>(&mut self, stage: S) {
        self.player_stages.add_stage(stage);
    }

    /// Admit an NPC into the world.
    pub fn spawn_npc(&mut self, npc: Npc) -> EntitySlot {
        self.npcs.add(npc, &mut self.collision)
    }

    /// Retire an NPC from the world.
    pub fn despawn_npc(&mut self, slot: EntitySlot) -> Npc {
        self.npcs.del(slot, &mut self.collision)
    }

    /// Admit a connecting player into the world.
    pub fn connect_player(&mut self, player: Player) -> EntitySlot {
        self.players.add(player, &mut self.collision)
    }

    /// Retire a player from the world, closing their session.
    pub fn disconnect_player(&mut self, slot: EntitySlot) -> Player {
        self.players.del(slot, &mut self.collision)
    }

    /// Advance the world by one tick.
    ///
    /// The clock moves first so every entity processed this tick syncs
    /// against the new cycle; then the player collection is processed, then
    /// the NPC collection.
    pub fn tick(&mut self) {
        let cycle = self.clock.advance();
        self.player_stages
            .process(&mut self.players, &mut self.collision, cycle, &mut self.rng);
        self.npc_stages
            .process(&mut self.npcs, &mut self.collision, cycle, &mut self.rng);
    }

    /// Advance the world by `n` ticks.
    pub fn run(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// The NPC registry.
    pub fn npcs(&self) -> &EntityRegistry<Npc> {
        &self.npcs
    }

    /// Mutable access to the NPC registry (e.g. for event subscriptions).
    pub fn npcs_mut(&mut self) -> &mut EntityRegistry<Npc> {
        &mut self.npcs
    }

    /// The player registry.
    pub fn players(&self) -> &EntityRegistry<Player> {
        &self.players
    }

    /// Mutable access to the player registry.
    pub fn players_mut(&mut self) -> &mut EntityRegistry<Player> {
        &mut self.players
    }

    /// The shared walkability overlay.
    pub fn collision(&self) -> &CollisionOverlay {
        &self.collision
    }

    /// The world clock.
    pub fn clock(&self) -> &WorldClock {
        &self.clock
    }

    /// The current clock cycle.
    pub fn current_cycle(&self) -> u64 {
        self.clock.cycle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SimError, SimResult};
    use crate::events::Lifecycle;
    use crate::tick::TickContext;
    use fw_core::coord::Coord;
    use fw_core::entity::WorldEntity;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn tick_advances_clock_and_syncs_entities() {
        let mut sim = Simulation::new(SimConfig::default().with_seed(9));
        let npc = sim.spawn_npc(Npc::new(1, "gull", Coord::new(3, 3, 0)));
        let player = sim.connect_player(Player::new("Ada", Coord::new(4, 3, 0)));

        sim.run(3);

        assert_eq!(sim.current_cycle(), 3);
        assert_eq!(sim.npcs().get(npc).unwrap().presence.clock, 3);
        assert_eq!(sim.players().get(player).unwrap().presence.clock, 3);
    }

    #[test]
    fn npcs_and_players_share_the_overlay() {
        let mut sim = Simulation::new(SimConfig::default());
        let tile = Coord::new(7, 7, 0);
        let npc = sim.spawn_npc(Npc::new(1, "gull", tile));
        sim.connect_player(Player::new("Ada", tile));

        assert_eq!(sim.collision().occupancy(tile), 2);
        sim.despawn_npc(npc);
        assert_eq!(sim.collision().occupancy(tile), 1, "player still stands there");
    }

    #[test]
    fn disconnect_closes_the_session() {
        let mut sim = Simulation::new(SimConfig::default());
        let slot = sim.connect_player(Player::new("Ada", Coord::new(0, 0, 0)));
        let player = sim.disconnect_player(slot);
        assert!(!player.is_connected());
        assert!(player.presence.slot.is_invalid());
    }

    /// Player stage that fails every tick.
    #[derive(Debug)]
    struct AlwaysFail;

    impl TickStage<Player> for AlwaysFail {
        fn name(&self) -> &str {
            "always-fail"
        }

        fn run(&mut self, _ctx: &mut TickContext<'_, Player>, _slot: EntitySlot) -> SimResult<()> {
            Err(SimError::StageFault("broken client".into()))
        }
    }

    #[test]
    fn faulty_player_is_disconnected_by_the_tick() {
        let mut sim = Simulation::new(SimConfig::default());
        sim.add_player_stage(AlwaysFail);
        let slot = sim.connect_player(Player::new("Ada", Coord::new(0, 0, 0)));

        let deletions = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&deletions);
        sim.players_mut()
            .events_mut()
            .subscribe(Lifecycle::Delete, move |player: &Player| {
                sink.borrow_mut().push(player.label());
            });

        sim.tick();

        assert!(!sim.players().contains(slot));
        assert_eq!(deletions.borrow().len(), 1);
    }

    #[test]
    fn empty_world_ticks_freely() {
        let mut sim = Simulation::new(SimConfig::default());
        sim.run(100);
        assert_eq!(sim.current_cycle(), 100);
        assert!(sim.npcs().is_empty());
        assert!(sim.players().is_empty());
    }
}
