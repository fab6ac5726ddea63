use fw_core::entity::Npc;
use fw_core::slots::EntitySlot;
use fw_sim::{SimResult, TickContext, TickStage};
use rand::Rng;

/// Demo NPC behavior: a random walk of one tile per tick.
///
/// NPCs drift at most `range` tiles away from their home tile and relocate
/// through the registry, so occupancy and zone membership stay consistent
/// while they roam.
#[derive(Debug)]
pub struct WanderStage {
    range: i32,
}

impl WanderStage {
    /// Create a wander stage with the given roam radius in tiles.
    pub fn new(range: i32) -> Self {
        Self { range }
    }
}

impl TickStage<Npc> for WanderStage {
    fn name(&self) -> &str {
        "wander"
    }

    fn run(&mut self, ctx: &mut TickContext<'_, Npc>, slot: EntitySlot) -> SimResult<()> {
        let (coords, home) = {
            let npc = ctx.entity(slot)?;
            (npc.presence.coords, npc.home)
        };

        let (dx, dz) = match ctx.rng.random_range(0..6) {
            0 => (1, 0),
            1 => (-1, 0),
            2 => (0, 1),
            3 => (0, -1),
            // Stand still the rest of the time.
            _ => return Ok(()),
        };

        let dest = coords.translate(dx, dz);
        let strayed = (dest.x - home.x).abs() > self.range || (dest.z - home.z).abs() > self.range;
        if !strayed {
            ctx.registry.move_to(slot, dest, ctx.collision);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fw_core::coord::Coord;
    use fw_sim::{SimConfig, Simulation};

    #[test]
    fn wanderers_stay_within_range_of_home() {
        let mut sim = Simulation::new(SimConfig::default().with_seed(3));
        sim.add_npc_stage(WanderStage::new(2));
        let home = Coord::new(50, 50, 0);
        let slot = sim.spawn_npc(Npc::new(1, "goat", home));

        sim.run(200);

        let coords = sim.npcs().get(slot).unwrap().presence.coords;
        assert!((coords.x - home.x).abs() <= 2);
        assert!((coords.z - home.z).abs() <= 2);
        // Occupancy followed the walk.
        assert!(sim.collision().is_blocked(coords));
        assert_eq!(sim.npcs().find_all(coords).count(), 1);
    }

    #[test]
    fn wandering_is_deterministic_per_seed() {
        let run_with = |seed| {
            let mut sim = Simulation::new(SimConfig::default().with_seed(seed));
            sim.add_npc_stage(WanderStage::new(5));
            let slot = sim.spawn_npc(Npc::new(1, "goat", Coord::new(0, 0, 0)));
            sim.run(50);
            sim.npcs().get(slot).unwrap().presence.coords
        };
        assert_eq!(run_with(9), run_with(9));
    }
}
