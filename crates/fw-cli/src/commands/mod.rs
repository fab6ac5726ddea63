pub mod run;
pub mod zones;

use std::path::Path;

use serde::Deserialize;

use fw_core::coord::Coord;
use fw_core::entity::Npc;
use fw_sim::{SimConfig, Simulation};

/// One NPC spawn definition from a spawn file.
#[derive(Debug, Deserialize)]
pub struct NpcSpawn {
    /// Display name.
    pub name: String,
    /// Content-defined NPC type.
    pub type_id: u16,
    /// Spawn tile.
    pub coords: Coord,
    /// How many copies to spawn on and around the tile.
    #[serde(default = "default_count")]
    pub count: usize,
    /// Content group for keyed event routing.
    #[serde(default)]
    pub content_group: i32,
}

fn default_count() -> usize {
    1
}

/// Top-level shape of a JSON spawn file.
#[derive(Debug, Deserialize)]
pub struct SpawnFile {
    /// The NPC population to admit at world start.
    pub spawns: Vec<NpcSpawn>,
}

/// Load and parse a spawn file.
pub fn load_spawn_file(path: &Path) -> Result<SpawnFile, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid spawn file {}: {e}", path.display()))
}

/// Build a world and admit the spawn-file population.
///
/// Multiple copies of one spawn are laid out in a row east of the spawn tile
/// so they land on distinct tiles.
pub fn populate(sim: &mut Simulation, file: &SpawnFile) {
    for spawn in &file.spawns {
        for i in 0..spawn.count {
            let coords = spawn.coords.translate(i as i32, 0);
            let npc = Npc::new(spawn.type_id, spawn.name.clone(), coords)
                .with_content_group(spawn.content_group);
            sim.spawn_npc(npc);
        }
    }
}

/// Build a simulation sized for the given population.
pub fn world_for(population: usize, seed: u64) -> Simulation {
    let config = SimConfig::default()
        .with_npc_capacity(population.max(1) * 2)
        .with_seed(seed);
    Simulation::new(config)
}
