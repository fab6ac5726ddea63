/// Configuration for a simulation world.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Upper bound on concurrently-live NPCs.
    pub npc_capacity: usize,
    /// Upper bound on concurrently-connected players.
    pub player_capacity: usize,
    /// RNG seed threaded into behavior stages for deterministic runs.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            npc_capacity: 4096,
            player_capacity: 512,
            seed: 42,
        }
    }
}

impl SimConfig {
    /// Set the upper bound on concurrently-live NPCs.
    pub fn with_npc_capacity(mut self, capacity: usize) -> Self {
        self.npc_capacity = capacity;
        self
    }

    /// Set the upper bound on concurrently-connected players.
    pub fn with_player_capacity(mut self, capacity: usize) -> Self {
        self.player_capacity = capacity;
        self
    }

    /// Set the RNG seed for deterministic runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
