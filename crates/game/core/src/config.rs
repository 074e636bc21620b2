/// Rule constants and tunable parameters for a game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Seed for the initial shuffle. The same seed deals the same game.
    pub seed: u64,
    /// Rounds after which the game is called by card count. War with a
    /// deterministic pot order can cycle forever without this.
    pub max_rounds: u32,
}

impl GameConfig {
    // ===== rule constants =====
    /// Cards each side commits to one War level: three face-down, one face-up.
    pub const WAR_CARDS_PER_SIDE: usize = 4;
    /// Upper bound on chained War levels within one round. Each level takes at
    /// least one card from each 26-card half.
    pub const MAX_WAR_DEPTH: u32 = 26;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SEED: u64 = 0;
    pub const DEFAULT_MAX_ROUNDS: u32 = 10_000;

    pub fn new() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            max_rounds: Self::DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::new()
        }
    }

    pub fn max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
