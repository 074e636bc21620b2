//! Session configuration structures and loaders.
use std::env;
use std::time::Duration;

use war_core::GameConfig;

/// Latency and fault injection for [`crate::SimulatedServer`].
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Probability in `[0, 1]` that a call times out instead of completing.
    pub timeout_chance: f64,
    /// Probability in `[0, 1]` that a call fails with a generic server error.
    pub error_chance: f64,
    /// Extra wait before a simulated timeout is reported.
    pub timeout_duration: Duration,
    /// Seed for latency and fault rolls. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl NetworkConfig {
    pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(100);
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(2_000);
    pub const DEFAULT_TIMEOUT_CHANCE: f64 = 0.02;
    pub const DEFAULT_ERROR_CHANCE: f64 = 0.05;
    pub const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(5);

    /// No latency and no injected faults.
    pub fn reliable() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            timeout_chance: 0.0,
            error_chance: 0.0,
            timeout_duration: Duration::ZERO,
            seed: Some(0),
        }
    }

    /// Clamps probabilities into `[0, 1]` and orders the delay bounds.
    pub fn normalized(mut self) -> Self {
        self.timeout_chance = clamp_probability(self.timeout_chance);
        self.error_chance = clamp_probability(self.error_chance);
        if self.min_delay > self.max_delay {
            std::mem::swap(&mut self.min_delay, &mut self.max_delay);
        }
        self
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            min_delay: Self::DEFAULT_MIN_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            timeout_chance: Self::DEFAULT_TIMEOUT_CHANCE,
            error_chance: Self::DEFAULT_ERROR_CHANCE,
            timeout_duration: Self::DEFAULT_TIMEOUT_DURATION,
            seed: None,
        }
    }
}

/// Retry budget and backoff curve for boundary calls.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
    /// Total attempts per logical operation, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Jitter as a fraction of the exponential delay, applied in both directions.
    pub jitter: f64,
}

impl RetryConfig {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);
    pub const DEFAULT_JITTER: f64 = 0.2;
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            base_delay: Self::DEFAULT_BASE_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            jitter: Self::DEFAULT_JITTER,
        }
    }
}

/// Configuration shared by the session worker and the simulated server.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub game: GameConfig,
    pub network: NetworkConfig,
    pub retry: RetryConfig,
    /// Pause after a War round before play resumes.
    pub war_settle: Duration,
    /// Pause after a decisive round before play resumes.
    pub round_settle: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl SessionConfig {
    pub const DEFAULT_WAR_SETTLE: Duration = Duration::from_millis(1_500);
    pub const DEFAULT_ROUND_SETTLE: Duration = Duration::from_millis(500);

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables (durations in milliseconds):
    /// - `WAR_SEED` - Shuffle seed of the first game (default: 0)
    /// - `WAR_MAX_ROUNDS` - Rounds before a game is called by card count (default: 10000)
    /// - `WAR_MIN_NETWORK_DELAY_MS` / `WAR_MAX_NETWORK_DELAY_MS` - Simulated latency bounds (default: 100 / 2000)
    /// - `WAR_TIMEOUT_CHANCE` - Probability a call times out (default: 0.02)
    /// - `WAR_ERROR_CHANCE` - Probability a call fails generically (default: 0.05)
    /// - `WAR_TIMEOUT_DURATION_MS` - Wait before a timeout is reported (default: 5000)
    /// - `WAR_NETWORK_SEED` - Seed for latency/fault rolls (default: entropy)
    /// - `WAR_MAX_RETRY_ATTEMPTS` - Attempts per operation (default: 3)
    /// - `WAR_RETRY_BASE_DELAY_MS` / `WAR_RETRY_MAX_DELAY_MS` - Backoff base and cap (default: 1000 / 10000)
    /// - `WAR_SETTLE_MS` / `WAR_ROUND_SETTLE_MS` - Settle windows (default: 1500 / 500)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_env::<u64>("WAR_SEED") {
            config.game.seed = seed;
        }
        if let Some(max_rounds) = read_env::<u32>("WAR_MAX_ROUNDS") {
            config.game = config.game.max_rounds(max_rounds);
        }

        let network = &mut config.network;
        if let Some(delay) = read_env_millis("WAR_MIN_NETWORK_DELAY_MS") {
            network.min_delay = delay;
        }
        if let Some(delay) = read_env_millis("WAR_MAX_NETWORK_DELAY_MS") {
            network.max_delay = delay;
        }
        if let Some(chance) = read_env::<f64>("WAR_TIMEOUT_CHANCE") {
            network.timeout_chance = chance;
        }
        if let Some(chance) = read_env::<f64>("WAR_ERROR_CHANCE") {
            network.error_chance = chance;
        }
        if let Some(duration) = read_env_millis("WAR_TIMEOUT_DURATION_MS") {
            network.timeout_duration = duration;
        }
        network.seed = read_env::<u64>("WAR_NETWORK_SEED");
        config.network = config.network.normalized();

        if let Some(attempts) = read_env::<u32>("WAR_MAX_RETRY_ATTEMPTS") {
            config.retry.max_attempts = attempts.max(1);
        }
        if let Some(delay) = read_env_millis("WAR_RETRY_BASE_DELAY_MS") {
            config.retry.base_delay = delay;
        }
        if let Some(delay) = read_env_millis("WAR_RETRY_MAX_DELAY_MS") {
            config.retry.max_delay = delay;
        }

        if let Some(window) = read_env_millis("WAR_SETTLE_MS") {
            config.war_settle = window;
        }
        if let Some(window) = read_env_millis("WAR_ROUND_SETTLE_MS") {
            config.round_settle = window;
        }

        config
    }

    /// No latency, no faults and no settle windows. Useful for tests and
    /// batch simulation.
    pub fn instant(seed: u64) -> Self {
        Self {
            game: GameConfig::with_seed(seed),
            network: NetworkConfig::reliable(),
            war_settle: Duration::ZERO,
            round_settle: Duration::ZERO,
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            network: NetworkConfig::default(),
            retry: RetryConfig::default(),
            war_settle: Self::DEFAULT_WAR_SETTLE,
            round_settle: Self::DEFAULT_ROUND_SETTLE,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

fn clamp_probability(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_millis(key: &str) -> Option<Duration> {
    read_env::<u64>(key).map(Duration::from_millis)
}
