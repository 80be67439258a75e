use std::env;
use std::time::Duration;

/// Tunables for the movement simulator and the "active" snapshot filter.
///
/// Every constant the update loop depends on lives here so tests can run
/// the simulator deterministically (zero turn probability, custom caps).
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Delay between ticks. Fixed-delay: a long tick pushes the next one
    /// back rather than overlapping it.
    pub tick_interval: Duration,
    /// Coordinate-units travelled per tick along the heading.
    pub speed: f64,
    /// Chance per tick that a vehicle perturbs its heading.
    pub turn_probability: f64,
    /// Maximum heading perturbation in degrees, either direction.
    pub turn_magnitude: f64,
    /// Maximum retained route history points (FIFO eviction beyond).
    pub route_cap: usize,
    /// How recently a vehicle must have been updated to count as active.
    pub active_window: Duration,
}

impl SimulatorConfig {
    pub fn from_env() -> Self {
        Self {
            tick_interval: Duration::from_millis(env_u64("TICK_INTERVAL_MS", 5_000)),
            speed: env_f64("MOVE_SPEED", 0.0002),
            turn_probability: env_f64("TURN_PROBABILITY", 0.15),
            turn_magnitude: env_f64("TURN_MAGNITUDE_DEGREES", 12.5),
            route_cap: usize::try_from(env_u64("ROUTE_CAP", 100)).unwrap_or(100),
            active_window: Duration::from_secs(env_u64("ACTIVE_WINDOW_SECS", 10)),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key).ok().and_then(|value| value.parse::<f64>().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key).ok().and_then(|value| value.parse::<u64>().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::SimulatorConfig;

    #[test]
    fn observed_defaults() {
        let config = SimulatorConfig::from_env();

        assert_eq!(config.tick_interval, Duration::from_secs(5));
        assert!((config.speed - 0.0002).abs() < f64::EPSILON);
        assert!((config.turn_probability - 0.15).abs() < f64::EPSILON);
        assert!((config.turn_magnitude - 12.5).abs() < f64::EPSILON);
        assert_eq!(config.route_cap, 100);
        assert_eq!(config.active_window, Duration::from_secs(10));
    }
}
