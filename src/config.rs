//! Configuration Module
//!
//! Cache and sweeper settings, with defaults and environment overrides.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Shortest time between two sweep passes, whatever `hz` asks for
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

// == Sweep Config ==
/// Background expiration sweeper settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Sweep passes per second
    pub hz: u32,
    /// Entries examined per pass, at least (or the whole cache if smaller)
    pub min_samples: usize,
    /// Worst-case time for the sweep to cover a large cache once
    pub full_cycle: Duration,
    /// Move inspected, still-live entries to the head
    pub promote_inspected: bool,
}

impl SweepConfig {
    // == Tick Interval ==
    /// Time between two passes, never shorter than [`MIN_SWEEP_INTERVAL`].
    pub fn interval(&self) -> Duration {
        (Duration::from_secs(1) / self.hz.max(1)).max(MIN_SWEEP_INTERVAL)
    }

    // == Samples ==
    /// Number of entries to examine in one pass over a cache of `len`.
    ///
    /// Large caches are spread over `hz * full_cycle` passes; anything up to
    /// `min_samples` entries is covered in a single pass.
    pub fn samples_for(&self, len: usize) -> usize {
        let passes = u128::from(self.hz.max(1)) * self.full_cycle.as_millis() / 1000;
        let passes_per_cycle = usize::try_from(passes.max(1)).unwrap_or(usize::MAX);
        (len / passes_per_cycle).max(self.min_samples.min(len))
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            hz: 10,
            min_samples: 50,
            full_cycle: Duration::from_secs(10),
            promote_inspected: false,
        }
    }
}

// == Cache Config ==
/// Cache construction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheConfig {
    /// Maximum number of entries, 0 = unbounded
    pub max_entries: usize,
    /// Sweeper settings
    pub sweep: SweepConfig,
}

impl CacheConfig {
    /// Creates a config with the given capacity and default sweeper settings.
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::default()
        }
    }

    /// Creates a new CacheConfig from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries, 0 = unbounded (default: 0)
    /// - `SWEEP_HZ` - Sweep passes per second (default: 10)
    /// - `SWEEP_MIN_SAMPLES` - Minimum entries examined per pass (default: 50)
    /// - `SWEEP_FULL_CYCLE_SECS` - Worst-case full sweep time (default: 10)
    /// - `SWEEP_PROMOTE_INSPECTED` - Promote inspected live entries (default: false)
    pub fn from_env() -> Self {
        let defaults = SweepConfig::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", 0),
            sweep: SweepConfig {
                hz: env_or("SWEEP_HZ", defaults.hz),
                min_samples: env_or("SWEEP_MIN_SAMPLES", defaults.min_samples),
                full_cycle: Duration::from_secs(env_or(
                    "SWEEP_FULL_CYCLE_SECS",
                    defaults.full_cycle.as_secs(),
                )),
                promote_inspected: env_or("SWEEP_PROMOTE_INSPECTED", defaults.promote_inspected),
            },
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.max_entries, 0);
        assert_eq!(config.sweep.hz, 10);
        assert_eq!(config.sweep.min_samples, 50);
        assert_eq!(config.sweep.full_cycle, Duration::from_secs(10));
        assert!(!config.sweep.promote_inspected);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("MAX_ENTRIES");
        env::remove_var("SWEEP_HZ");
        env::remove_var("SWEEP_MIN_SAMPLES");
        env::remove_var("SWEEP_FULL_CYCLE_SECS");
        env::remove_var("SWEEP_PROMOTE_INSPECTED");

        assert_eq!(CacheConfig::from_env(), CacheConfig::default());
    }

    #[test]
    fn test_sweep_interval() {
        assert_eq!(SweepConfig::default().interval(), Duration::from_millis(100));

        let zero = SweepConfig {
            hz: 0,
            ..SweepConfig::default()
        };
        assert_eq!(zero.interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_sweep_interval_clamped_for_huge_hz() {
        let sweep = SweepConfig {
            hz: 2_000_000_000,
            ..SweepConfig::default()
        };
        assert_eq!(sweep.interval(), MIN_SWEEP_INTERVAL);

        let fast = SweepConfig {
            hz: 5_000,
            ..SweepConfig::default()
        };
        assert_eq!(fast.interval(), MIN_SWEEP_INTERVAL);
    }

    #[test]
    fn test_samples_with_extreme_full_cycle() {
        let sweep = SweepConfig {
            hz: 16,
            full_cycle: Duration::from_secs(1 << 60),
            ..SweepConfig::default()
        };
        // Pass count overflows usize; falls back to the floor
        assert_eq!(sweep.samples_for(10), 10);
        assert_eq!(sweep.samples_for(1_000_000), 50);
    }

    #[test]
    fn test_samples_small_cache_swept_in_full() {
        let sweep = SweepConfig::default();
        assert_eq!(sweep.samples_for(0), 0);
        assert_eq!(sweep.samples_for(7), 7);
        assert_eq!(sweep.samples_for(49), 49);
    }

    #[test]
    fn test_samples_floor_applies() {
        let sweep = SweepConfig::default();
        assert_eq!(sweep.samples_for(50), 50);
        assert_eq!(sweep.samples_for(4_999), 50);
    }

    #[test]
    fn test_samples_large_cache_spread_over_cycle() {
        let sweep = SweepConfig::default();
        // 100 passes per 10s cycle at 10 Hz
        assert_eq!(sweep.samples_for(10_000), 100);
        assert_eq!(sweep.samples_for(1_000_000), 10_000);
    }
}
