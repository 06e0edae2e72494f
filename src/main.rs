//! ttl_lru demo - drives a synthetic workload against the cache
//!
//! Builds a cache from environment configuration, runs a mixed read/write
//! workload with a share of expiring keys, then prints a JSON stats report.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use tokio::signal;
use tracing::{info, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_lru::{Cache, CacheConfig, CacheStats};

/// Distinct keys touched by the workload
const KEY_SPACE: u64 = 4096;

/// Final report printed on exit.
#[derive(Debug, Serialize)]
struct StatsReport {
    timestamp: String,
    max_entries: usize,
    live_entries: usize,
    hit_rate: f64,
    stats: CacheStats,
}

/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache (starts the expiration sweeper)
/// 4. Run the workload until `DEMO_DURATION_SECS` elapses or Ctrl+C
/// 5. Stop the sweeper and print the stats report
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = CacheConfig::from_env();
    if config.max_entries == 0 {
        config.max_entries = 1024;
    }
    let duration = Duration::from_secs(
        env::var("DEMO_DURATION_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5),
    );
    info!(
        "Configuration loaded: max_entries={}, sweep_hz={}, promote_inspected={}, duration={:?}",
        config.max_entries, config.sweep.hz, config.sweep.promote_inspected, duration
    );

    let cache: Arc<Cache<String, u64>> =
        Arc::new(Cache::from_config(&config).context("failed to create cache")?);
    cache.set_eviction_listener(|key, _, cause| trace!(%key, %cause, "Entry removed"))?;

    let workload = tokio::spawn(run_workload(Arc::clone(&cache)));

    tokio::select! {
        _ = tokio::time::sleep(duration) => {
            info!("Workload finished");
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, stopping workload...");
        }
    }

    workload.abort();
    cache.shutdown();

    let stats = cache.stats();
    let report = StatsReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        max_entries: cache.max_entries(),
        live_entries: cache.len(),
        hit_rate: stats.hit_rate(),
        stats,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// Mixed workload: one read per two writes, half of the writes expiring
/// after 1-3 seconds.
async fn run_workload(cache: Arc<Cache<String, u64>>) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_millis(1));
    let mut op: u64 = 0;

    loop {
        ticker.tick().await;

        for _ in 0..16 {
            op += 1;
            let key = format!("key{}", op.wrapping_mul(7919) % KEY_SPACE);
            match op % 3 {
                0 => cache.set_ex(key, op, (op / 3 % 3 + 1) as i64)?,
                1 => cache.set(key, op)?,
                _ => {
                    cache.get(&key);
                }
            }
        }

        if op % 16_000 == 0 {
            let stats = cache.stats();
            info!(
                ops = op,
                entries = stats.total_entries,
                evictions = stats.evictions,
                expirations = stats.expirations,
                "Workload progress"
            );
        }
    }
}
