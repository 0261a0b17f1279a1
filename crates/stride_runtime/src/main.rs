//! Stride Engine Runtime
//!
//! Minimal binary that wires the simulation core into the falling-block
//! scenario and reports the per-tick timeline plus wall-clock timings.

use anyhow::Result;
use stride_metrics::TickTimer;
use stride_scenario::falling_block::{FallingBlock, FallingBlockConfig};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Stride Engine v{}", stride_core::VERSION);

    // Scenario config may come from a JSON file passed as the first
    // argument; anything fancier belongs to an embedding CLI, not here.
    let config: FallingBlockConfig = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => FallingBlockConfig::default(),
    };

    let mut timer = TickTimer::new(64);
    let mut scenario = FallingBlock::new(config);
    while !scenario.finished() {
        timer.begin();
        let sample = scenario.tick();
        timer.end();
        tracing::info!(
            t = sample.t,
            x = sample.position.x,
            y = sample.position.y,
            collided = sample.collided,
            "tick"
        );
    }

    tracing::info!(
        avg_tick_ms = timer.tick_time_ms(),
        ticks_per_second = timer.ticks_per_second(),
        "scenario complete"
    );
    Ok(())
}
