//! Stride Engine Core
//!
//! Contains the deterministic micro-simulation primitives:
//! - Virtual clock (timers, cooldowns, scheduled events)
//! - Point-mass physics integration
//! - AABB collision detection and resolution
//!
//! All three engines are independent; an embedding scenario wires them
//! together once per tick (see `stride_scenario`). Every value returned
//! from the public surface is quantized to 0.01 so golden tests can
//! assert exact sequences across platforms.

pub mod clock;
pub mod collision;
pub mod math;
pub mod ordered;
pub mod physics;

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
