//! Stride Scenario Layer
//!
//! Embedding-side composition of the core engines: the canonical per-tick
//! protocol (`step::Simulation`) and the demo scenarios built on top of it.
//! Logging lives here, not in the core.

pub mod falling_block;
pub mod step;
