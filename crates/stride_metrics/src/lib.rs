//! Stride Metrics - wall-clock instrumentation for embedding layers
//!
//! The simulation core runs on virtual time only; anything measuring real
//! elapsed time lives here and is consumed by runtimes, never by
//! `stride_core`. Instrumentation vanishes in production builds via the
//! feature flag.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use stride_metrics::TickTimer;
//!
//! let mut timer = TickTimer::new(64); // Track the last 64 ticks
//! timer.begin();
//! // ... run one simulation tick ...
//! timer.end();
//! println!("avg tick: {:.3}ms", timer.tick_time_ms());
//! ```
//!
//! Without the `metrics` feature, all instrumentation compiles out to
//! zero-overhead stubs.

#[cfg(feature = "metrics")]
mod tick_timer;
#[cfg(feature = "metrics")]
mod window;

#[cfg(feature = "metrics")]
pub use tick_timer::TickTimer;
#[cfg(feature = "metrics")]
pub use window::RollingWindow;

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct TickTimer;

#[cfg(not(feature = "metrics"))]
impl TickTimer {
    pub fn new(_capacity: usize) -> Self {
        Self
    }
    pub fn begin(&mut self) {}
    pub fn end(&mut self) {}
    pub fn ticks_per_second(&self) -> f64 {
        0.0
    }
    pub fn tick_time_ms(&self) -> f64 {
        0.0
    }
    pub fn tick_time_range_ms(&self) -> (f64, f64) {
        (0.0, 0.0)
    }
}

#[cfg(not(feature = "metrics"))]
pub struct RollingWindow<T>(std::marker::PhantomData<T>);

#[cfg(not(feature = "metrics"))]
impl<T> RollingWindow<T> {
    pub fn new(_capacity: usize) -> Self {
        Self(std::marker::PhantomData)
    }
    pub fn push(&mut self, _sample: T) {}
    pub fn len(&self) -> usize {
        0
    }
    pub fn is_empty(&self) -> bool {
        true
    }
}
