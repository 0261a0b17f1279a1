//! Deterministic virtual clock
//!
//! Advances a monotonic simulation time and fires timers, cooldowns, and
//! one-shot scheduled events. Wall-clock time never enters here; the clock
//! only moves through explicit `tick(dt)` calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::math::round2;
use crate::ordered::OrderedMap;

/// Countdown that fires when its remaining time is exhausted.
///
/// Non-repeating timers are dropped from the active set when they fire;
/// repeating timers re-arm to their full duration (the overshoot past zero
/// is not credited to the next cycle).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timer {
    pub id: String,
    pub duration: f64,
    pub remaining: f64,
    #[serde(default)]
    pub repeat: bool,
}

/// Countdown that clamps at zero and stays registered.
///
/// Once `remaining` hits zero the cooldown reports as fired on every
/// subsequent tick until it is cancelled or re-added; nothing in the clock
/// resets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cooldown {
    pub id: String,
    pub duration: f64,
    pub remaining: f64,
}

/// One-shot event pinned to an absolute virtual time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduled {
    pub id: String,
    pub at: f64,
    #[serde(default)]
    pub payload: Option<Value>,
}

/// Identifier fired during a tick, tagged by the store it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Fired {
    Timer(String),
    Cooldown(String),
    Scheduled(String),
}

impl fmt::Display for Fired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fired::Timer(id) => write!(f, "timer:{id}"),
            Fired::Cooldown(id) => write!(f, "cooldown:{id}"),
            Fired::Scheduled(id) => write!(f, "scheduled:{id}"),
        }
    }
}

/// Result of one `tick`: the rounded virtual time and everything that fired,
/// in store order (timers, then cooldowns, then scheduled events).
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub dt: f64,
    pub time: f64,
    pub fired: Vec<Fired>,
}

/// Ids currently registered, per store.
#[derive(Debug, Clone, Serialize)]
pub struct ClockListing {
    pub timers: Vec<String>,
    pub cooldowns: Vec<String>,
    pub scheduled: Vec<String>,
}

/// Full state snapshot with observable values rounded.
#[derive(Debug, Clone, Serialize)]
pub struct ClockSnapshot {
    pub time: f64,
    pub timers: Vec<Timer>,
    pub cooldowns: Vec<Cooldown>,
    pub scheduled: Vec<Scheduled>,
}

/// Virtual time source for a single simulation instance.
#[derive(Debug, Clone)]
pub struct Clock {
    time: f64,
    timers: OrderedMap<Timer>,
    cooldowns: OrderedMap<Cooldown>,
    scheduled: Vec<Scheduled>,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            time: 0.0,
            timers: OrderedMap::new(),
            cooldowns: OrderedMap::new(),
            scheduled: Vec::new(),
        }
    }

    /// Current virtual time, unquantized. Reports round; this does not.
    pub fn now(&self) -> f64 {
        self.time
    }

    /// Register a timer. `remaining` is re-armed to the full duration no
    /// matter what the caller passed in.
    pub fn add_timer(&mut self, timer: Timer) {
        let armed = Timer {
            remaining: timer.duration,
            ..timer
        };
        self.timers.insert(armed.id.clone(), armed);
    }

    /// Register a cooldown, replacing any previous one under the same id.
    pub fn add_cooldown(&mut self, id: impl Into<String>, duration: f64) {
        let id = id.into();
        self.cooldowns.insert(
            id.clone(),
            Cooldown {
                id,
                duration,
                remaining: duration,
            },
        );
    }

    /// Schedule a one-shot event at an absolute virtual time.
    ///
    /// The store stays sorted ascending by `at`; the sort is stable, so
    /// events sharing a time fire in insertion order.
    pub fn schedule(&mut self, id: impl Into<String>, at: f64, payload: Option<Value>) {
        self.scheduled.push(Scheduled {
            id: id.into(),
            at,
            payload,
        });
        self.scheduled.sort_by(|a, b| a.at.total_cmp(&b.at));
    }

    /// Remove `id` from all three stores. Unknown ids are a silent no-op.
    pub fn cancel(&mut self, id: &str) {
        self.timers.remove(id);
        self.cooldowns.remove(id);
        self.scheduled.retain(|event| event.id != id);
    }

    /// Advance virtual time by `dt` (clamped at zero from below) and fire
    /// whatever came due.
    pub fn tick(&mut self, dt: f64) -> TickReport {
        self.time = (self.time + dt).max(0.0);
        let mut fired = Vec::new();

        for id in self.timers.ids().to_vec() {
            let Some(timer) = self.timers.get_mut(&id) else {
                continue;
            };
            timer.remaining -= dt;
            if timer.remaining <= 0.0 {
                fired.push(Fired::Timer(id.clone()));
                if timer.repeat {
                    timer.remaining = timer.duration;
                } else {
                    self.timers.remove(&id);
                }
            }
        }

        for id in self.cooldowns.ids().to_vec() {
            let Some(cooldown) = self.cooldowns.get_mut(&id) else {
                continue;
            };
            cooldown.remaining = (cooldown.remaining - dt).max(0.0);
            if cooldown.remaining == 0.0 {
                fired.push(Fired::Cooldown(id.clone()));
            }
        }

        // Due events pop from the sorted front; comparison uses the
        // unrounded time so quantization never delays a firing.
        while self
            .scheduled
            .first()
            .is_some_and(|event| event.at <= self.time)
        {
            let event = self.scheduled.remove(0);
            fired.push(Fired::Scheduled(event.id));
        }

        TickReport {
            dt,
            time: round2(self.time),
            fired,
        }
    }

    pub fn list(&self) -> ClockListing {
        ClockListing {
            timers: self.timers.ids().to_vec(),
            cooldowns: self.cooldowns.ids().to_vec(),
            scheduled: self.scheduled.iter().map(|event| event.id.clone()).collect(),
        }
    }

    pub fn dump(&self) -> ClockSnapshot {
        ClockSnapshot {
            time: round2(self.time),
            timers: self
                .timers
                .iter()
                .map(|(_, timer)| Timer {
                    remaining: round2(timer.remaining),
                    ..timer.clone()
                })
                .collect(),
            cooldowns: self
                .cooldowns
                .iter()
                .map(|(_, cooldown)| Cooldown {
                    remaining: round2(cooldown.remaining),
                    ..cooldown.clone()
                })
                .collect(),
            scheduled: self.scheduled.clone(),
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
