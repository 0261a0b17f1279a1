//! Falling-block demo scenario
//!
//! A block drops under gravity onto a static platform, comes to rest, and
//! the scenario captures timeline samples at configured virtual times.
//! This is the reference embedding of the composition protocol, and the
//! source of the golden regression fixtures.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use stride_core::collision::Aabb;
use stride_core::math::round2;
use stride_core::physics::{Body, PhysicsWorld};

use crate::step::{ShapeBinding, Simulation};

const BLOCK: &str = "block";
const PLATFORM: &str = "platform";
const BLOCK_HALF: f64 = 0.25;

/// Scenario tunables, loadable from JSON. Missing fields fall back to
/// the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallingBlockConfig {
    /// Seconds per tick.
    pub dt: f64,
    /// Total simulated seconds.
    pub total: f64,
    /// Virtual times (rounded) at which to capture a timeline sample.
    pub capture_at: Vec<f64>,
}

impl Default for FallingBlockConfig {
    fn default() -> Self {
        Self {
            dt: 0.1,
            total: 1.0,
            capture_at: vec![0.0, 0.5, 1.0],
        }
    }
}

/// Block state captured at one point on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSample {
    pub t: f64,
    pub position: DVec2,
    pub velocity: DVec2,
    pub collided: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub timeline: Vec<TimelineSample>,
}

/// Falling-block scenario stepped one tick at a time.
pub struct FallingBlock {
    sim: Simulation,
    config: FallingBlockConfig,
    grounded: bool,
    rest_height: f64,
    t: f64,
}

impl FallingBlock {
    pub fn new(config: FallingBlockConfig) -> Self {
        let mut sim = Simulation::new();

        // Gravity points down-screen along +y; the block starts above the
        // platform and carries no horizontal motion.
        sim.physics_mut().load(PhysicsWorld {
            bodies: vec![Body {
                id: BLOCK.to_string(),
                position: DVec2::new(0.0, -1.5),
                velocity: DVec2::ZERO,
                mass: 1.0,
                gravity: None,
                friction: None,
            }],
            default_gravity: Some(DVec2::new(0.0, 9.81)),
            default_friction: Some(0.0),
        });

        // Static platform loads first so pairwise enumeration displaces
        // the block's box, not the platform.
        sim.collisions_mut().load(vec![Aabb {
            id: PLATFORM.to_string(),
            min: DVec2::new(-5.0, 0.0),
            max: DVec2::new(5.0, 0.5),
            is_trigger: false,
        }]);

        sim.bind_shape(ShapeBinding {
            body_id: BLOCK.to_string(),
            half_extent: DVec2::splat(BLOCK_HALF),
            is_trigger: false,
        });

        Self {
            sim,
            config,
            grounded: false,
            rest_height: 0.0,
            t: 0.0,
        }
    }

    /// Rounded virtual time after the last tick.
    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn finished(&self) -> bool {
        round2(self.t + self.config.dt) > round2(self.config.total + 1e-9)
    }

    /// Advance one tick and return the block's state afterwards.
    pub fn tick(&mut self) -> TimelineSample {
        let summary = self.sim.tick(self.config.dt);
        self.t = summary.time;

        let contacted = summary
            .collisions
            .iter()
            .any(|c| c.a == PLATFORM && c.b == BLOCK || c.a == BLOCK && c.b == PLATFORM);

        if summary.resolved.iter().any(|entry| entry.id == BLOCK) {
            if !self.grounded {
                debug!(t = self.t, "block grounded");
            }
            self.grounded = true;
            if let Some(body) = self.sim.physics().dump(BLOCK) {
                self.rest_height = body.position.y;
            }
        } else if self.grounded {
            // Resting policy, layered on top of the driver: hold the
            // contact height and cancel vertical motion until something
            // disturbs the block again.
            if let Some(body) = self.sim.physics_mut().body_mut(BLOCK) {
                body.position.y = self.rest_height;
                body.velocity.y = 0.0;
            }
        }

        self.sample(contacted)
    }

    fn sample(&self, collided: bool) -> TimelineSample {
        let body = self
            .sim
            .physics()
            .dump(BLOCK)
            .expect("scenario block missing from physics world");
        TimelineSample {
            t: self.t,
            position: body.position,
            velocity: body.velocity,
            collided,
        }
    }
}

/// Run the scenario to completion, capturing the configured timeline.
pub fn run(config: &FallingBlockConfig) -> ScenarioReport {
    let mut scenario = FallingBlock::new(config.clone());
    let capture_at: Vec<f64> = config.capture_at.iter().copied().map(round2).collect();

    let mut timeline = Vec::new();
    if capture_at.contains(&0.0) {
        timeline.push(scenario.sample(false));
    }
    if config.dt > 0.0 {
        while !scenario.finished() {
            let sample = scenario.tick();
            if capture_at.contains(&sample.t) {
                timeline.push(sample);
            }
        }
    }
    ScenarioReport {
        name: "falling-block",
        timeline,
    }
}
