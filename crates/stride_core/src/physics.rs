//! Point-mass physics integration
//!
//! Semi-implicit Euler over a set of independent bodies: gravity goes into
//! velocity first, linear damping scales the new velocity, and position
//! integrates from the damped velocity. The order is fixed; changing it
//! changes every golden fixture downstream.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::round2_vec;
use crate::ordered::OrderedMap;

/// Point mass owned by a [`PhysicsEngine`].
///
/// `gravity` and `friction` override the engine defaults when present.
/// A body is associated with a collision shape only by sharing an id;
/// nothing keeps the two in sync besides the embedding scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: String,
    pub position: DVec2,
    pub velocity: DVec2,
    pub mass: f64,
    #[serde(default)]
    pub gravity: Option<DVec2>,
    #[serde(default)]
    pub friction: Option<f64>,
}

/// Bulk state for [`PhysicsEngine::load`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhysicsWorld {
    #[serde(default)]
    pub bodies: Vec<Body>,
    #[serde(default)]
    pub default_gravity: Option<DVec2>,
    #[serde(default)]
    pub default_friction: Option<f64>,
}

/// Per-body motion state as reported after a step, rounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyMotion {
    pub id: String,
    pub position: DVec2,
    pub velocity: DVec2,
}

/// Result of one `step`, bodies in insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub dt: f64,
    pub updated: Vec<BodyMotion>,
}

/// Errors that can occur while mutating the body set.
#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("body '{id}' already exists")]
    DuplicateBody { id: String },
}

/// Integrates every registered body once per `step(dt)` call.
///
/// State is exclusively owned here; `step` is a pure function of the
/// current body set and `dt`, with no cross-tick memory.
#[derive(Debug, Clone)]
pub struct PhysicsEngine {
    bodies: OrderedMap<Body>,
    default_gravity: DVec2,
    default_friction: f64,
}

impl PhysicsEngine {
    pub fn new() -> Self {
        Self {
            bodies: OrderedMap::new(),
            default_gravity: DVec2::ZERO,
            default_friction: 0.0,
        }
    }

    /// Replace the entire body set and the world defaults.
    pub fn load(&mut self, world: PhysicsWorld) {
        self.bodies.clear();
        self.default_gravity = world.default_gravity.unwrap_or(DVec2::ZERO);
        self.default_friction = world.default_friction.unwrap_or(0.0);
        for body in world.bodies {
            self.bodies.insert(body.id.clone(), body);
        }
    }

    /// Insert a new body. The one typed failure in the core: an id that is
    /// already taken.
    pub fn create(&mut self, body: Body) -> Result<Body, PhysicsError> {
        if self.bodies.contains(&body.id) {
            return Err(PhysicsError::DuplicateBody { id: body.id });
        }
        self.bodies.insert(body.id.clone(), body.clone());
        Ok(body)
    }

    /// Integrate every body by `dt`. Stored state stays unrounded so
    /// quantization error never compounds across ticks; the report rounds.
    pub fn step(&mut self, dt: f64) -> StepReport {
        let mut updated = Vec::with_capacity(self.bodies.len());
        for id in self.bodies.ids().to_vec() {
            let Some(body) = self.bodies.get_mut(&id) else {
                continue;
            };
            let gravity = body.gravity.unwrap_or(self.default_gravity);
            let friction = body.friction.unwrap_or(self.default_friction);

            let mut velocity = body.velocity + gravity * dt;
            let damping = (1.0 - friction * dt).max(0.0);
            velocity *= damping;
            let position = body.position + velocity * dt;

            body.velocity = velocity;
            body.position = position;
            updated.push(BodyMotion {
                id,
                position: round2_vec(position),
                velocity: round2_vec(velocity),
            });
        }
        StepReport { dt, updated }
    }

    /// Rounded snapshot of a body. Unknown ids are `None`, not an error.
    pub fn dump(&self, id: &str) -> Option<Body> {
        self.bodies.get(id).map(|body| Body {
            position: round2_vec(body.position),
            velocity: round2_vec(body.velocity),
            ..body.clone()
        })
    }

    /// Direct mutable access, the write-back hook for collision resolution.
    /// Soft contract like `dump`: unknown ids return `None`.
    pub fn body_mut(&mut self, id: &str) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    /// Body ids in creation order.
    pub fn list(&self) -> Vec<String> {
        self.bodies.ids().to_vec()
    }
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(id: &str, position: DVec2) -> Body {
        Body {
            id: id.to_string(),
            position,
            velocity: DVec2::ZERO,
            mass: 1.0,
            gravity: None,
            friction: None,
        }
    }

    fn falling_world() -> PhysicsWorld {
        PhysicsWorld {
            bodies: vec![body("b1", DVec2::new(0.0, -1.5))],
            default_gravity: Some(DVec2::new(0.0, 9.81)),
            default_friction: Some(0.0),
        }
    }

    #[test]
    fn gravity_enters_velocity_before_position() {
        let mut engine = PhysicsEngine::new();
        engine.load(falling_world());

        let report = engine.step(0.1);
        assert_eq!(report.updated.len(), 1);
        assert_eq!(report.updated[0].velocity, DVec2::new(0.0, 0.98));
        assert_eq!(report.updated[0].position, DVec2::new(0.0, -1.4));
    }

    #[test]
    fn stored_state_stays_unrounded_between_steps() {
        let mut engine = PhysicsEngine::new();
        engine.load(falling_world());

        engine.step(0.1);
        let report = engine.step(0.1);
        // -1.4019 + 1.962 * 0.1 = -1.2057; integrating from the rounded
        // -1.4 would land on -1.2 instead.
        assert_eq!(report.updated[0].position, DVec2::new(0.0, -1.21));
        assert_eq!(report.updated[0].velocity, DVec2::new(0.0, 1.96));
    }

    #[test]
    fn zero_force_body_is_invariant_under_stepping() {
        let mut engine = PhysicsEngine::new();
        engine.load(PhysicsWorld {
            bodies: vec![body("still", DVec2::new(3.25, -7.5))],
            default_gravity: None,
            default_friction: None,
        });

        for _ in 0..50 {
            engine.step(0.1);
        }
        let dumped = engine.dump("still").unwrap();
        assert_eq!(dumped.position, DVec2::new(3.25, -7.5));
        assert_eq!(dumped.velocity, DVec2::ZERO);
    }

    #[test]
    fn per_body_overrides_beat_world_defaults() {
        let mut engine = PhysicsEngine::new();
        engine.load(PhysicsWorld {
            bodies: vec![
                Body {
                    gravity: Some(DVec2::ZERO),
                    friction: Some(0.0),
                    ..body("floaty", DVec2::ZERO)
                },
                body("faller", DVec2::ZERO),
            ],
            default_gravity: Some(DVec2::new(0.0, 9.81)),
            default_friction: Some(0.5),
        });

        engine.step(0.1);
        assert_eq!(engine.dump("floaty").unwrap().velocity, DVec2::ZERO);
        assert_ne!(engine.dump("faller").unwrap().velocity, DVec2::ZERO);
    }

    #[test]
    fn damping_scale_clamps_at_zero() {
        let mut engine = PhysicsEngine::new();
        engine.load(PhysicsWorld {
            bodies: vec![Body {
                velocity: DVec2::new(4.0, -2.0),
                friction: Some(20.0),
                ..body("sticky", DVec2::new(1.0, 1.0))
            }],
            default_gravity: None,
            default_friction: None,
        });

        let report = engine.step(0.1);
        assert_eq!(report.updated[0].velocity, DVec2::ZERO);
        assert_eq!(report.updated[0].position, DVec2::new(1.0, 1.0));
    }

    #[test]
    fn duplicate_create_is_a_typed_failure() {
        let mut engine = PhysicsEngine::new();
        engine.create(body("b1", DVec2::ZERO)).unwrap();

        let err = engine.create(body("b1", DVec2::ONE)).unwrap_err();
        assert_eq!(err.to_string(), "body 'b1' already exists");
        // First body untouched.
        assert_eq!(engine.dump("b1").unwrap().position, DVec2::ZERO);
    }

    #[test]
    fn dump_of_unknown_id_is_none() {
        let engine = PhysicsEngine::new();
        assert!(engine.dump("ghost").is_none());
    }

    #[test]
    fn load_replaces_previous_world() {
        let mut engine = PhysicsEngine::new();
        engine.create(body("old", DVec2::ZERO)).unwrap();
        engine.load(PhysicsWorld {
            bodies: vec![body("new", DVec2::ZERO)],
            ..PhysicsWorld::default()
        });

        assert_eq!(engine.list(), ["new"]);
        assert!(engine.dump("old").is_none());
    }

    #[test]
    fn step_reports_bodies_in_creation_order() {
        let mut engine = PhysicsEngine::new();
        engine.create(body("z", DVec2::ZERO)).unwrap();
        engine.create(body("a", DVec2::ZERO)).unwrap();
        engine.create(body("m", DVec2::ZERO)).unwrap();

        let report = engine.step(0.1);
        let ids: Vec<&str> = report.updated.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }
}
