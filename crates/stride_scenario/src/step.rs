//! Canonical per-tick composition of the three core engines
//!
//! The engines never reference each other; a tick only stays coherent if
//! the embedding runs the same fixed sequence every time: advance the
//! clock, integrate physics, mirror bodies into collision shapes, detect,
//! resolve, write the resolved axis back into the bodies. `Simulation` is
//! that sequence, packaged.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use stride_core::clock::{Clock, Fired};
use stride_core::collision::{Aabb, Collision, CollisionEngine, ResolvedBox, Trigger};
use stride_core::physics::PhysicsEngine;

/// Links a physics body to the collision shape mirrored from it every
/// tick. The shared id string is the only association between the two
/// engines; the driver re-derives the box from the body's rounded
/// position and this half-extent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeBinding {
    pub body_id: String,
    pub half_extent: DVec2,
    #[serde(default)]
    pub is_trigger: bool,
}

/// Everything observable from one tick of the composed simulation.
#[derive(Debug, Clone, Serialize)]
pub struct TickSummary {
    pub time: f64,
    pub fired: Vec<Fired>,
    pub collisions: Vec<Collision>,
    pub triggers: Vec<Trigger>,
    pub resolved: Vec<ResolvedBox>,
}

/// One clock, one physics engine, one collision engine, and the bindings
/// that keep them talking.
///
/// Static geometry goes straight into the collision engine (load it before
/// binding dynamic bodies so pairwise enumeration displaces the dynamic
/// box, not the scenery). Resting or grounding policies are scenario
/// logic and stay out of the driver.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    clock: Clock,
    physics: PhysicsEngine,
    collisions: CollisionEngine,
    bindings: Vec<ShapeBinding>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn physics(&self) -> &PhysicsEngine {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsEngine {
        &mut self.physics
    }

    pub fn collisions(&self) -> &CollisionEngine {
        &self.collisions
    }

    pub fn collisions_mut(&mut self) -> &mut CollisionEngine {
        &mut self.collisions
    }

    /// Register a body↔shape binding, replacing any existing one for the
    /// same body id.
    pub fn bind_shape(&mut self, binding: ShapeBinding) {
        match self
            .bindings
            .iter_mut()
            .find(|existing| existing.body_id == binding.body_id)
        {
            Some(existing) => *existing = binding,
            None => self.bindings.push(binding),
        }
    }

    /// Run one tick of the composition protocol.
    pub fn tick(&mut self, dt: f64) -> TickSummary {
        let clock_report = self.clock.tick(dt);
        self.physics.step(dt);

        // Mirror bound bodies into collision shapes from their rounded
        // positions, keeping the pre-resolve geometry for write-back.
        let mut synced: Vec<Aabb> = Vec::with_capacity(self.bindings.len());
        for binding in &self.bindings {
            let Some(body) = self.physics.dump(&binding.body_id) else {
                continue;
            };
            let shape = Aabb {
                id: binding.body_id.clone(),
                min: body.position - binding.half_extent,
                max: body.position + binding.half_extent,
                is_trigger: binding.is_trigger,
            };
            self.collisions.upsert(shape.clone());
            synced.push(shape);
        }

        let check = self.collisions.check();
        let mut resolved = Vec::new();
        let any_bound = check.collisions.iter().any(|collision| {
            synced
                .iter()
                .any(|shape| shape.id == collision.a || shape.id == collision.b)
        });
        if any_bound {
            let report = self.collisions.resolve();
            for entry in &report.resolved {
                let Some(before) = synced.iter().find(|shape| shape.id == entry.id) else {
                    continue;
                };
                let Some(body) = self.physics.body_mut(&entry.id) else {
                    continue;
                };
                // Only the axis the separation moved along is written
                // back: position from the resolved box center, velocity
                // zeroed.
                let center = (entry.min + entry.max) * 0.5;
                let moved = entry.min - before.min;
                if moved.x.abs() > moved.y.abs() {
                    body.position.x = center.x;
                    body.velocity.x = 0.0;
                } else {
                    body.position.y = center.y;
                    body.velocity.y = 0.0;
                }
                debug!(id = %entry.id, "resolved separation written back to body");
            }
            resolved = report.resolved;
        }

        TickSummary {
            time: clock_report.time,
            fired: clock_report.fired,
            collisions: check.collisions,
            triggers: check.triggers,
            resolved,
        }
    }
}
