//! AABB collision detection and resolution
//!
//! Independent axis-aligned boxes, pairwise overlap in insertion order,
//! and a single-pass minimal-axis separation. The engine never touches
//! physics state; the embedding scenario copies resolved geometry back
//! into bodies if it wants the separation to stick.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::math::round2_vec;
use crate::ordered::OrderedMap;

/// Axis-aligned box owned by a [`CollisionEngine`].
///
/// Invariant (caller-maintained): `min.x <= max.x` and `min.y <= max.y`.
/// Trigger boxes report overlap but are never separated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub id: String,
    pub min: DVec2,
    pub max: DVec2,
    #[serde(default)]
    pub is_trigger: bool,
}

/// Blocking overlap between two boxes, with the rounded per-axis
/// penetration depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collision {
    pub a: String,
    pub b: String,
    pub overlap: DVec2,
}

/// Overlap involving at least one trigger box; no resolution implied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trigger {
    pub a: String,
    pub b: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub collisions: Vec<Collision>,
    pub triggers: Vec<Trigger>,
}

/// New geometry of a box moved by `resolve`, rounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedBox {
    pub id: String,
    pub min: DVec2,
    pub max: DVec2,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveReport {
    pub resolved: Vec<ResolvedBox>,
    pub collisions: Vec<Collision>,
}

/// Tracks a set of independent AABBs keyed by id.
#[derive(Debug, Clone, Default)]
pub struct CollisionEngine {
    boxes: OrderedMap<Aabb>,
}

impl CollisionEngine {
    pub fn new() -> Self {
        Self {
            boxes: OrderedMap::new(),
        }
    }

    /// Replace the entire box set (scenario initialization).
    pub fn load(&mut self, boxes: Vec<Aabb>) {
        self.boxes.clear();
        for aabb in boxes {
            self.boxes.insert(aabb.id.clone(), aabb);
        }
    }

    /// Insert or replace a box by id. A replaced box keeps its position in
    /// the pairwise enumeration, so mirroring a moving body every tick does
    /// not reshuffle pair order.
    pub fn upsert(&mut self, aabb: Aabb) {
        self.boxes.insert(aabb.id.clone(), aabb);
    }

    /// Classify every overlapping unordered pair (`i < j` in insertion
    /// order): pairs touching a trigger box report as triggers, the rest as
    /// blocking collisions with the rounded overlap vector.
    pub fn check(&self) -> CheckReport {
        let boxes: Vec<&Aabb> = self.boxes.iter().map(|(_, aabb)| aabb).collect();
        let mut collisions = Vec::new();
        let mut triggers = Vec::new();
        for i in 0..boxes.len() {
            for j in (i + 1)..boxes.len() {
                let a = boxes[i];
                let b = boxes[j];
                let Some(overlap) = overlap_of(a, b) else {
                    continue;
                };
                if a.is_trigger || b.is_trigger {
                    triggers.push(Trigger {
                        a: a.id.clone(),
                        b: b.id.clone(),
                    });
                } else {
                    collisions.push(Collision {
                        a: a.id.clone(),
                        b: b.id.clone(),
                        overlap,
                    });
                }
            }
        }
        CheckReport {
            collisions,
            triggers,
        }
    }

    /// Separate every blocking pair found by a fresh `check`.
    ///
    /// Only the second box of each pair moves, along the axis of smaller
    /// overlap (ties go to y), away from the first box's center. The
    /// displacement magnitude is the rounded overlap from the check, which
    /// is what lets resting contact settle on a stable fixed point.
    /// Separations apply sequentially, so earlier pairs shift the centers
    /// later pairs compare against.
    pub fn resolve(&mut self) -> ResolveReport {
        let collisions = self.check().collisions;
        let mut resolved = Vec::with_capacity(collisions.len());
        for contact in &collisions {
            let Some(a) = self.boxes.get(&contact.a) else {
                continue;
            };
            let Some(b) = self.boxes.get(&contact.b) else {
                continue;
            };
            let a_center = center(a);
            let b_center = center(b);
            let shift = if contact.overlap.x < contact.overlap.y {
                let sign = if b_center.x >= a_center.x { 1.0 } else { -1.0 };
                DVec2::new(contact.overlap.x * sign, 0.0)
            } else {
                let sign = if b_center.y >= a_center.y { 1.0 } else { -1.0 };
                DVec2::new(0.0, contact.overlap.y * sign)
            };

            let Some(moved) = self.boxes.get_mut(&contact.b) else {
                continue;
            };
            moved.min += shift;
            moved.max += shift;
            resolved.push(ResolvedBox {
                id: moved.id.clone(),
                min: round2_vec(moved.min),
                max: round2_vec(moved.max),
            });
        }
        ResolveReport {
            resolved,
            collisions,
        }
    }

    /// Rounded snapshot of a box; `None` for unknown ids.
    pub fn dump(&self, id: &str) -> Option<Aabb> {
        self.boxes.get(id).map(|aabb| Aabb {
            min: round2_vec(aabb.min),
            max: round2_vec(aabb.max),
            ..aabb.clone()
        })
    }

    /// Box ids in insertion order.
    pub fn list(&self) -> Vec<String> {
        self.boxes.ids().to_vec()
    }
}

fn center(aabb: &Aabb) -> DVec2 {
    (aabb.min + aabb.max) * 0.5
}

/// Per-axis penetration depth, rounded, or `None` when the raw overlap is
/// not strictly positive on both axes (edge contact does not collide).
fn overlap_of(a: &Aabb, b: &Aabb) -> Option<DVec2> {
    let ox = a.max.x.min(b.max.x) - a.min.x.max(b.min.x);
    let oy = a.max.y.min(b.max.y) - a.min.y.max(b.min.y);
    if ox > 0.0 && oy > 0.0 {
        Some(round2_vec(DVec2::new(ox, oy)))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aabb(id: &str, min: (f64, f64), max: (f64, f64)) -> Aabb {
        Aabb {
            id: id.to_string(),
            min: DVec2::new(min.0, min.1),
            max: DVec2::new(max.0, max.1),
            is_trigger: false,
        }
    }

    #[test]
    fn overlapping_pair_reports_componentwise_depth() {
        let mut engine = CollisionEngine::new();
        engine.upsert(aabb("a", (0.0, 0.0), (2.0, 2.0)));
        engine.upsert(aabb("b", (1.0, 0.0), (3.0, 2.0)));

        let report = engine.check();
        assert!(report.triggers.is_empty());
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].a, "a");
        assert_eq!(report.collisions[0].b, "b");
        assert_eq!(report.collisions[0].overlap, DVec2::new(1.0, 2.0));
    }

    #[test]
    fn overlap_magnitude_is_symmetric() {
        let mut forward = CollisionEngine::new();
        forward.upsert(aabb("a", (0.0, 0.0), (2.0, 2.0)));
        forward.upsert(aabb("b", (1.0, 0.5), (3.0, 1.75)));

        let mut reversed = CollisionEngine::new();
        reversed.upsert(aabb("b", (1.0, 0.5), (3.0, 1.75)));
        reversed.upsert(aabb("a", (0.0, 0.0), (2.0, 2.0)));

        let lhs = forward.check().collisions;
        let rhs = reversed.check().collisions;
        assert_eq!(lhs[0].overlap, rhs[0].overlap);
        // Only the pair order flips with enumeration order.
        assert_eq!(lhs[0].a, rhs[0].b);
    }

    #[test]
    fn edge_contact_is_not_a_collision() {
        let mut engine = CollisionEngine::new();
        engine.upsert(aabb("a", (0.0, 0.0), (2.0, 2.0)));
        engine.upsert(aabb("b", (2.0, 0.0), (4.0, 2.0)));

        let report = engine.check();
        assert!(report.collisions.is_empty());
        assert!(report.triggers.is_empty());
    }

    #[test]
    fn trigger_pairs_report_without_resolution() {
        let mut engine = CollisionEngine::new();
        engine.upsert(aabb("zone", (0.0, 0.0), (2.0, 2.0)));
        engine.upsert(Aabb {
            is_trigger: true,
            ..aabb("sensor", (1.0, 0.0), (3.0, 2.0))
        });

        let report = engine.check();
        assert!(report.collisions.is_empty());
        assert_eq!(
            report.triggers,
            [Trigger {
                a: "zone".to_string(),
                b: "sensor".to_string()
            }]
        );

        let resolve = engine.resolve();
        assert!(resolve.resolved.is_empty());
        assert_eq!(engine.dump("sensor").unwrap().min, DVec2::new(1.0, 0.0));
    }

    #[test]
    fn separation_takes_the_smaller_axis() {
        let mut engine = CollisionEngine::new();
        engine.upsert(aabb("a", (0.0, 0.0), (2.0, 2.0)));
        engine.upsert(aabb("b", (1.0, 0.0), (3.0, 2.0)));

        // ox=1 < oy=2, b's center is to the right: push along +x.
        let report = engine.resolve();
        assert_eq!(
            report.resolved,
            [ResolvedBox {
                id: "b".to_string(),
                min: DVec2::new(2.0, 0.0),
                max: DVec2::new(4.0, 2.0),
            }]
        );
        // The first box of the pair never moves.
        assert_eq!(engine.dump("a").unwrap().max, DVec2::new(2.0, 2.0));
    }

    #[test]
    fn equal_overlap_resolves_along_y() {
        let mut engine = CollisionEngine::new();
        engine.upsert(aabb("a", (0.0, 0.0), (2.0, 2.0)));
        engine.upsert(aabb("b", (1.0, 1.0), (3.0, 3.0)));

        let report = engine.resolve();
        assert_eq!(report.resolved[0].min, DVec2::new(1.0, 2.0));
        assert_eq!(report.resolved[0].max, DVec2::new(3.0, 4.0));
    }

    #[test]
    fn push_direction_follows_center_comparison() {
        let mut engine = CollisionEngine::new();
        engine.upsert(aabb("a", (0.0, 0.0), (2.0, 2.0)));
        engine.upsert(aabb("b", (-1.5, 0.0), (0.5, 2.0)));

        // b's center sits left of a's: push along -x by the overlap (0.5).
        let report = engine.resolve();
        assert_eq!(report.resolved[0].min, DVec2::new(-2.0, 0.0));
        assert_eq!(report.resolved[0].max, DVec2::new(0.0, 2.0));
    }

    #[test]
    fn resolution_clears_the_pair_on_recheck() {
        let mut engine = CollisionEngine::new();
        engine.upsert(aabb("a", (0.0, 0.0), (2.0, 2.0)));
        engine.upsert(aabb("b", (1.0, 0.0), (3.0, 2.0)));

        engine.resolve();
        assert!(engine.check().collisions.is_empty());
    }

    #[test]
    fn upsert_replaces_geometry_in_place() {
        let mut engine = CollisionEngine::new();
        engine.upsert(aabb("a", (0.0, 0.0), (1.0, 1.0)));
        engine.upsert(aabb("b", (5.0, 5.0), (6.0, 6.0)));
        engine.upsert(aabb("a", (10.0, 10.0), (11.0, 11.0)));

        assert_eq!(engine.list(), ["a", "b"]);
        assert_eq!(engine.dump("a").unwrap().min, DVec2::new(10.0, 10.0));
    }

    #[test]
    fn dump_of_unknown_id_is_none() {
        let engine = CollisionEngine::new();
        assert!(engine.dump("ghost").is_none());
    }

    #[test]
    fn load_replaces_previous_boxes() {
        let mut engine = CollisionEngine::new();
        engine.upsert(aabb("old", (0.0, 0.0), (1.0, 1.0)));
        engine.load(vec![aabb("new", (0.0, 0.0), (1.0, 1.0))]);
        assert_eq!(engine.list(), ["new"]);
    }
}
