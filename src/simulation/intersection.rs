//! Authored intersection tables
//!
//! Intersections are fixed world coordinates with an enumerated set of exit
//! directions, each mapping to one or more candidate lane target
//! coordinates. There is no pathfinding; vehicles make a local routing
//! decision whenever they enter an intersection zone.

use anyhow::{bail, Result};

use super::types::{Direction, Position};

/// Distance in both axes within which a vehicle counts as "at" an
/// intersection and becomes eligible for a routing decision.
pub const INTERSECTION_THRESHOLD: f32 = 12.0;

/// Road topology at an intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionKind {
    Tee,
    Cross,
}

/// A single authored intersection
#[derive(Debug, Clone)]
pub struct Intersection {
    pub position: Position,
    pub kind: IntersectionKind,
    exits: Vec<(Direction, Vec<Position>)>,
}

impl Intersection {
    /// Build an intersection, validating that every listed exit direction
    /// carries at least one lane target.
    pub fn new(
        position: Position,
        kind: IntersectionKind,
        exits: Vec<(Direction, Vec<Position>)>,
    ) -> Result<Self> {
        for (direction, targets) in &exits {
            if targets.is_empty() {
                bail!(
                    "intersection at ({}, {}) lists exit {:?} with no lane targets",
                    position.x,
                    position.y,
                    direction
                );
            }
        }
        Ok(Self {
            position,
            kind,
            exits,
        })
    }

    /// Exit directions available from this intersection
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.exits.iter().map(|(direction, _)| *direction)
    }

    pub fn has_exit(&self, direction: Direction) -> bool {
        self.exits.iter().any(|(d, _)| *d == direction)
    }

    /// First listed lane target for an exit direction
    pub fn exit_target(&self, direction: Direction) -> Option<Position> {
        self.exits
            .iter()
            .find(|(d, _)| *d == direction)
            .and_then(|(_, targets)| targets.first().copied())
    }
}

/// Find the intersection whose zone contains the given coordinate.
///
/// Returns the index of the first intersection with axis-aligned distance
/// under [`INTERSECTION_THRESHOLD`] in both x and y. First match wins, so
/// authored intersections must be spaced at least twice the threshold
/// apart.
pub fn find_intersection(intersections: &[Intersection], x: f32, y: f32) -> Option<usize> {
    intersections.iter().position(|intersection| {
        let dx = (x - intersection.position.x).abs();
        let dy = (y - intersection.position.y).abs();
        dx < INTERSECTION_THRESHOLD && dy < INTERSECTION_THRESHOLD
    })
}
