//! Paths that particles travel along.

use serde::Serialize;

/// A point in SVG user space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn lerp(self, to: Point, t: f64) -> Point {
        Point {
            x: self.x + t * (to.x - self.x),
            y: self.y + t * (to.y - self.y),
        }
    }
}

/// A waypoint reached at a given share of the total progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waypoint {
    /// Progress value (0..=1) at which the particle sits on `point`
    pub at: f64,
    pub point: Point,
}

/// A polyline parameterised by progress.
///
/// Progress past 1.0 keeps moving along the last segment so particles can
/// fade out beyond the end of the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionPath {
    waypoints: Vec<Waypoint>,
}

impl MotionPath {
    /// A straight path from `from` to `to`.
    pub fn line(from: Point, to: Point) -> Self {
        Self::starting_at(from).then(to, 1.0)
    }

    /// Start a path; extend it with [`MotionPath::then`].
    pub fn starting_at(from: Point) -> Self {
        Self {
            waypoints: vec![Waypoint {
                at: 0.0,
                point: from,
            }],
        }
    }

    /// Add a waypoint reached when progress hits `at`.
    pub fn then(mut self, to: Point, at: f64) -> Self {
        self.waypoints.push(Waypoint { at, point: to });
        self
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Position for a progress value.
    pub fn point_at(&self, progress: f64) -> Point {
        let first = self.waypoints[0];
        if self.waypoints.len() == 1 || progress <= first.at {
            return first.point;
        }

        let last_segment = self.waypoints.len() - 2;
        let index = self
            .waypoints
            .windows(2)
            .position(|w| progress < w[1].at)
            .unwrap_or(last_segment);

        let start = self.waypoints[index];
        let end = self.waypoints[index + 1];
        let span = end.at - start.at;
        if span <= 0.0 {
            return end.point;
        }

        start.point.lerp(end.point, (progress - start.at) / span)
    }
}
