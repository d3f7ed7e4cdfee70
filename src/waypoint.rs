use crate::geometry::Point;

/// A user-placed intermediate point of a segmented edge.
///
/// Waypoints live in graph space like node positions, so zooming moves them
/// around the focal point and recentering translates them. Edits go through
/// the dashboard, which owns the single change channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Waypoint {
    pub position: Point,
}

impl Waypoint {
    pub fn new(position: Point) -> Self {
        Self { position }
    }

    pub fn rescale(&mut self, focal: Point, old_factor: f32, new_factor: f32) {
        self.position = self.position.rescale_around(focal, old_factor, new_factor);
    }

    pub fn translate(&mut self, delta: Point) {
        self.position = self.position + delta;
    }
}

impl From<Point> for Waypoint {
    fn from(position: Point) -> Self {
        Self::new(position)
    }
}
