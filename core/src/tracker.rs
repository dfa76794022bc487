use std::f32::consts::PI;
use std::time::{Duration, Instant};

/// Echo returns closer than this spawn a detection point.
pub const DETECTION_THRESHOLD: f32 = 80.0;

/// How long a detection point stays on the scope.
pub const POINT_TTL: Duration = Duration::from_millis(2000);

/// Transient marker for a simulated object return.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionPoint {
    pub id: u64,
    /// Normalized container coordinates; the display scales by its side
    /// length.
    pub x: f32,
    pub y: f32,
    pub created_at: Instant,
}

/// Owns the live detection points and their expiry.
///
/// Expiry is a deterministic sweep over owned state rather than a detached
/// timer per point, so dropping the tracker releases everything at once.
pub struct PointTracker {
    points: Vec<DetectionPoint>,
    next_id: u64,
}

impl PointTracker {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            next_id: 0,
        }
    }

    pub fn points(&self) -> &[DetectionPoint] {
        &self.points
    }

    /// Records an echo for the current angle. Returns the new point when the
    /// return is close enough to register.
    pub fn observe(
        &mut self,
        angle_deg: u16,
        distance: f32,
        now: Instant,
    ) -> Option<&DetectionPoint> {
        if distance >= DETECTION_THRESHOLD {
            return None;
        }
        let (x, y) = project(angle_deg, distance);
        let id = self.next_id;
        self.next_id += 1;
        self.points.push(DetectionPoint {
            id,
            x,
            y,
            created_at: now,
        });
        self.points.last()
    }

    /// Drops every point whose TTL has elapsed. Returns how many went.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.points.len();
        self.points
            .retain(|point| now.duration_since(point.created_at) < POINT_TTL);
        before - self.points.len()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl Default for PointTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps an (angle, distance) echo onto the unit square of the scope.
fn project(angle_deg: u16, distance: f32) -> (f32, f32) {
    let radians = (angle_deg as f32 - 90.0) * PI / 180.0;
    let reach = distance / 100.0;
    let x = 0.5 + reach * radians.cos() * 0.5;
    let y = 1.0 - reach * radians.sin() * 0.5;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_registers_only_below_the_threshold() {
        let mut tracker = PointTracker::new();
        let now = Instant::now();

        assert!(tracker.observe(45, 80.0, now).is_none());
        assert!(tracker.observe(45, 100.0, now).is_none());
        assert!(tracker.observe(45, 79.9, now).is_some());
        assert_eq!(tracker.points().len(), 1);
    }

    #[test]
    fn points_expire_at_exactly_the_ttl_and_never_before() {
        let mut tracker = PointTracker::new();
        let start = Instant::now();
        tracker.observe(10, 40.0, start);

        assert_eq!(tracker.expire(start + Duration::from_millis(1999)), 0);
        assert_eq!(tracker.points().len(), 1);

        assert_eq!(tracker.expire(start + POINT_TTL), 1);
        assert!(tracker.points().is_empty());
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut tracker = PointTracker::new();
        let start = Instant::now();

        let first = tracker.observe(0, 10.0, start).map(|p| p.id);
        let second = tracker.observe(1, 10.0, start).map(|p| p.id);
        assert_eq!(first, Some(0));
        assert_eq!(second, Some(1));

        tracker.expire(start + POINT_TTL);
        let third = tracker.observe(2, 10.0, start + POINT_TTL).map(|p| p.id);
        assert_eq!(third, Some(2));
    }

    #[test]
    fn projection_lands_on_the_unit_square_reference_points() {
        let mut tracker = PointTracker::new();
        let now = Instant::now();

        // Straight ahead at half range: x pushes right, y stays on the base.
        let point = tracker.observe(90, 50.0, now).copied().unwrap();
        assert!((point.x - 0.75).abs() < 1e-5);
        assert!((point.y - 1.0).abs() < 1e-5);

        // End of arc pulls the point up the center line.
        let point = tracker.observe(180, 50.0, now).copied().unwrap();
        assert!((point.x - 0.5).abs() < 1e-5);
        assert!((point.y - 0.75).abs() < 1e-5);
    }
}
