//! Quadratic Bezier paths with humanized control points

use rand::Rng;

/// Smallest control-point spread, for short moves
const CONTROL_SPREAD_MIN: f64 = 30.0;
/// Largest control-point spread, for long moves
const CONTROL_SPREAD_MAX: f64 = 100.0;
/// Distance fraction that sizes the spread between the two bounds
const CONTROL_DISTANCE_DIVISOR: f64 = 6.0;

/// A transient screen coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(f64::from(x), f64::from(y))
    }
}

/// A quadratic Bezier curve between two screen points
///
/// Computed once per move, iterated once, discarded.
#[derive(Debug, Clone, Copy)]
pub struct BezierPath {
    start: Point,
    control: Point,
    end: Point,
    steps: usize,
}

impl BezierPath {
    /// Build a path with an explicit control point
    pub fn new(start: Point, control: Point, end: Point, steps: usize) -> Self {
        Self {
            start,
            control,
            end,
            steps,
        }
    }

    /// Build a path with a randomly offset control point
    ///
    /// The control point starts from one of the two endpoints (chosen
    /// at random) and is displaced by up to `clamp(distance/6, 30, 100)`
    /// pixels per axis, bounding curvature so both short and long moves
    /// arc plausibly.
    pub fn humanized(start: Point, end: Point, steps: usize, rng: &mut impl Rng) -> Self {
        let distance = start.distance(end);
        let spread = (distance / CONTROL_DISTANCE_DIVISOR)
            .clamp(CONTROL_SPREAD_MIN, CONTROL_SPREAD_MAX);

        let anchor = if rng.gen_bool(0.5) { start } else { end };
        let control = Point::new(
            anchor.x + rng.gen_range(-spread..=spread),
            anchor.y + rng.gen_range(-spread..=spread),
        );

        Self::new(start, control, end, steps)
    }

    /// Number of interpolation steps
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// End point of the path
    pub fn end(&self) -> Point {
        self.end
    }

    /// Point on the curve at parameter `t` in [0, 1]
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        Point::new(
            u * u * self.start.x + 2.0 * u * t * self.control.x + t * t * self.end.x,
            u * u * self.start.y + 2.0 * u * t * self.control.y + t * t * self.end.y,
        )
    }

    /// Iterate the curve points at t = i/steps for i in 0..steps
    ///
    /// Deliberately stops short of t = 1; the engine snaps to the exact
    /// target after the loop.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let steps = self.steps;
        (0..steps).map(move |i| self.point_at(i as f64 / steps as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_endpoints() {
        let path = BezierPath::new(
            Point::new(0.0, 0.0),
            Point::new(50.0, 10.0),
            Point::new(100.0, 100.0),
            20,
        );
        assert_eq!(path.point_at(0.0), Point::new(0.0, 0.0));
        assert_eq!(path.point_at(1.0), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_straight_control_gives_midpoint() {
        // Control point on the segment midpoint degenerates to a line
        let path = BezierPath::new(
            Point::new(0.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(100.0, 100.0),
            10,
        );
        let mid = path.point_at(0.5);
        assert!((mid.x - 50.0).abs() < 1e-9);
        assert!((mid.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_humanized_control_is_bounded() {
        let mut rng = StdRng::seed_from_u64(20);
        let start = Point::new(0.0, 0.0);
        let end = Point::new(1200.0, 0.0);

        for _ in 0..200 {
            let path = BezierPath::humanized(start, end, 50, &mut rng);
            // Offset from the nearer endpoint is capped at the max spread
            let from_start = (path.control.x - start.x)
                .abs()
                .max((path.control.y - start.y).abs());
            let from_end = (path.control.x - end.x)
                .abs()
                .max((path.control.y - end.y).abs());
            assert!(from_start.min(from_end) <= CONTROL_SPREAD_MAX + 1e-9);
        }
    }

    #[test]
    fn test_short_move_uses_minimum_spread() {
        let mut rng = StdRng::seed_from_u64(21);
        let start = Point::new(10.0, 10.0);
        let end = Point::new(14.0, 10.0);

        for _ in 0..200 {
            let path = BezierPath::humanized(start, end, 5, &mut rng);
            let from_start = (path.control.x - start.x)
                .abs()
                .max((path.control.y - start.y).abs());
            let from_end = (path.control.x - end.x)
                .abs()
                .max((path.control.y - end.y).abs());
            assert!(from_start.min(from_end) <= CONTROL_SPREAD_MIN + end.distance(start) + 1e-9);
        }
    }

    #[test]
    fn test_points_iterates_steps_and_stops_short() {
        let path = BezierPath::new(
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 10.0),
            4,
        );
        let pts: Vec<Point> = path.points().collect();
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[0], Point::new(0.0, 0.0));
        // Last iterated point is t = 3/4, not the end point
        assert!(pts[3].distance(path.end()) > 0.0);
    }
}
