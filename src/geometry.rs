//! Integer geometry used to draw boundary lines inside a tile.

use std::ops::Sub;

use rand::Rng;

/// A pixel position. Signed so that offsets can push anchors past an edge
/// before they are clamped back into the tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Clamp both coordinates into `[min, max]`.
    pub fn clamp(self, min: i32, max: i32) -> Self {
        Self::new(self.x.clamp(min, max), self.y.clamp(min, max))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

pub fn manhattan_distance(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Rasterize the segment `p0 -> p1` with Bresenham's algorithm.
///
/// The start point is included and the end point is not, so consecutive
/// segments of a polyline can be concatenated without repeating joints.
/// Consecutive points of the result are 8-connected.
pub fn generate_line(p0: Point, p1: Point) -> Vec<Point> {
    let dx = (p1.x - p0.x).abs();
    let dy = -(p1.y - p0.y).abs();
    let sx = if p0.x < p1.x { 1 } else { -1 };
    let sy = if p0.y < p1.y { 1 } else { -1 };

    let mut result = Vec::with_capacity(dx.max(-dy) as usize + 1);
    let mut current = p0;
    let mut err = dx + dy;

    while current != p1 {
        result.push(current);

        let e2 = 2 * err;

        if e2 >= dy {
            err += dy;
            current.x += sx;
        }

        if e2 <= dx {
            err += dx;
            current.y += sy;
        }
    }

    result
}

/// Midpoint displacement between two points.
///
/// Returns `2^iterations + 1` points, starting at `p0` and ending at `p1`.
/// At each level every new midpoint is pushed along the perpendicular of its
/// parent sub-segment by a uniform draw in `[-factor, factor]`, then the factor
/// is multiplied by `reduction_factor`. Exactly `2^iterations - 1` draws are
/// consumed, in left-to-right order within a level.
pub fn midpoint_displacement(
    p0: Point,
    p1: Point,
    rng: &mut impl Rng,
    iterations: u32,
    initial_factor: f32,
    reduction_factor: f32,
) -> Vec<Point> {
    let size = 1usize << iterations;
    let mut points = vec![(0.0f32, 0.0f32); size + 1];
    points[0] = (p0.x as f32, p0.y as f32);
    points[size] = (p1.x as f32, p1.y as f32);

    let mut factor = initial_factor;
    let mut step = size / 2;

    while step > 0 {
        for i in (step..size).step_by(2 * step) {
            let prev = points[i - step];
            let next = points[i + step];

            let mid = ((prev.0 + next.0) / 2.0, (prev.1 + next.1) / 2.0);
            let normal = (prev.1 - next.1, next.0 - prev.0);
            let offset = rng.gen_range(-factor..=factor);

            points[i] = (mid.0 + offset * normal.0, mid.1 + offset * normal.1);
        }

        factor *= reduction_factor;
        step /= 2;
    }

    points
        .into_iter()
        .map(|(x, y)| Point::new(x.round() as i32, y.round() as i32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(manhattan_distance(Point::new(1, 2), Point::new(4, -2)), 7);
        assert_eq!(manhattan_distance(Point::new(3, 3), Point::new(3, 3)), 0);
    }

    #[test]
    fn test_line_excludes_end() {
        let line = generate_line(Point::new(0, 0), Point::new(4, 0));
        assert_eq!(line, vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0), Point::new(3, 0)]);

        assert!(generate_line(Point::new(2, 2), Point::new(2, 2)).is_empty());
    }

    #[test]
    fn test_line_is_connected() {
        let p0 = Point::new(9, 1);
        let p1 = Point::new(-3, 6);
        let mut line = generate_line(p0, p1);
        line.push(p1);

        assert_eq!(line[0], p0);
        for pair in line.windows(2) {
            let d = pair[1] - pair[0];
            assert!(d.x.abs() <= 1 && d.y.abs() <= 1, "gap between {:?} and {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_midpoint_displacement_keeps_endpoints() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let p0 = Point::new(0, 8);
        let p1 = Point::new(15, 8);

        let points = midpoint_displacement(p0, p1, &mut rng, 2, 0.5, 0.6);

        assert_eq!(points.len(), 5);
        assert_eq!(points[0], p0);
        assert_eq!(points[4], p1);
        assert_eq!(points[2].x, 8);
        assert!(points.iter().all(|p| (p.x - 7).abs() <= 8));
    }

    #[test]
    fn test_midpoint_displacement_is_deterministic() {
        let a = midpoint_displacement(Point::new(0, 0), Point::new(31, 31), &mut ChaCha8Rng::seed_from_u64(3), 2, 0.5, 0.6);
        let b = midpoint_displacement(Point::new(0, 0), Point::new(31, 31), &mut ChaCha8Rng::seed_from_u64(3), 2, 0.5, 0.6);
        assert_eq!(a, b);
    }
}
