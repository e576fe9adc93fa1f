//! Jittered boundary lines between biomes
//!
//! A boundary runs through fixed anchors on the tile perimeter (and
//! sometimes the tile center). Between anchors the line is bent by midpoint
//! displacement, then rasterized into a connected pixel path.

use rand::Rng;

use crate::geometry::{generate_line, midpoint_displacement, Point};

/// Recursion levels of the midpoint displacement
pub const DISPLACEMENT_ITERATIONS: u32 = 2;
/// Displacement amplitude at the first level, relative to the segment length
pub const INITIAL_FACTOR: f32 = 0.5;
/// Amplitude multiplier applied at each following level
pub const REDUCTION_FACTOR: f32 = 0.6;

/// Build the pixel path of a boundary through `anchors` in a tile of side
/// `size`.
///
/// Displaced points that overshoot the tile are clamped onto its edge. The
/// result starts at the first anchor, ends at the last one (both clamped),
/// is 8-connected and has no consecutive duplicates.
pub fn make_line(size: usize, anchors: &[Point], rng: &mut impl Rng) -> Vec<Point> {
    assert!(anchors.len() >= 2, "a boundary needs at least two anchors");

    let max = size as i32 - 1;

    let mut polyline = Vec::new();

    for pair in anchors.windows(2) {
        let segment = midpoint_displacement(
            pair[0],
            pair[1],
            rng,
            DISPLACEMENT_ITERATIONS,
            INITIAL_FACTOR,
            REDUCTION_FACTOR,
        );
        polyline.extend_from_slice(&segment[..segment.len() - 1]);
    }

    polyline.push(anchors[anchors.len() - 1]);

    for point in polyline.iter_mut() {
        *point = point.clamp(0, max);
    }

    let mut line = Vec::new();

    for pair in polyline.windows(2) {
        line.extend(generate_line(pair[0], pair[1]));
    }

    line.push(polyline[polyline.len() - 1]);
    line.dedup();
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn assert_connected(line: &[Point]) {
        for pair in line.windows(2) {
            let d = pair[1] - pair[0];
            assert!(d.x.abs() <= 1 && d.y.abs() <= 1, "gap between {:?} and {:?}", pair[0], pair[1]);
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_line_joins_anchors() {
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let start = Point::new(16, 0);
            let stop = Point::new(16, 31);

            let line = make_line(32, &[start, stop], &mut rng);

            assert_eq!(line[0], start);
            assert_eq!(*line.last().unwrap(), stop);
            assert_connected(&line);
            assert!(line.iter().all(|p| (0..32).contains(&p.x) && (0..32).contains(&p.y)));
        }
    }

    #[test]
    fn test_line_through_center() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let anchors = [Point::new(16, 0), Point::new(16, 15), Point::new(31, 15)];

        let line = make_line(32, &anchors, &mut rng);

        assert!(line.contains(&Point::new(16, 15)));
        assert_connected(&line);
    }

    #[test]
    fn test_anchors_outside_are_clamped() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let line = make_line(16, &[Point::new(-3, 8), Point::new(20, 8)], &mut rng);

        assert_eq!(line[0], Point::new(0, 8));
        assert_eq!(*line.last().unwrap(), Point::new(15, 8));
    }

    #[test]
    fn test_same_seed_same_line() {
        let anchors = [Point::new(0, 7), Point::new(15, 7)];
        let a = make_line(16, &anchors, &mut ChaCha8Rng::seed_from_u64(8));
        let b = make_line(16, &anchors, &mut ChaCha8Rng::seed_from_u64(8));
        assert_eq!(a, b);
    }
}
