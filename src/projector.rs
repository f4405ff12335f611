//! Pure geometry mapping trait-impact scalars to radar/gauge coordinates.

use serde::{Deserialize, Serialize};

/// One radar axis: a trait label and its impact scalar in [0,1].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitImpact {
    pub label: String,
    pub impact: f64,
}

impl TraitImpact {
    pub fn new<S: Into<String>>(label: S, impact: f64) -> Self {
        Self {
            label: label.into(),
            impact,
        }
    }
}

/// A point in screen coordinates (y grows downward), relative to the
/// radar center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Angle of axis `i` out of `n`, in degrees. Starts at the top (-90°) and
/// proceeds clockwise in screen coordinates.
fn axis_angle(i: usize, n: usize) -> f64 {
    360.0 * (i as f64) / (n as f64) - 90.0
}

fn polar(angle_degrees: f64, distance: f64) -> Point {
    let t = angle_degrees * std::f64::consts::PI / 180.0;
    Point {
        x: distance * t.cos(),
        y: distance * t.sin(),
    }
}

/// Projects a trait-impact vector onto evenly spaced radar axes. Point
/// count equals input count and order is preserved; a single-trait vector
/// yields one point straight up.
pub fn project(vector: &[TraitImpact], radius: f64) -> Vec<Point> {
    let n = vector.len();
    vector
        .iter()
        .enumerate()
        .map(|(i, ti)| polar(axis_angle(i, n), ti.impact * radius))
        .collect()
}

/// Arc-length fraction for a gauge showing a single impact scalar.
/// Identity on [0,1]; out-of-range input is clamped, never an error.
pub fn gauge_arc(scalar: f64) -> f64 {
    scalar.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_four_axes_at_quarter_turns() {
        let vector = vec![
            TraitImpact::new("Drought Tolerance", 1.0),
            TraitImpact::new("Salt Tolerance", 1.0),
            TraitImpact::new("Heat Tolerance", 1.0),
            TraitImpact::new("Pest Resistance", 1.0),
        ];
        let points = project(&vector, 100.0);
        assert_eq!(points.len(), 4);
        // -90°, 0°, 90°, 180°: up, right, down, left in screen coordinates.
        assert_close(points[0].x, 0.0);
        assert_close(points[0].y, -100.0);
        assert_close(points[1].x, 100.0);
        assert_close(points[1].y, 0.0);
        assert_close(points[2].x, 0.0);
        assert_close(points[2].y, 100.0);
        assert_close(points[3].x, -100.0);
        assert_close(points[3].y, 0.0);
        for p in &points {
            assert_close(p.x.hypot(p.y), 100.0);
        }
    }

    #[test]
    fn test_impact_scales_distance() {
        let vector = vec![
            TraitImpact::new("a", 0.5),
            TraitImpact::new("b", 0.0),
            TraitImpact::new("c", 1.0),
        ];
        let points = project(&vector, 80.0);
        assert_eq!(points.len(), 3);
        assert_close(points[0].x.hypot(points[0].y), 40.0);
        assert_close(points[1].x.hypot(points[1].y), 0.0);
        assert_close(points[2].x.hypot(points[2].y), 80.0);
    }

    #[test]
    fn test_single_axis_points_up() {
        let points = project(&[TraitImpact::new("only", 1.0)], 50.0);
        assert_eq!(points.len(), 1);
        assert_close(points[0].x, 0.0);
        assert_close(points[0].y, -50.0);
    }

    #[test]
    fn test_gauge_arc_clamps() {
        assert_close(gauge_arc(0.0), 0.0);
        assert_close(gauge_arc(0.37), 0.37);
        assert_close(gauge_arc(1.0), 1.0);
        assert_close(gauge_arc(-0.5), 0.0);
        assert_close(gauge_arc(1.5), 1.0);
    }
}
