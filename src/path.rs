//! Motion path sampling over a chain of cubic Bezier anchors.
//!
//! A path with N anchors is N-1 cubic segments; segment i runs from anchor i
//! (using its outgoing control point) to anchor i+1 (using its incoming
//! control point). Sampling is parameter-uniform, not arc-length-uniform:
//! callers must not assume constant visual speed along the curve.

use kurbo::{CubicBez, ParamCurve as _, Point};

use crate::model::PathPoint;

/// Sample count used when a path is resampled into implicit keyframes.
pub const PATH_STEPS: usize = 40;

/// Extent of the editing-canvas coordinate space the template paths live in.
/// Embedding surfaces re-scale to their own viewport.
pub const TEMPLATE_SPACE: f64 = 300.0;

fn segment(a: &PathPoint, b: &PathPoint) -> CubicBez {
    CubicBez::new(
        Point::new(a.x, a.y),
        Point::new(a.cx2, a.cy2),
        Point::new(b.cx1, b.cy1),
        Point::new(b.x, b.y),
    )
}

/// Position along the whole chain at global parameter `t` in `[0, 1]`.
/// Degenerate inputs collapse instead of failing: an empty path samples to
/// the origin and a single anchor samples to itself.
pub fn sample_at(points: &[PathPoint], t: f64) -> Point {
    match points {
        [] => Point::ZERO,
        [only] => Point::new(only.x, only.y),
        _ => {
            let t = t.clamp(0.0, 1.0);
            let seg_count = points.len() - 1;
            let seg_float = t * seg_count as f64;
            let seg_index = (seg_float.floor() as usize).min(seg_count - 1);
            let seg_t = seg_float - seg_index as f64;
            segment(&points[seg_index], &points[seg_index + 1]).eval(seg_t)
        }
    }
}

/// `steps + 1` positions at uniformly spaced parameter values.
pub fn sample_evenly(points: &[PathPoint], steps: usize) -> Vec<Point> {
    if steps == 0 {
        return vec![sample_at(points, 0.0)];
    }
    (0..=steps)
        .map(|i| sample_at(points, i as f64 / steps as f64))
        .collect()
}

/// Heading from one sample to the next, in degrees.
pub fn tangent_angle(prev: Point, next: Point) -> f64 {
    (next.y - prev.y).atan2(next.x - prev.x).to_degrees()
}

/// Serializes the chain as a `path('M ... C ...')` expression for stylesheet
/// consumers. The only place a path leaves its numeric form.
pub fn offset_path_string(points: &[PathPoint]) -> String {
    let mut out = String::from("path('");
    if let Some(first) = points.first() {
        out.push_str(&format!("M {} {}", round1(first.x), round1(first.y)));
        for pair in points.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            out.push_str(&format!(
                " C {} {}, {} {}, {} {}",
                round1(a.cx2),
                round1(a.cy2),
                round1(b.cx1),
                round1(b.cy1),
                round1(b.x),
                round1(b.y)
            ));
        }
    }
    out.push_str("')");
    out
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// An anchor whose handles sit on the straight line toward its neighbors,
/// one third of the way out. Used by the templates below.
fn smooth_point(x: f64, y: f64, toward_prev: (f64, f64), toward_next: (f64, f64)) -> PathPoint {
    PathPoint::new(
        x,
        y,
        x + (toward_prev.0 - x) / 3.0,
        y + (toward_prev.1 - y) / 3.0,
        x + (toward_next.0 - x) / 3.0,
        y + (toward_next.1 - y) / 3.0,
    )
}

/// Straight horizontal sweep.
pub fn template_line() -> Vec<PathPoint> {
    vec![
        smooth_point(20.0, 150.0, (20.0, 150.0), (280.0, 150.0)),
        smooth_point(280.0, 150.0, (20.0, 150.0), (280.0, 150.0)),
    ]
}

/// Diagonal S-bend across the canvas.
pub fn template_s_curve() -> Vec<PathPoint> {
    vec![
        PathPoint::new(20.0, 250.0, 20.0, 250.0, 110.0, 250.0),
        PathPoint::new(150.0, 150.0, 100.0, 200.0, 200.0, 100.0),
        PathPoint::new(280.0, 50.0, 190.0, 50.0, 280.0, 50.0),
    ]
}

/// Rising arc, peaking mid-flight.
pub fn template_arc() -> Vec<PathPoint> {
    vec![
        PathPoint::new(20.0, 250.0, 20.0, 250.0, 80.0, 60.0),
        PathPoint::new(280.0, 250.0, 220.0, 60.0, 280.0, 250.0),
    ]
}

/// Two lobes crossing at the center.
pub fn template_figure_eight() -> Vec<PathPoint> {
    vec![
        PathPoint::new(150.0, 150.0, 150.0, 150.0, 220.0, 80.0),
        PathPoint::new(250.0, 150.0, 280.0, 90.0, 220.0, 210.0),
        PathPoint::new(150.0, 150.0, 200.0, 200.0, 100.0, 100.0),
        PathPoint::new(50.0, 150.0, 20.0, 90.0, 80.0, 210.0),
        PathPoint::new(150.0, 150.0, 100.0, 200.0, 150.0, 150.0),
    ]
}
