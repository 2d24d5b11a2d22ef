//! Easing representations and conversions.
//!
//! An easing travels through the system as a textual expression: one of the
//! closed set of names below or a literal `cubic-bezier(x1, y1, x2, y2)`.
//! Everything here is total; unrecognized input falls back to a neutral
//! easing instead of failing.

/// Control points for the identity timing function.
pub const LINEAR: [f64; 4] = [0.0, 0.0, 1.0, 1.0];

const EASE: [f64; 4] = [0.25, 0.1, 0.25, 1.0];
const EASE_IN: [f64; 4] = [0.42, 0.0, 1.0, 1.0];
const EASE_OUT: [f64; 4] = [0.0, 0.0, 0.58, 1.0];
const EASE_IN_OUT: [f64; 4] = [0.42, 0.0, 0.58, 1.0];

/// Maps an easing expression to its cubic-Bezier control points
/// `[x1, y1, x2, y2]`. Unrecognized input falls back to linear.
pub fn to_control_points(easing: &str) -> [f64; 4] {
    match easing.trim() {
        "linear" => LINEAR,
        "ease" => EASE,
        "ease-in" => EASE_IN,
        "ease-out" => EASE_OUT,
        "ease-in-out" => EASE_IN_OUT,
        other => match parse_cubic_bezier(other) {
            Some(points) => points,
            None => {
                tracing::debug!(easing = other, "unknown easing, falling back to linear");
                LINEAR
            }
        },
    }
}

/// Formats control points as a `cubic-bezier(...)` expression with 2-decimal
/// precision.
pub fn from_control_points(points: [f64; 4]) -> String {
    format!(
        "cubic-bezier({:.2}, {:.2}, {:.2}, {:.2})",
        points[0], points[1], points[2], points[3]
    )
}

/// Maps an easing expression to the vocabulary of the imperative timeline
/// engine used for live preview. Literal Bezier expressions pass through
/// unchanged; unknown names fall back to a neutral ease.
pub fn to_engine_easing(easing: &str) -> String {
    let easing = easing.trim();
    match easing {
        "linear" => "none".to_string(),
        "ease" => "power1.inOut".to_string(),
        "ease-in" => "power2.in".to_string(),
        "ease-out" => "power2.out".to_string(),
        "ease-in-out" => "power2.inOut".to_string(),
        other if parse_cubic_bezier(other).is_some() => other.to_string(),
        other => {
            tracing::debug!(easing = other, "unknown engine easing, falling back");
            "power1.out".to_string()
        }
    }
}

fn parse_cubic_bezier(text: &str) -> Option<[f64; 4]> {
    let inner = text
        .strip_prefix("cubic-bezier(")
        .and_then(|rest| rest.strip_suffix(')'))?;
    let mut values = [0.0; 4];
    let mut parts = inner.split(',');
    for slot in &mut values {
        *slot = parts.next()?.trim().parse::<f64>().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(values)
}

/// Samples the timing function at input progress `x` in `[0, 1]`: solves the
/// x-axis cubic for the curve parameter (Newton-Raphson, bisection when the
/// derivative degenerates), then evaluates the y-axis cubic.
pub fn evaluate(points: [f64; 4], x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    let [x1, y1, x2, y2] = points;

    // Identity curve short-circuit; also covers degenerate all-equal input.
    if (x1 - y1).abs() < 1e-12 && (x2 - y2).abs() < 1e-12 {
        return x;
    }

    let t = solve_curve_x(x1, x2, x);
    axis(t, y1, y2)
}

/// Cubic Bezier axis value with endpoints pinned at 0 and 1.
fn axis(t: f64, p1: f64, p2: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

fn axis_derivative(t: f64, p1: f64, p2: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

fn solve_curve_x(x1: f64, x2: f64, x: f64) -> f64 {
    let mut t = x;
    for _ in 0..8 {
        let err = axis(t, x1, x2) - x;
        if err.abs() < 1e-7 {
            return t;
        }
        let d = axis_derivative(t, x1, x2);
        if d.abs() < 1e-6 {
            break;
        }
        t -= err / d;
    }

    // Newton failed to converge; fall back to bisection over [0, 1].
    let (mut lo, mut hi) = (0.0f64, 1.0f64);
    t = x;
    for _ in 0..32 {
        let v = axis(t, x1, x2);
        if (v - x).abs() < 1e-7 {
            break;
        }
        if v < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }
    t
}
