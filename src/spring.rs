//! Closed-form sampling of a damped harmonic oscillator.
//!
//! The solved motion starts at rest position 0 and approaches target 1. The
//! regime is picked from the damped frequency: oscillatory when it is
//! meaningfully positive, a monotonic exponential approach when damping wins,
//! and a pure cosine when damping is absent. An undamped spring never
//! settles; sampling is capped rather than looping forever.

use crate::model::SpringConfig;

/// One point of a solved spring curve. `t` is normalized over the sampled
/// duration, not wall-clock seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringSample {
    pub t: f64,
    pub value: f64,
}

const REGIME_EPS: f64 = 1e-6;

/// Hard ceiling on sampled duration, in seconds. Reached only by undamped
/// or near-undamped configurations.
const MAX_DURATION: f64 = 10.0;

/// Fixed control points used when the curve overshoots: a single Bezier
/// cannot represent oscillation, so a canonical springy handle stands in.
const OVERSHOOT_BEZIER: [f64; 4] = [0.34, 1.56, 0.64, 1.0];

/// Time for the oscillation envelope to decay to 1/1000 of its initial
/// amplitude, or `None` when damping is absent and the spring never settles.
pub fn settle_time(config: &SpringConfig) -> Option<f64> {
    let gamma = config.damping / (2.0 * config.mass);
    if gamma <= REGIME_EPS {
        return None;
    }
    Some(1000.0_f64.ln() / gamma)
}

/// Duration covered by [`solve`]: 1.2x the settle time, capped at 10 s.
pub fn sample_duration(config: &SpringConfig) -> f64 {
    match settle_time(config) {
        Some(settle) => (1.2 * settle).min(MAX_DURATION),
        None => MAX_DURATION,
    }
}

/// Samples the oscillator at `steps + 1` evenly spaced times across the
/// sampled duration. Input ranges are a caller contract (see
/// [`SpringConfig`]); the solver itself never fails.
pub fn solve(config: &SpringConfig, steps: usize) -> Vec<SpringSample> {
    let duration = sample_duration(config);
    if steps == 0 {
        return vec![SpringSample { t: 0.0, value: 0.0 }];
    }
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            SpringSample {
                t,
                value: value_at(config, t * duration),
            }
        })
        .collect()
}

/// Oscillator position at `time` seconds, from 0 toward 1.
fn value_at(config: &SpringConfig, time: f64) -> f64 {
    let omega_n = (config.stiffness / config.mass).sqrt();
    let gamma = config.damping / (2.0 * config.mass);
    let omega_d = (omega_n * omega_n - gamma * gamma).max(0.0).sqrt();
    let v0 = config.velocity;

    if gamma <= REGIME_EPS {
        // Undamped: pure cosine around the target.
        return 1.0 - (omega_n * time).cos() + (v0 / omega_n) * (omega_n * time).sin();
    }

    let envelope = (-gamma * time).exp();
    if omega_d > REGIME_EPS {
        // Underdamped: decaying oscillation.
        let sin_coeff = (gamma - v0) / omega_d;
        1.0 - envelope * ((omega_d * time).cos() + sin_coeff * (omega_d * time).sin())
    } else {
        // Critically damped and overdamped collapse onto the same monotonic
        // approach once the damped frequency clamps to zero.
        1.0 - envelope * (1.0 + (gamma - v0) * time)
    }
}

/// Approximates the solved curve as one cubic Bezier for consumers that
/// cannot accept a sample array. Lossy: multiple oscillations collapse onto
/// a fixed springy handle. Callers needing fidelity must use [`solve`].
pub fn approximate_bezier(config: &SpringConfig) -> [f64; 4] {
    let samples = solve(config, 200);
    let peak = samples.iter().map(|s| s.value).fold(f64::MIN, f64::max);
    if peak > 1.05 {
        return OVERSHOOT_BEZIER;
    }

    let crossing = |level: f64, fallback: f64| {
        samples
            .iter()
            .find(|s| s.value >= level)
            .map(|s| s.t)
            .unwrap_or(fallback)
    };
    let t_half = crossing(0.5, 0.25).clamp(0.0, 1.0);
    let t_settle = crossing(0.98, 0.8).clamp(t_half, 1.0);
    [t_half, 0.85, t_settle, 1.0]
}
