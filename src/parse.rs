//! Ingests foreign stylesheet keyframes back into the IR.
//!
//! Only transform/opacity declarations and simple percentage stops are
//! supported. This is the one validating boundary in the crate: anything the
//! importer cannot faithfully represent is rejected with a reason instead of
//! being guessed at.

use std::sync::OnceLock;

use regex::Regex;

use crate::{
    error::{MotionError, MotionResult},
    model::Keyframe,
};

/// Parses the first `@keyframes` block in `text` into keyframes sorted by
/// offset.
///
/// Fails when no block is present, when any stop carries a `matrix(...)`
/// transform (composite matrices cannot be decomposed losslessly into the
/// discrete property set), or when fewer than 2 stops survive parsing.
#[tracing::instrument(skip(text))]
pub fn parse_keyframes(text: &str) -> MotionResult<Vec<Keyframe>> {
    let body = keyframes_body(text)
        .ok_or_else(|| MotionError::parse("no @keyframes block found in input"))?;

    let mut keyframes = Vec::new();
    for caps in stop_re().captures_iter(body) {
        let selector = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let declarations = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

        if declarations.contains("matrix(") || declarations.contains("matrix3d(") {
            return Err(MotionError::parse(
                "matrix transforms are not supported; use discrete transform functions",
            ));
        }

        let Some(offset) = stop_offset(selector) else {
            tracing::debug!(selector, "skipping stop with unparseable selector");
            continue;
        };
        keyframes.push(parse_stop(offset, declarations));
    }

    if keyframes.len() < 2 {
        return Err(MotionError::parse(format!(
            "expected at least 2 keyframe stops, found {}",
            keyframes.len()
        )));
    }

    keyframes.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    Ok(keyframes)
}

/// Body of the first `@keyframes` block, extracted by brace matching so
/// nested stop rules do not end the block early.
fn keyframes_body(text: &str) -> Option<&str> {
    let at = text.find("@keyframes")?;
    let rest = &text[at..];
    let open = rest.find('{')?;
    let mut depth = 0usize;
    for (i, ch) in rest[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[open + 1..open + i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn stop_offset(selector: &str) -> Option<f64> {
    match selector.trim() {
        "from" => Some(0.0),
        "to" => Some(1.0),
        pct => pct
            .strip_suffix('%')
            .and_then(|n| n.trim().parse::<f64>().ok())
            .map(|n| n / 100.0),
    }
}

fn parse_stop(offset: f64, declarations: &str) -> Keyframe {
    let mut kf = Keyframe::at(offset);
    let re = transform_res();

    // Each function is scanned independently; duplicates of the same
    // function are not summed, the first match wins.
    if let Some(v) = first_number(&re.translate_x, declarations) {
        kf.translate_x = v;
    }
    if let Some(v) = first_number(&re.translate_y, declarations) {
        kf.translate_y = v;
    }
    if let Some(v) = first_number(&re.scale, declarations) {
        kf.scale = v;
    }
    if let Some(v) = first_number(&re.rotate, declarations) {
        kf.rotate = v;
    }
    if let Some(v) = first_number(&re.rotate_x, declarations) {
        kf.rotate_x = Some(v);
    }
    if let Some(v) = first_number(&re.rotate_y, declarations) {
        kf.rotate_y = Some(v);
    }
    if let Some(v) = first_number(&re.skew_x, declarations) {
        kf.skew_x = v;
    }
    if let Some(v) = first_number(&re.skew_y, declarations) {
        kf.skew_y = v;
    }
    if let Some(v) = first_number(&re.perspective, declarations) {
        kf.perspective = Some(v);
    }
    if let Some(v) = first_number(&re.opacity, declarations) {
        kf.opacity = v;
    }
    kf
}

fn first_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

struct TransformRes {
    translate_x: Regex,
    translate_y: Regex,
    scale: Regex,
    rotate: Regex,
    rotate_x: Regex,
    rotate_y: Regex,
    skew_x: Regex,
    skew_y: Regex,
    perspective: Regex,
    opacity: Regex,
}

fn stop_re() -> &'static Regex {
    static STOP: OnceLock<Regex> = OnceLock::new();
    STOP.get_or_init(|| Regex::new(r"(?s)(from|to|[\d.]+\s*%)\s*\{([^}]*)\}").unwrap())
}

fn transform_res() -> &'static TransformRes {
    static RES: OnceLock<TransformRes> = OnceLock::new();
    // `rotate` requires the literal paren right after the name, so it can
    // never match the prefix of rotateX(...) or rotateY(...).
    RES.get_or_init(|| TransformRes {
        translate_x: Regex::new(r"translateX\(\s*(-?[\d.]+)(?:px)?\s*\)").unwrap(),
        translate_y: Regex::new(r"translateY\(\s*(-?[\d.]+)(?:px)?\s*\)").unwrap(),
        scale: Regex::new(r"scale\(\s*(-?[\d.]+)").unwrap(),
        rotate: Regex::new(r"rotate\(\s*(-?[\d.]+)(?:deg)?\s*\)").unwrap(),
        rotate_x: Regex::new(r"rotateX\(\s*(-?[\d.]+)(?:deg)?\s*\)").unwrap(),
        rotate_y: Regex::new(r"rotateY\(\s*(-?[\d.]+)(?:deg)?\s*\)").unwrap(),
        skew_x: Regex::new(r"skewX\(\s*(-?[\d.]+)(?:deg)?\s*\)").unwrap(),
        skew_y: Regex::new(r"skewY\(\s*(-?[\d.]+)(?:deg)?\s*\)").unwrap(),
        perspective: Regex::new(r"perspective\(\s*(-?[\d.]+)(?:px)?\s*\)").unwrap(),
        opacity: Regex::new(r"opacity\s*:\s*(-?[\d.]+)").unwrap(),
    })
}
