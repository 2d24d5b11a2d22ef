//! Vector-animation interchange backend: a JSON document with one shape
//! layer whose transform channels are keyframed at frames derived from each
//! keyframe's offset. A fixed default easing handle sits between every pair
//! of keyframes.

use serde_json::{Value, json};

use crate::{
    codegen::GenerateRequest,
    error::{MotionError, MotionResult},
    model::Keyframe,
};

const FRAME_RATE: f64 = 60.0;
const CANVAS: f64 = 512.0;

pub fn generate(request: &GenerateRequest) -> MotionResult<String> {
    let config = request.config;
    let keys = config.sorted_keyframes();
    let total_frames = (config.duration * FRAME_RATE).round().max(1.0);
    let frame_at = |offset: f64| (offset * total_frames).round();

    let frames: Vec<f64> = keys.iter().map(|k| frame_at(k.offset)).collect();
    let center = CANVAS / 2.0;

    let opacity = channel(
        &keys,
        &frames,
        |k| !k.opacity_is_default(),
        |k| json!([(k.opacity * 100.0).round()]),
        json!(100.0),
    );
    let rotation = channel(
        &keys,
        &frames,
        |k| !k.rotate_is_default(),
        |k| json!([k.rotate]),
        json!(0.0),
    );
    let position = channel(
        &keys,
        &frames,
        |k| !k.translate_x_is_default() || !k.translate_y_is_default(),
        |k| json!([center + k.translate_x, center + k.translate_y]),
        json!([center, center]),
    );
    let scale = channel(
        &keys,
        &frames,
        |k| !k.scale_is_default(),
        |k| json!([k.scale * 100.0, k.scale * 100.0]),
        json!([100.0, 100.0]),
    );

    let doc = json!({
        "v": "5.9.0",
        "fr": FRAME_RATE,
        "ip": 0,
        "op": total_frames,
        "w": CANVAS,
        "h": CANVAS,
        "nm": config.name,
        "ddd": 0,
        "assets": [],
        "layers": [{
            "ddd": 0,
            "ind": 1,
            "ty": 4,
            "nm": format!("{} shape", config.name),
            "sr": 1,
            "ks": {
                "o": opacity,
                "r": rotation,
                "p": position,
                "a": { "a": 0, "k": [0.0, 0.0, 0.0] },
                "s": scale,
            },
            "ao": 0,
            "shapes": [
                {
                    "ty": "rc",
                    "nm": "rect",
                    "p": { "a": 0, "k": [0.0, 0.0] },
                    "s": { "a": 0, "k": [120.0, 120.0] },
                    "r": { "a": 0, "k": 16.0 },
                },
                {
                    "ty": "fl",
                    "nm": "fill",
                    "c": { "a": 0, "k": [0.38, 0.47, 0.95, 1.0] },
                    "o": { "a": 0, "k": 100.0 },
                },
            ],
            "ip": 0,
            "op": total_frames,
            "st": 0,
            "bm": 0,
        }],
    });

    serde_json::to_string_pretty(&doc)
        .map_err(|e| MotionError::codegen(format!("interchange document serialization: {e}")))
}

/// A transform channel: static when the property never leaves its default,
/// otherwise one keyframe per IR keyframe with the fixed easing handle on
/// every non-final entry.
fn channel(
    keys: &[Keyframe],
    frames: &[f64],
    varies: impl Fn(&Keyframe) -> bool,
    value: impl Fn(&Keyframe) -> Value,
    rest: Value,
) -> Value {
    if keys.len() < 2 || !keys.iter().any(varies) {
        return json!({ "a": 0, "k": rest });
    }

    let last = keys.len() - 1;
    let entries: Vec<Value> = keys
        .iter()
        .zip(frames)
        .enumerate()
        .map(|(i, (kf, frame))| {
            let mut entry = json!({ "t": frame, "s": value(kf) });
            if i < last {
                entry["o"] = json!({ "x": [0.33], "y": [0.33] });
                entry["i"] = json!({ "x": [0.67], "y": [0.67] });
            }
            entry
        })
        .collect();
    json!({ "a": 1, "k": entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnimationConfig;

    fn doc_for(config: &AnimationConfig) -> Value {
        let out = generate(&GenerateRequest::new(config)).unwrap();
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn document_frames_follow_duration() {
        let doc = doc_for(&AnimationConfig::default());
        assert_eq!(doc["fr"], 60.0);
        assert_eq!(doc["ip"], 0);
        assert_eq!(doc["op"], 36.0); // 0.6 s at 60 fps
        assert_eq!(doc["layers"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn varying_channels_are_keyframed() {
        let doc = doc_for(&AnimationConfig::default());
        let ks = &doc["layers"][0]["ks"];

        let opacity = &ks["o"];
        assert_eq!(opacity["a"], 1);
        let entries = opacity["k"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["t"], 0.0);
        assert_eq!(entries[0]["s"][0], 0.0);
        assert_eq!(entries[1]["t"], 36.0);
        assert_eq!(entries[1]["s"][0], 100.0);

        // The fade-up preset slides 20 px: position animates around center.
        let position = &ks["p"];
        assert_eq!(position["a"], 1);
        assert_eq!(position["k"][0]["s"][1], 276.0);
        assert_eq!(position["k"][1]["s"][1], 256.0);
    }

    #[test]
    fn static_channels_stay_static() {
        let doc = doc_for(&AnimationConfig::default());
        let ks = &doc["layers"][0]["ks"];
        assert_eq!(ks["r"]["a"], 0);
        assert_eq!(ks["s"]["a"], 0);
        assert_eq!(ks["s"]["k"][0], 100.0);
    }

    #[test]
    fn easing_handles_sit_between_pairs() {
        let doc = doc_for(&AnimationConfig::default());
        let entries = doc["layers"][0]["ks"]["o"]["k"].as_array().unwrap().clone();
        assert!(entries[0].get("o").is_some());
        assert!(entries[0].get("i").is_some());
        assert!(entries[1].get("o").is_none());
    }

    #[test]
    fn never_emits_nan() {
        let out = generate(&GenerateRequest::new(&AnimationConfig::default())).unwrap();
        assert!(!out.contains("NaN"));
        assert!(!out.contains("null"));
    }
}
