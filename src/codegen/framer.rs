//! Props-based motion descriptor backend: `initial`/`animate` objects for
//! two-keyframe configs, array-valued properties with a `times` track for
//! richer ones, spring physical parameters when spring mode is active, and
//! a container/item variants pair under stagger.

use crate::{
    codegen::{GenerateRequest, fmt_num},
    ease,
    error::MotionResult,
    model::{Direction, IterationCount, Keyframe},
};

/// One animatable descriptor property and its value at every keyframe.
pub(crate) struct Prop {
    pub name: &'static str,
    pub values: Vec<f64>,
}

/// Properties that change anywhere across the keyframe list, in descriptor
/// naming. The same is-default predicates drive omission in every backend.
pub(crate) fn animated_props(keys: &[Keyframe]) -> Vec<Prop> {
    let mut props = Vec::new();
    let mut push = |name: &'static str,
                    any: fn(&Keyframe) -> bool,
                    value: fn(&Keyframe) -> f64| {
        if keys.iter().any(any) {
            props.push(Prop {
                name,
                values: keys.iter().map(value).collect(),
            });
        }
    };

    push("opacity", |k| !k.opacity_is_default(), |k| k.opacity);
    push("x", |k| !k.translate_x_is_default(), |k| k.translate_x);
    push("y", |k| !k.translate_y_is_default(), |k| k.translate_y);
    push("scale", |k| !k.scale_is_default(), |k| k.scale);
    push("rotate", |k| !k.rotate_is_default(), |k| k.rotate);
    push(
        "rotateX",
        |k| !k.rotate_x_is_default(),
        |k| k.rotate_x.unwrap_or(0.0),
    );
    push(
        "rotateY",
        |k| !k.rotate_y_is_default(),
        |k| k.rotate_y.unwrap_or(0.0),
    );
    push("skewX", |k| !k.skew_x_is_default(), |k| k.skew_x);
    push("skewY", |k| !k.skew_y_is_default(), |k| k.skew_y);
    push(
        "transformPerspective",
        |k| !k.perspective_is_default(),
        |k| k.perspective.unwrap_or(0.0),
    );
    props
}

pub(crate) fn ease_array(easing: &str) -> String {
    let p = ease::to_control_points(easing);
    format!(
        "[{}, {}, {}, {}]",
        fmt_num(p[0]),
        fmt_num(p[1]),
        fmt_num(p[2]),
        fmt_num(p[3])
    )
}

/// Transition entries shared by the descriptor and the component wrapper.
/// Spring mode swaps duration/ease for the physical parameters.
pub(crate) fn transition_entries(request: &GenerateRequest, times: Option<&[f64]>) -> Vec<String> {
    let config = request.config;
    let mut entries = Vec::new();

    match (request.spring_active(), request.spring) {
        (true, Some(spring)) => {
            entries.push("type: \"spring\"".to_string());
            entries.push(format!("mass: {}", fmt_num(spring.mass)));
            entries.push(format!("stiffness: {}", fmt_num(spring.stiffness)));
            entries.push(format!("damping: {}", fmt_num(spring.damping)));
            entries.push(format!("velocity: {}", fmt_num(spring.velocity)));
        }
        _ => {
            entries.push(format!("duration: {}", fmt_num(config.duration)));
            entries.push(format!("ease: {}", ease_array(&request.effective_easing())));
        }
    }

    if config.delay > 0.0 {
        entries.push(format!("delay: {}", fmt_num(config.delay)));
    }
    if let Some(times) = times {
        let labels: Vec<String> = times.iter().map(|t| fmt_num(*t)).collect();
        entries.push(format!("times: [{}]", labels.join(", ")));
    }

    match config.iteration_count {
        IterationCount::Infinite => entries.push("repeat: Infinity".to_string()),
        IterationCount::Finite(n) if n > 1 => entries.push(format!("repeat: {}", n - 1)),
        IterationCount::Finite(_) => {}
    }
    if matches!(
        config.direction,
        Direction::Alternate | Direction::AlternateReverse
    ) {
        entries.push("repeatType: \"reverse\"".to_string());
    }

    entries
}

pub fn generate(request: &GenerateRequest) -> MotionResult<String> {
    if let Some(sequencer) = request.sequencer
        && request.stagger_active()
    {
        return Ok(generate_variants(request, sequencer));
    }

    let config = request.config;
    let keys = config.sorted_keyframes();
    let props = animated_props(&keys);
    let ident = js_ident(&config.name);

    let mut out = String::new();
    out.push_str(&format!("const {ident} = {{\n"));

    if keys.len() <= 2 {
        let first: Vec<String> = props
            .iter()
            .map(|p| format!("{}: {}", p.name, fmt_num(p.values[0])))
            .collect();
        let last: Vec<String> = props
            .iter()
            .map(|p| {
                format!(
                    "{}: {}",
                    p.name,
                    fmt_num(p.values.last().copied().unwrap_or(0.0))
                )
            })
            .collect();
        out.push_str(&format!("  initial: {{ {} }},\n", first.join(", ")));
        out.push_str(&format!("  animate: {{ {} }},\n", last.join(", ")));
        out.push_str(&format!(
            "  transition: {{ {} }}\n",
            transition_entries(request, None).join(", ")
        ));
    } else {
        let times: Vec<f64> = keys.iter().map(|k| k.offset).collect();
        out.push_str("  animate: {\n");
        for p in &props {
            let values: Vec<String> = p.values.iter().map(|v| fmt_num(*v)).collect();
            out.push_str(&format!("    {}: [{}],\n", p.name, values.join(", ")));
        }
        out.push_str("  },\n");
        out.push_str(&format!(
            "  transition: {{ {} }}\n",
            transition_entries(request, Some(&times)).join(", ")
        ));
    }

    out.push_str("};\n");
    Ok(out)
}

/// Container/item variants with cascading children.
fn generate_variants(request: &GenerateRequest, sequencer: &crate::model::SequencerConfig) -> String {
    let config = request.config;
    let keys = config.sorted_keyframes();
    let props = animated_props(&keys);

    let mut container_entries = vec![format!(
        "staggerChildren: {}",
        fmt_num(sequencer.stagger_delay)
    )];
    if config.delay > 0.0 {
        container_entries.push(format!("delayChildren: {}", fmt_num(config.delay)));
    }
    if matches!(
        sequencer.stagger_direction,
        crate::model::StaggerDirection::Reverse
    ) {
        container_entries.push("staggerDirection: -1".to_string());
    }

    let hidden: Vec<String> = props
        .iter()
        .map(|p| format!("{}: {}", p.name, fmt_num(p.values[0])))
        .collect();
    let visible: Vec<String> = props
        .iter()
        .map(|p| {
            format!(
                "{}: {}",
                p.name,
                fmt_num(p.values.last().copied().unwrap_or(0.0))
            )
        })
        .collect();

    let mut item_transition = Vec::new();
    if request.spring_active() {
        item_transition = transition_entries(request, None);
    } else {
        item_transition.push(format!("duration: {}", fmt_num(config.duration)));
        item_transition.push(format!("ease: {}", ease_array(&request.effective_easing())));
    }

    let mut out = String::new();
    out.push_str("const container = {\n");
    out.push_str("  hidden: {},\n");
    out.push_str("  visible: {\n");
    out.push_str(&format!(
        "    transition: {{ {} }}\n",
        container_entries.join(", ")
    ));
    out.push_str("  }\n");
    out.push_str("};\n\n");
    out.push_str("const item = {\n");
    out.push_str(&format!("  hidden: {{ {} }},\n", hidden.join(", ")));
    out.push_str("  visible: {\n");
    for entry in &visible {
        out.push_str(&format!("    {entry},\n"));
    }
    out.push_str(&format!(
        "    transition: {{ {} }}\n",
        item_transition.join(", ")
    ));
    out.push_str("  }\n");
    out.push_str("};\n");
    out
}

/// A kebab-cased animation name as a camelCase binding.
pub(crate) fn js_ident(name: &str) -> String {
    let mut out = String::new();
    let mut upper_next = false;
    for (i, ch) in name.chars().enumerate() {
        if ch == '-' || ch == '_' || ch == ' ' {
            upper_next = i > 0;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    if out.is_empty() {
        out.push_str("animation");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AnimationConfig, EasingMode, SequencerConfig, SpringConfig, StaggerDirection,
    };
    use rand::SeedableRng as _;

    #[test]
    fn two_keyframes_emit_initial_and_animate() {
        let config = AnimationConfig::default();
        let out = generate(&GenerateRequest::new(&config)).unwrap();
        assert!(out.contains("const fadeUp = {"));
        assert!(out.contains("initial: { opacity: 0, y: 20 },"));
        assert!(out.contains("animate: { opacity: 1, y: 0 },"));
        assert!(out.contains("duration: 0.6"));
        assert!(out.contains("ease: [0, 0, 0.58, 1]"));
        assert!(!out.contains("times"));
    }

    #[test]
    fn many_keyframes_emit_value_arrays_with_times() {
        let mut config = AnimationConfig::default();
        config.keyframes.insert(
            1,
            Keyframe {
                opacity: 0.5,
                translate_y: 10.0,
                ..Keyframe::at(0.4)
            },
        );
        let out = generate(&GenerateRequest::new(&config)).unwrap();
        assert!(out.contains("opacity: [0, 0.5, 1],"));
        assert!(out.contains("y: [20, 10, 0],"));
        assert!(out.contains("times: [0, 0.4, 1]"));
        assert!(!out.contains("initial:"));
    }

    #[test]
    fn spring_mode_replaces_duration_and_ease() {
        let config = AnimationConfig::default();
        let spring = SpringConfig::default();
        let request = GenerateRequest::new(&config)
            .with_spring(&spring)
            .easing_mode(EasingMode::Spring);
        let out = generate(&request).unwrap();
        assert!(out.contains("type: \"spring\""));
        assert!(out.contains("stiffness: 100"));
        assert!(out.contains("damping: 10"));
        assert!(!out.contains("duration:"));
        assert!(!out.contains("ease:"));
    }

    #[test]
    fn infinite_alternate_adds_repeat_entries() {
        let config = AnimationConfig {
            iteration_count: IterationCount::Infinite,
            direction: Direction::Alternate,
            ..AnimationConfig::default()
        };
        let out = generate(&GenerateRequest::new(&config)).unwrap();
        assert!(out.contains("repeat: Infinity"));
        assert!(out.contains("repeatType: \"reverse\""));
    }

    #[test]
    fn stagger_emits_container_and_item_variants() {
        let config = AnimationConfig::default();
        let sequencer = SequencerConfig {
            enabled: true,
            element_count: 4,
            stagger_delay: 0.15,
            stagger_direction: StaggerDirection::Forward,
        };
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let out =
            generate(&GenerateRequest::new(&config).with_sequencer(&sequencer, &mut rng)).unwrap();
        assert!(out.contains("const container = {"));
        assert!(out.contains("staggerChildren: 0.15"));
        assert!(out.contains("hidden: { opacity: 0, y: 20 },"));
        assert!(out.contains("const item = {"));
    }

    #[test]
    fn js_ident_camel_cases() {
        assert_eq!(js_ident("fade-up"), "fadeUp");
        assert_eq!(js_ident("slide_in_left"), "slideInLeft");
        assert_eq!(js_ident("pulse"), "pulse");
    }
}
