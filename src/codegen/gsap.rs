//! Imperative timeline script backend: a `.set(...)` from the first
//! keyframe, then one timed `.to(...)` per subsequent keyframe with its
//! proportional duration slice and engine-vocabulary easing.

use crate::{
    codegen::{GenerateRequest, fmt_num, framer::animated_props},
    ease,
    error::MotionResult,
    model::IterationCount,
};

pub fn generate(request: &GenerateRequest) -> MotionResult<String> {
    let config = request.config;
    let keys = config.sorted_keyframes();
    let props = animated_props(&keys);
    let selector = format!(".{}", config.name);

    let mut options = Vec::new();
    match config.iteration_count {
        IterationCount::Infinite => options.push("repeat: -1".to_string()),
        IterationCount::Finite(n) if n > 1 => options.push(format!("repeat: {}", n - 1)),
        IterationCount::Finite(_) => {}
    }
    if config.direction.yoyo() {
        options.push("yoyo: true".to_string());
    }
    if config.delay > 0.0 {
        options.push(format!("delay: {}", fmt_num(config.delay)));
    }

    let mut out = String::new();
    if options.is_empty() {
        out.push_str("const tl = gsap.timeline();\n\n");
    } else {
        out.push_str(&format!(
            "const tl = gsap.timeline({{ {} }});\n\n",
            options.join(", ")
        ));
    }

    let first: Vec<String> = props
        .iter()
        .map(|p| format!("{}: {}", p.name, fmt_num(p.values[0])))
        .collect();
    out.push_str(&format!("tl.set(\"{selector}\", {{ {} }});\n", first.join(", ")));

    for (i, pair) in keys.windows(2).enumerate() {
        let (a, b) = (&pair[0], &pair[1]);
        let slice = (b.offset - a.offset) * config.duration;
        let easing = b
            .easing
            .clone()
            .unwrap_or_else(|| request.effective_easing());

        let mut entries: Vec<String> = props
            .iter()
            .map(|p| format!("{}: {}", p.name, fmt_num(p.values[i + 1])))
            .collect();
        entries.push(format!("duration: {}", fmt_num(slice)));
        entries.push(format!("ease: \"{}\"", ease::to_engine_easing(&easing)));
        out.push_str(&format!(
            "tl.to(\"{selector}\", {{ {} }});\n",
            entries.join(", ")
        ));
    }

    if config.direction.starts_reversed() {
        out.push_str("\ntl.reverse();\n");
    }

    Ok(out)
}
