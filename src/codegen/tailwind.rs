//! Utility-class theme fragment backend: the keyframes and animation
//! shorthand as a `theme.extend` object, structurally mirroring the
//! stylesheet backend.

use crate::{
    codegen::{GenerateRequest, fmt_num, percent, transform_value},
    error::MotionResult,
    model::IterationCount,
};

pub fn generate(request: &GenerateRequest) -> MotionResult<String> {
    let config = request.config;
    let name = config.name.as_str();
    let keys = config.sorted_keyframes();
    let animate_opacity = keys.iter().any(|k| !k.opacity_is_default());

    let mut out = String::new();
    out.push_str("// tailwind.config.js -> theme.extend\n");
    out.push_str("{\n");
    out.push_str("  keyframes: {\n");
    out.push_str(&format!("    '{name}': {{\n"));
    for kf in &keys {
        let mut decls = Vec::new();
        if animate_opacity {
            decls.push(format!("opacity: '{}'", fmt_num(kf.opacity)));
        }
        if let Some(transform) = transform_value(kf) {
            decls.push(format!("transform: '{transform}'"));
        }
        out.push_str(&format!(
            "      '{}': {{ {} }},\n",
            percent(kf.offset),
            decls.join(", ")
        ));
    }
    out.push_str("    },\n");
    out.push_str("  },\n");
    out.push_str("  animation: {\n");
    out.push_str(&format!(
        "    '{name}': '{name} {}s {} {}s {} {} {}',\n",
        fmt_num(config.duration),
        request.effective_easing(),
        fmt_num(config.delay),
        iteration(config.iteration_count),
        config.direction.as_str(),
        config.fill_mode.as_str(),
    ));
    out.push_str("  },\n");
    out.push_str("}\n");

    if request.stagger_active() {
        out.push('\n');
        out.push_str("// Stagger is not expressible in the theme; set per-child\n");
        out.push_str("// animation-delay utilities instead:\n");
        for (i, d) in request.stagger_delays.iter().enumerate() {
            out.push_str(&format!(
                "//   child {}: [animation-delay:{}s]\n",
                i + 1,
                fmt_num(config.delay + d)
            ));
        }
    }

    Ok(out)
}

fn iteration(count: IterationCount) -> String {
    match count {
        IterationCount::Finite(n) => n.to_string(),
        IterationCount::Infinite => "infinite".to_string(),
    }
}
