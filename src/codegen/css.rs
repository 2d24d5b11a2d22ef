//! Stylesheet keyframes backend: a percentage-keyed `@keyframes` rule plus a
//! class carrying the `animation` shorthand.

use crate::{
    codegen::{GenerateRequest, fmt_num, percent, transform_value},
    error::MotionResult,
    model::IterationCount,
    path,
};

pub fn generate(request: &GenerateRequest) -> MotionResult<String> {
    let config = request.config;
    let name = config.name.as_str();
    let keys = config.sorted_keyframes();

    let mut out = String::new();
    out.push_str(&format!("@keyframes {name} {{\n"));

    if request.path_active() {
        // Position comes from the offset path, so the stops only sweep the
        // distance along it.
        out.push_str("  0% {\n    offset-distance: 0%;\n  }\n");
        out.push_str("  100% {\n    offset-distance: 100%;\n  }\n");
    } else {
        // Opacity is declared at every stop once it varies anywhere, so the
        // interpolation endpoints stay explicit; an identity transform is
        // simply omitted from its stop.
        let animate_opacity = keys.iter().any(|k| !k.opacity_is_default());
        for kf in &keys {
            out.push_str(&format!("  {} {{\n", percent(kf.offset)));
            if animate_opacity {
                out.push_str(&format!("    opacity: {};\n", fmt_num(kf.opacity)));
            }
            if let Some(transform) = transform_value(kf) {
                out.push_str(&format!("    transform: {transform};\n"));
            }
            out.push_str("  }\n");
        }
    }
    out.push_str("}\n\n");

    out.push_str(&format!(".{name} {{\n"));
    if request.path_active()
        && let Some(path_cfg) = request.path
    {
        out.push_str(&format!(
            "  offset-path: {};\n",
            path::offset_path_string(&path_cfg.points)
        ));
        let rotate = if path_cfg.auto_rotate { "auto" } else { "0deg" };
        out.push_str(&format!("  offset-rotate: {rotate};\n"));
    }
    out.push_str(&format!(
        "  animation: {name} {}s {} {}s {} {} {};\n",
        fmt_num(config.duration),
        request.effective_easing(),
        fmt_num(config.delay),
        iteration(config.iteration_count),
        config.direction.as_str(),
        config.fill_mode.as_str(),
    ));
    out.push_str("}\n");

    if request.stagger_active() {
        out.push('\n');
        out.push_str("/* Per-child start delays */\n");
        for (i, d) in request.stagger_delays.iter().enumerate() {
            out.push_str(&format!(
                ".{name}-stagger > *:nth-child({}) {{\n  animation-delay: {}s;\n}}\n",
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
