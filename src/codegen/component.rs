//! Standalone component wrapper backend: a self-contained unit combining the
//! motion descriptor's initial/animate/transition with a wrapped inner
//! element, either a generic placeholder or a supplied component reference.

use crate::{
    codegen::{
        GenerateRequest, fmt_num,
        framer::{animated_props, transition_entries},
    },
    error::MotionResult,
};

pub fn generate(request: &GenerateRequest) -> MotionResult<String> {
    let config = request.config;
    let keys = config.sorted_keyframes();
    let props = animated_props(&keys);
    let component = pascal_ident(&config.name);

    let multi = keys.len() > 2;
    let times: Vec<f64> = keys.iter().map(|k| k.offset).collect();
    let transition = transition_entries(request, multi.then_some(times.as_slice())).join(", ");

    let initial: Vec<String> = props
        .iter()
        .map(|p| format!("{}: {}", p.name, fmt_num(p.values[0])))
        .collect();
    let animate: Vec<String> = props
        .iter()
        .map(|p| {
            if multi {
                let values: Vec<String> = p.values.iter().map(|v| fmt_num(*v)).collect();
                format!("{}: [{}]", p.name, values.join(", "))
            } else {
                format!("{}: {}", p.name, fmt_num(*p.values.last().unwrap_or(&0.0)))
            }
        })
        .collect();

    let mut out = String::new();
    out.push_str("import { motion } from \"framer-motion\";\n");
    if let Some(inner) = request.component_ref {
        out.push_str(&format!("import {{ {inner} }} from \"./{inner}\";\n"));
    }
    out.push('\n');

    let params = if request.component_ref.is_some() {
        ""
    } else {
        "{ children }"
    };
    out.push_str(&format!("export function {component}({params}) {{\n"));
    out.push_str("  return (\n");
    out.push_str("    <motion.div\n");
    if !multi {
        out.push_str(&format!("      initial={{{{ {} }}}}\n", initial.join(", ")));
    }
    out.push_str(&format!("      animate={{{{ {} }}}}\n", animate.join(", ")));
    out.push_str(&format!("      transition={{{{ {transition} }}}}\n"));
    out.push_str("    >\n");
    match request.component_ref {
        Some(inner) => out.push_str(&format!("      <{inner} />\n")),
        None => out.push_str("      {children}\n"),
    }
    out.push_str("    </motion.div>\n");
    out.push_str("  );\n");
    out.push_str("}\n");
    Ok(out)
}

/// A kebab-cased animation name as a PascalCase component name.
fn pascal_ident(name: &str) -> String {
    let mut out = String::new();
    let mut upper_next = true;
    for ch in name.chars() {
        if ch == '-' || ch == '_' || ch == ' ' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    if out.is_empty() {
        out.push_str("Animated");
    }
    out
}
