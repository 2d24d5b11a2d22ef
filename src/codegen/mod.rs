//! Lowers the IR into each of the six output formats.
//!
//! Every backend is a pure function over a [`GenerateRequest`]; nothing here
//! mutates the IR or touches IO. Generators assume pre-validated input (the
//! dispatch validates once) and never emit NaN: a property with no visible
//! change is omitted wherever the target format allows sparse specification.

pub mod component;
pub mod css;
pub mod framer;
pub mod gsap;
pub mod lottie;
pub mod tailwind;

use rand::Rng;

use crate::{
    ease,
    error::{MotionError, MotionResult},
    model::{AnimationConfig, EasingMode, Keyframe, MotionPathConfig, SequencerConfig, SpringConfig},
    spring,
};

/// Output format identifiers, as exposed to external collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    StylesheetKeyframes,
    MotionDescriptor,
    UtilityTheme,
    ComponentWrapper,
    TimelineScript,
    VectorInterchange,
}

impl Format {
    pub const ALL: [Format; 6] = [
        Format::StylesheetKeyframes,
        Format::MotionDescriptor,
        Format::UtilityTheme,
        Format::ComponentWrapper,
        Format::TimelineScript,
        Format::VectorInterchange,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::StylesheetKeyframes => "stylesheet-keyframes",
            Self::MotionDescriptor => "motion-descriptor",
            Self::UtilityTheme => "utility-theme",
            Self::ComponentWrapper => "component-wrapper",
            Self::TimelineScript => "timeline-script",
            Self::VectorInterchange => "vector-interchange",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Format {
    type Err = MotionError;

    /// Accepts the canonical identifiers plus the ecosystem shorthands used
    /// by the export dialog.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stylesheet-keyframes" | "css" => Ok(Self::StylesheetKeyframes),
            "motion-descriptor" | "framer" => Ok(Self::MotionDescriptor),
            "utility-theme" | "tailwind" => Ok(Self::UtilityTheme),
            "component-wrapper" | "component" => Ok(Self::ComponentWrapper),
            "timeline-script" | "gsap" => Ok(Self::TimelineScript),
            "vector-interchange" | "lottie" => Ok(Self::VectorInterchange),
            other => Err(MotionError::codegen(format!("unknown format '{other}'"))),
        }
    }
}

/// Everything a generator may consult: the config plus optional
/// sequencer/path/spring context and the active easing mode.
///
/// Stagger delays are resolved once, when the sequencer is attached, from a
/// caller-supplied random source; the generators themselves stay pure.
pub struct GenerateRequest<'a> {
    pub config: &'a AnimationConfig,
    pub sequencer: Option<&'a SequencerConfig>,
    pub stagger_delays: Vec<f64>,
    pub path: Option<&'a MotionPathConfig>,
    pub spring: Option<&'a SpringConfig>,
    pub easing_mode: EasingMode,
    pub component_ref: Option<&'a str>,
}

impl<'a> GenerateRequest<'a> {
    pub fn new(config: &'a AnimationConfig) -> Self {
        Self {
            config,
            sequencer: None,
            stagger_delays: Vec::new(),
            path: None,
            spring: None,
            easing_mode: EasingMode::Preset,
            component_ref: None,
        }
    }

    pub fn with_sequencer(mut self, sequencer: &'a SequencerConfig, rng: &mut impl Rng) -> Self {
        self.stagger_delays = sequencer.delays(rng);
        self.sequencer = Some(sequencer);
        self
    }

    pub fn with_path(mut self, path: &'a MotionPathConfig) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_spring(mut self, spring: &'a SpringConfig) -> Self {
        self.spring = Some(spring);
        self
    }

    pub fn easing_mode(mut self, mode: EasingMode) -> Self {
        self.easing_mode = mode;
        self
    }

    pub fn component_ref(mut self, name: &'a str) -> Self {
        self.component_ref = Some(name);
        self
    }

    pub(crate) fn stagger_active(&self) -> bool {
        self.sequencer.is_some_and(|s| s.enabled) && !self.stagger_delays.is_empty()
    }

    pub(crate) fn path_active(&self) -> bool {
        self.path.is_some_and(|p| p.enabled && p.points.len() >= 2)
    }

    pub(crate) fn spring_active(&self) -> bool {
        self.easing_mode == EasingMode::Spring && self.spring.is_some()
    }

    /// The easing expression generators should emit: the configured one, or
    /// the spring's Bezier approximation when spring mode is active.
    pub(crate) fn effective_easing(&self) -> String {
        match (self.easing_mode, self.spring) {
            (EasingMode::Spring, Some(spring)) => {
                ease::from_control_points(spring::approximate_bezier(spring))
            }
            _ => self.config.easing.clone(),
        }
    }
}

/// Dispatches to one backend. The only entry point external collaborators
/// call at export time.
#[tracing::instrument(skip(request), fields(format = %format))]
pub fn generate(format: Format, request: &GenerateRequest) -> MotionResult<String> {
    request.config.validate()?;
    if let Some(sequencer) = request.sequencer {
        sequencer.validate()?;
    }
    if let Some(path) = request.path {
        path.validate()?;
    }

    match format {
        Format::StylesheetKeyframes => css::generate(request),
        Format::MotionDescriptor => framer::generate(request),
        Format::UtilityTheme => tailwind::generate(request),
        Format::ComponentWrapper => component::generate(request),
        Format::TimelineScript => gsap::generate(request),
        Format::VectorInterchange => lottie::generate(request),
    }
}

/// Formats a number without trailing zeros, at most 3 decimals.
pub(crate) fn fmt_num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

/// Percentage label for a keyframe offset.
pub(crate) fn percent(offset: f64) -> String {
    format!("{}%", fmt_num(offset * 100.0))
}

/// Composes the transform expression for one keyframe in the fixed function
/// order, omitting identity components. `None` when everything is identity.
pub(crate) fn transform_value(kf: &Keyframe) -> Option<String> {
    let mut parts = Vec::new();
    if !kf.perspective_is_default() {
        parts.push(format!(
            "perspective({}px)",
            fmt_num(kf.perspective.unwrap_or(0.0))
        ));
    }
    if !kf.translate_x_is_default() {
        parts.push(format!("translateX({}px)", fmt_num(kf.translate_x)));
    }
    if !kf.translate_y_is_default() {
        parts.push(format!("translateY({}px)", fmt_num(kf.translate_y)));
    }
    if !kf.scale_is_default() {
        parts.push(format!("scale({})", fmt_num(kf.scale)));
    }
    if !kf.rotate_is_default() {
        parts.push(format!("rotate({}deg)", fmt_num(kf.rotate)));
    }
    if !kf.rotate_x_is_default() {
        parts.push(format!("rotateX({}deg)", fmt_num(kf.rotate_x.unwrap_or(0.0))));
    }
    if !kf.rotate_y_is_default() {
        parts.push(format!("rotateY({}deg)", fmt_num(kf.rotate_y.unwrap_or(0.0))));
    }
    if !kf.skew_x_is_default() {
        parts.push(format!("skewX({}deg)", fmt_num(kf.skew_x)));
    }
    if !kf.skew_y_is_default() {
        parts.push(format!("skewY({}deg)", fmt_num(kf.skew_y)));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;

    #[test]
    fn format_ids_roundtrip() {
        for format in Format::ALL {
            assert_eq!(Format::from_str(format.id()).unwrap(), format);
        }
    }

    #[test]
    fn format_accepts_ecosystem_aliases() {
        assert_eq!(
            Format::from_str("css").unwrap(),
            Format::StylesheetKeyframes
        );
        assert_eq!(Format::from_str("lottie").unwrap(), Format::VectorInterchange);
        assert!(Format::from_str("flash").is_err());
    }

    #[test]
    fn fmt_num_trims_trailing_zeros() {
        assert_eq!(fmt_num(0.6), "0.6");
        assert_eq!(fmt_num(20.0), "20");
        assert_eq!(fmt_num(-20.5), "-20.5");
        assert_eq!(fmt_num(0.30000000000004), "0.3");
    }

    #[test]
    fn percent_labels() {
        assert_eq!(percent(0.0), "0%");
        assert_eq!(percent(0.5), "50%");
        assert_eq!(percent(1.0), "100%");
        assert_eq!(percent(0.125), "12.5%");
    }

    #[test]
    fn transform_value_omits_identity_components() {
        assert_eq!(transform_value(&Keyframe::at(0.0)), None);

        let kf = Keyframe {
            translate_y: 20.0,
            scale: 0.9,
            ..Keyframe::at(0.0)
        };
        assert_eq!(
            transform_value(&kf).unwrap(),
            "translateY(20px) scale(0.9)"
        );
    }

    #[test]
    fn transform_value_uses_fixed_function_order() {
        let kf = Keyframe {
            translate_x: 10.0,
            rotate: 45.0,
            perspective: Some(800.0),
            skew_x: 5.0,
            ..Keyframe::at(0.0)
        };
        assert_eq!(
            transform_value(&kf).unwrap(),
            "perspective(800px) translateX(10px) rotate(45deg) skewX(5deg)"
        );
    }

    #[test]
    fn effective_easing_prefers_spring_mode() {
        let config = AnimationConfig::default();
        let spring = SpringConfig::default();
        let request = GenerateRequest::new(&config)
            .with_spring(&spring)
            .easing_mode(EasingMode::Spring);
        assert!(request.effective_easing().starts_with("cubic-bezier("));

        let plain = GenerateRequest::new(&config);
        assert_eq!(plain.effective_easing(), "ease-out");
    }
}
