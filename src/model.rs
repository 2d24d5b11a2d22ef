use crate::error::{MotionError, MotionResult};

/// Tolerance used by the identity predicates below. Property values closer
/// than this to their identity value are treated as "no visible change" and
/// omitted by every generator.
pub const PROP_EPS: f64 = 1e-4;

pub(crate) fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < PROP_EPS
}

/// One animatable instant: an offset along the timeline plus the
/// transform/opacity state at that instant.
///
/// Offsets live in `[0, 1]` and are conventionally unique per list, but
/// duplicates are tolerated (ties keep their original order when sorted).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Keyframe {
    pub offset: f64,
    pub translate_x: f64, // px
    pub translate_y: f64, // px
    pub scale: f64,
    pub rotate: f64, // deg
    pub skew_x: f64, // deg
    pub skew_y: f64, // deg
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate_x: Option<f64>, // deg, 3-D tilt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate_y: Option<f64>, // deg, 3-D tilt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perspective: Option<f64>, // px
    /// Easing override for the segment that ends at this keyframe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}

impl Default for Keyframe {
    fn default() -> Self {
        Self {
            offset: 0.0,
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            rotate: 0.0,
            skew_x: 0.0,
            skew_y: 0.0,
            opacity: 1.0,
            rotate_x: None,
            rotate_y: None,
            perspective: None,
            easing: None,
        }
    }
}

impl Keyframe {
    pub fn at(offset: f64) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    pub fn translate_x_is_default(&self) -> bool {
        near(self.translate_x, 0.0)
    }

    pub fn translate_y_is_default(&self) -> bool {
        near(self.translate_y, 0.0)
    }

    pub fn scale_is_default(&self) -> bool {
        near(self.scale, 1.0)
    }

    pub fn rotate_is_default(&self) -> bool {
        near(self.rotate, 0.0)
    }

    pub fn skew_x_is_default(&self) -> bool {
        near(self.skew_x, 0.0)
    }

    pub fn skew_y_is_default(&self) -> bool {
        near(self.skew_y, 0.0)
    }

    pub fn opacity_is_default(&self) -> bool {
        near(self.opacity, 1.0)
    }

    pub fn rotate_x_is_default(&self) -> bool {
        self.rotate_x.is_none_or(|v| near(v, 0.0))
    }

    pub fn rotate_y_is_default(&self) -> bool {
        self.rotate_y.is_none_or(|v| near(v, 0.0))
    }

    pub fn perspective_is_default(&self) -> bool {
        self.perspective.is_none_or(|v| near(v, 0.0))
    }

    /// True iff every transform component equals its identity value.
    /// Opacity is not a transform component and is checked separately.
    pub fn is_identity_transform(&self) -> bool {
        self.translate_x_is_default()
            && self.translate_y_is_default()
            && self.scale_is_default()
            && self.rotate_is_default()
            && self.skew_x_is_default()
            && self.skew_y_is_default()
            && self.rotate_x_is_default()
            && self.rotate_y_is_default()
            && self.perspective_is_default()
    }
}

/// Timing envelope around a keyframe list. Owns its keyframes exclusively;
/// chained phases each carry an independent copy.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationConfig {
    pub name: String,
    pub keyframes: Vec<Keyframe>,
    pub duration: f64, // seconds
    #[serde(default)]
    pub delay: f64, // seconds
    pub easing: String,
    #[serde(default)]
    pub iteration_count: IterationCount,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub fill_mode: FillMode,
}

impl Default for AnimationConfig {
    /// The editor's starting preset: fade in while sliding up.
    fn default() -> Self {
        Self {
            name: "fade-up".to_string(),
            keyframes: vec![
                Keyframe {
                    opacity: 0.0,
                    translate_y: 20.0,
                    ..Keyframe::at(0.0)
                },
                Keyframe::at(1.0),
            ],
            duration: 0.6,
            delay: 0.0,
            easing: "ease-out".to_string(),
            iteration_count: IterationCount::Finite(1),
            direction: Direction::Normal,
            fill_mode: FillMode::Forwards,
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> MotionResult<()> {
        if self.name.trim().is_empty() {
            return Err(MotionError::validation("animation name must be non-empty"));
        }
        if self.keyframes.is_empty() {
            return Err(MotionError::validation(
                "animation must have at least one keyframe",
            ));
        }
        if !self.keyframes.iter().any(|k| near(k.offset, 0.0)) {
            return Err(MotionError::validation(
                "animation must have a keyframe at offset 0",
            ));
        }
        for kf in &self.keyframes {
            if !(0.0..=1.0).contains(&kf.offset) {
                return Err(MotionError::validation(format!(
                    "keyframe offset {} is outside [0, 1]",
                    kf.offset
                )));
            }
        }
        if !(self.duration > 0.0) {
            return Err(MotionError::validation("duration must be > 0"));
        }
        if self.delay < 0.0 {
            return Err(MotionError::validation("delay must be >= 0"));
        }
        if self.iteration_count == IterationCount::Finite(0) {
            return Err(MotionError::validation("iteration count must be >= 1"));
        }
        Ok(())
    }

    /// Keyframes sorted ascending by offset, ties keeping original order.
    pub fn sorted_keyframes(&self) -> Vec<Keyframe> {
        let mut keys = self.keyframes.clone();
        keys.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        keys
    }
}

/// Positive pass count or unbounded repetition. Serialized as a bare number
/// or the string `"infinite"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IterationCount {
    Finite(u32),
    Infinite,
}

impl Default for IterationCount {
    fn default() -> Self {
        Self::Finite(1)
    }
}

impl IterationCount {
    pub fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }
}

impl serde::Serialize for IterationCount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(n) => serializer.serialize_u32(*n),
            Self::Infinite => serializer.serialize_str("infinite"),
        }
    }
}

impl<'de> serde::Deserialize<'de> for IterationCount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Count(u32),
            Word(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Count(n) => Ok(Self::Finite(n)),
            Repr::Word(w) if w == "infinite" => Ok(Self::Infinite),
            Repr::Word(w) => Err(serde::de::Error::custom(format!(
                "unknown iteration count '{w}'"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    Normal,
    Reverse,
    Alternate,
    AlternateReverse,
}

impl Direction {
    /// Ping-pong playback is requested by both alternate directions.
    pub fn yoyo(self) -> bool {
        matches!(self, Self::Alternate | Self::AlternateReverse)
    }

    /// The playhead starts reversed for both reverse directions.
    pub fn starts_reversed(self) -> bool {
        matches!(self, Self::Reverse | Self::AlternateReverse)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Reverse => "reverse",
            Self::Alternate => "alternate",
            Self::AlternateReverse => "alternate-reverse",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    None,
    #[default]
    Forwards,
    Backwards,
    Both,
}

impl FillMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Forwards => "forwards",
            Self::Backwards => "backwards",
            Self::Both => "both",
        }
    }
}

/// Physical parameters of a damped harmonic oscillator. Pure value object;
/// the solver is a stateless function of this plus a sample count.
///
/// Caller contract: `mass` and `stiffness` must be > 0 and `damping` >= 0.
/// The solver does not validate and its behavior on out-of-range input is
/// unspecified; the editing surface clamps before calling.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub mass: f64,
    pub stiffness: f64,
    pub damping: f64,
    pub velocity: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 100.0,
            damping: 10.0,
            velocity: 0.0,
        }
    }
}

/// One anchor of a motion path with its incoming (`cx1, cy1`) and outgoing
/// (`cx2, cy2`) control points, all in the same coordinate space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    pub cx1: f64,
    pub cy1: f64,
    pub cx2: f64,
    pub cy2: f64,
}

impl PathPoint {
    pub fn new(x: f64, y: f64, cx1: f64, cy1: f64, cx2: f64, cy2: f64) -> Self {
        Self {
            x,
            y,
            cx1,
            cy1,
            cx2,
            cy2,
        }
    }

    /// Moves the anchor and both control points by the same delta, keeping
    /// the local handle frame rigid.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
        self.cx1 += dx;
        self.cy1 += dy;
        self.cx2 += dx;
        self.cy2 += dy;
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MotionPathConfig {
    pub enabled: bool,
    pub points: Vec<PathPoint>,
    pub auto_rotate: bool,
}

impl MotionPathConfig {
    pub fn validate(&self) -> MotionResult<()> {
        if self.enabled && self.points.len() < 2 {
            return Err(MotionError::validation(
                "motion path must have at least 2 points",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaggerDirection {
    #[default]
    Forward,
    Reverse,
    Center,
    Random,
}

/// Multi-target cascade settings. The per-element delay vector is derived
/// via [`SequencerConfig::delays`], never stored.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    pub enabled: bool,
    pub element_count: u32,
    pub stagger_delay: f64, // seconds
    pub stagger_direction: StaggerDirection,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            element_count: 5,
            stagger_delay: 0.1,
            stagger_direction: StaggerDirection::Forward,
        }
    }
}

impl SequencerConfig {
    pub fn validate(&self) -> MotionResult<()> {
        if self.enabled && self.element_count < 2 {
            return Err(MotionError::validation(
                "sequencer element count must be >= 2",
            ));
        }
        if self.stagger_delay < 0.0 {
            return Err(MotionError::validation("stagger delay must be >= 0"));
        }
        Ok(())
    }

    /// Per-element start delays in seconds. Random delays are drawn from the
    /// injected source so callers control reproducibility.
    pub fn delays<R: rand::Rng>(&self, rng: &mut R) -> Vec<f64> {
        let m = self.element_count as usize;
        let d = self.stagger_delay;
        (0..m)
            .map(|i| match self.stagger_direction {
                StaggerDirection::Forward => i as f64 * d,
                StaggerDirection::Reverse => (m - 1 - i) as f64 * d,
                StaggerDirection::Center => (i as f64 - (m as f64 - 1.0) / 2.0).abs() * d,
                StaggerDirection::Random => rng.r#gen::<f64>() * (m as f64 - 1.0) * d,
            })
            .collect()
    }
}

/// Three animation phases played strictly in sequence when enabled. Each
/// phase owns an independent config (and keyframe list).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationChain {
    pub enabled: bool,
    pub enter: AnimationConfig,
    pub idle: AnimationConfig,
    pub exit: AnimationConfig,
}

impl Default for AnimationChain {
    fn default() -> Self {
        let enter = AnimationConfig {
            name: "enter".to_string(),
            duration: 0.4,
            ..AnimationConfig::default()
        };
        let idle = AnimationConfig {
            name: "idle".to_string(),
            keyframes: vec![
                Keyframe::at(0.0),
                Keyframe {
                    scale: 1.05,
                    ..Keyframe::at(0.5)
                },
                Keyframe::at(1.0),
            ],
            duration: 1.2,
            easing: "ease-in-out".to_string(),
            ..AnimationConfig::default()
        };
        let exit = AnimationConfig {
            name: "exit".to_string(),
            keyframes: vec![
                Keyframe::at(0.0),
                Keyframe {
                    opacity: 0.0,
                    translate_y: -20.0,
                    ..Keyframe::at(1.0)
                },
            ],
            duration: 0.4,
            easing: "ease-in".to_string(),
            ..AnimationConfig::default()
        };
        Self {
            enabled: false,
            enter,
            idle,
            exit,
        }
    }
}

impl AnimationChain {
    pub fn validate(&self) -> MotionResult<()> {
        self.enter.validate()?;
        self.idle.validate()?;
        self.exit.validate()
    }

    pub fn total_duration(&self) -> f64 {
        self.enter.duration + self.idle.duration + self.exit.duration
    }
}

/// Which easing source the editor currently applies. Generators receiving
/// [`EasingMode::Spring`] emit physical parameters where the target format
/// supports them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EasingMode {
    #[default]
    Preset,
    Bezier,
    Spring,
}

/// The full editable state, as shared through the URL codec.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShareableState {
    pub config: AnimationConfig,
    pub spring: SpringConfig,
    pub sequencer: SequencerConfig,
    pub path: MotionPathConfig,
    pub chain: AnimationChain,
    pub easing_mode: EasingMode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng as _;

    #[test]
    fn json_roundtrip() {
        let state = ShareableState::default();
        let s = serde_json::to_string_pretty(&state).unwrap();
        let de: ShareableState = serde_json::from_str(&s).unwrap();
        assert_eq!(de, state);
    }

    #[test]
    fn iteration_count_serde_forms() {
        assert_eq!(
            serde_json::to_string(&IterationCount::Finite(3)).unwrap(),
            "3"
        );
        assert_eq!(
            serde_json::to_string(&IterationCount::Infinite).unwrap(),
            "\"infinite\""
        );
        let inf: IterationCount = serde_json::from_str("\"infinite\"").unwrap();
        assert_eq!(inf, IterationCount::Infinite);
        let n: IterationCount = serde_json::from_str("2").unwrap();
        assert_eq!(n, IterationCount::Finite(2));
        assert!(serde_json::from_str::<IterationCount>("\"forever\"").is_err());
    }

    #[test]
    fn validate_rejects_missing_zero_offset() {
        let mut config = AnimationConfig::default();
        config.keyframes[0].offset = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_offset() {
        let mut config = AnimationConfig::default();
        config.keyframes.push(Keyframe::at(1.5));
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_iterations() {
        let config = AnimationConfig {
            iteration_count: IterationCount::Finite(0),
            ..AnimationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn sorted_keyframes_is_stable_for_ties() {
        let config = AnimationConfig {
            keyframes: vec![
                Keyframe {
                    opacity: 0.25,
                    ..Keyframe::at(0.5)
                },
                Keyframe::at(0.0),
                Keyframe {
                    opacity: 0.75,
                    ..Keyframe::at(0.5)
                },
            ],
            ..AnimationConfig::default()
        };
        let sorted = config.sorted_keyframes();
        assert_eq!(sorted[0].offset, 0.0);
        assert_eq!(sorted[1].opacity, 0.25);
        assert_eq!(sorted[2].opacity, 0.75);
    }

    #[test]
    fn identity_predicate_ignores_opacity() {
        let kf = Keyframe {
            opacity: 0.0,
            ..Keyframe::at(0.0)
        };
        assert!(kf.is_identity_transform());
        assert!(!kf.opacity_is_default());

        let moved = Keyframe {
            translate_x: 5.0,
            ..Keyframe::at(0.0)
        };
        assert!(!moved.is_identity_transform());
    }

    #[test]
    fn path_point_translate_is_rigid() {
        let mut p = PathPoint::new(10.0, 20.0, 5.0, 15.0, 15.0, 25.0);
        p.translate(3.0, -2.0);
        assert_eq!((p.x, p.y), (13.0, 18.0));
        assert_eq!((p.cx1, p.cy1), (8.0, 13.0));
        assert_eq!((p.cx2, p.cy2), (18.0, 23.0));
    }

    #[test]
    fn forward_and_center_delays_match_expected_vectors() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let forward = SequencerConfig {
            enabled: true,
            element_count: 5,
            stagger_delay: 0.1,
            stagger_direction: StaggerDirection::Forward,
        };
        let d = forward.delays(&mut rng);
        let expect = [0.0, 0.1, 0.2, 0.3, 0.4];
        for (got, want) in d.iter().zip(expect) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }

        let center = SequencerConfig {
            stagger_direction: StaggerDirection::Center,
            ..forward
        };
        let d = center.delays(&mut rng);
        let expect = [0.2, 0.1, 0.0, 0.1, 0.2];
        for (got, want) in d.iter().zip(expect) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }

    #[test]
    fn random_delays_stay_in_range() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let cfg = SequencerConfig {
            enabled: true,
            element_count: 5,
            stagger_delay: 0.1,
            stagger_direction: StaggerDirection::Random,
        };
        for d in cfg.delays(&mut rng) {
            assert!((0.0..=0.4).contains(&d), "delay {d} out of range");
        }
    }

    #[test]
    fn reverse_delays_descend() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let cfg = SequencerConfig {
            enabled: true,
            element_count: 3,
            stagger_delay: 0.2,
            stagger_direction: StaggerDirection::Reverse,
        };
        let d = cfg.delays(&mut rng);
        assert!((d[0] - 0.4).abs() < 1e-9);
        assert!((d[2] - 0.0).abs() < 1e-9);
    }
}
