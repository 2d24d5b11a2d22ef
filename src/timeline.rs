//! Playable timelines built from the keyframe IR.
//!
//! A timeline is a pure state machine: an external frame driver calls
//! [`Timeline::advance`] with elapsed seconds and the timeline reports pass
//! progress through its update callback. No timers or scheduling live here;
//! the owning preview surface is responsible for its own frame source.

use rand::Rng;

use crate::{
    ease,
    error::{MotionError, MotionResult},
    model::{
        AnimationChain, AnimationConfig, IterationCount, Keyframe, MotionPathConfig,
        SequencerConfig,
    },
    path::{self, PATH_STEPS},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// Resolved numeric property state at one instant of playback. Optional
/// keyframe fields collapse to their identity values here.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PropertySet {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub rotate: f64,
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub skew_x: f64,
    pub skew_y: f64,
    pub perspective: f64,
    pub opacity: f64,
}

impl Default for PropertySet {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            rotate: 0.0,
            rotate_x: 0.0,
            rotate_y: 0.0,
            skew_x: 0.0,
            skew_y: 0.0,
            perspective: 0.0,
            opacity: 1.0,
        }
    }
}

impl From<&Keyframe> for PropertySet {
    fn from(kf: &Keyframe) -> Self {
        Self {
            translate_x: kf.translate_x,
            translate_y: kf.translate_y,
            scale: kf.scale,
            rotate: kf.rotate,
            rotate_x: kf.rotate_x.unwrap_or(0.0),
            rotate_y: kf.rotate_y.unwrap_or(0.0),
            skew_x: kf.skew_x,
            skew_y: kf.skew_y,
            perspective: kf.perspective.unwrap_or(0.0),
            opacity: kf.opacity,
        }
    }
}

impl Lerp for PropertySet {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            translate_x: f64::lerp(&a.translate_x, &b.translate_x, t),
            translate_y: f64::lerp(&a.translate_y, &b.translate_y, t),
            scale: f64::lerp(&a.scale, &b.scale, t),
            rotate: f64::lerp(&a.rotate, &b.rotate, t),
            rotate_x: f64::lerp(&a.rotate_x, &b.rotate_x, t),
            rotate_y: f64::lerp(&a.rotate_y, &b.rotate_y, t),
            skew_x: f64::lerp(&a.skew_x, &b.skew_x, t),
            skew_y: f64::lerp(&a.skew_y, &b.skew_y, t),
            perspective: f64::lerp(&a.perspective, &b.perspective, t),
            opacity: f64::lerp(&a.opacity, &b.opacity, t),
        }
    }
}

/// One span between two consecutive keyframes. Segments are concatenated,
/// never blended; the only smoothing is the per-segment easing.
#[derive(Clone, Debug)]
pub struct Segment {
    pub start: f64, // normalized offset within one pass
    pub end: f64,
    pub from: PropertySet,
    pub to: PropertySet,
    pub ease: [f64; 4],
}

impl Segment {
    fn sample(&self, progress: f64) -> PropertySet {
        let span = self.end - self.start;
        if span <= f64::EPSILON {
            return self.to;
        }
        let local = ((progress - self.start) / span).clamp(0.0, 1.0);
        PropertySet::lerp(&self.from, &self.to, ease::evaluate(self.ease, local))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Playing,
    Paused,
    Finished,
    Killed,
}

type UpdateFn = Box<dyn FnMut(f64)>;

/// A playable multi-segment timeline for a single target.
pub struct Timeline {
    initial: PropertySet,
    segments: Vec<Segment>,
    duration: f64, // one pass, seconds
    delay: f64,
    iterations: IterationCount,
    yoyo: bool,
    start_reversed: bool,
    elapsed: f64,
    progress: f64,
    state: PlayState,
    on_update: Option<UpdateFn>,
}

fn segments_for(config: &AnimationConfig) -> MotionResult<(PropertySet, Vec<Segment>)> {
    config.validate()?;
    let keys = config.sorted_keyframes();
    let initial = PropertySet::from(&keys[0]);
    let segments = keys
        .windows(2)
        .map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            let easing = b.easing.as_deref().unwrap_or(&config.easing);
            Segment {
                start: a.offset,
                end: b.offset,
                from: PropertySet::from(a),
                to: PropertySet::from(b),
                ease: ease::to_control_points(easing),
            }
        })
        .collect();
    Ok((initial, segments))
}

impl Timeline {
    /// Builds a playable timeline from a validated config. The target's
    /// starting state is the lowest-offset keyframe; each consecutive pair
    /// becomes one segment whose duration is its offset span times the total
    /// duration, eased by that keyframe's override or the timeline easing.
    pub fn build(config: &AnimationConfig) -> MotionResult<Self> {
        let (initial, segments) = segments_for(config)?;
        Ok(Self {
            initial,
            segments,
            duration: config.duration,
            delay: config.delay,
            iterations: config.iteration_count,
            yoyo: config.direction.yoyo(),
            start_reversed: config.direction.starts_reversed(),
            elapsed: 0.0,
            progress: 0.0,
            state: PlayState::Idle,
            on_update: None,
        })
    }

    /// Appends the enter, idle and exit phases strictly end-to-end with no
    /// gap; total duration is the sum of the three phase durations.
    pub fn build_chain(chain: &AnimationChain) -> MotionResult<Self> {
        chain.validate()?;
        let total = chain.total_duration();
        if !(total > 0.0) {
            return Err(MotionError::validation("chain total duration must be > 0"));
        }

        let mut initial = None;
        let mut segments = Vec::new();
        let mut acc = 0.0;
        for phase in [&chain.enter, &chain.idle, &chain.exit] {
            let (phase_initial, phase_segments) = segments_for(phase)?;
            initial.get_or_insert(phase_initial);
            for seg in phase_segments {
                segments.push(Segment {
                    start: (acc + seg.start * phase.duration) / total,
                    end: (acc + seg.end * phase.duration) / total,
                    ..seg
                });
            }
            acc += phase.duration;
        }

        Ok(Self {
            initial: initial.unwrap_or_default(),
            segments,
            duration: total,
            delay: 0.0,
            iterations: IterationCount::Finite(1),
            yoyo: false,
            start_reversed: false,
            elapsed: 0.0,
            progress: 0.0,
            state: PlayState::Idle,
            on_update: None,
        })
    }

    /// Resamples the path into implicit position keyframes: equal-duration
    /// linear segments, except the final segment which takes the configured
    /// easing so arrival decelerates naturally. With `auto_rotate`, each
    /// segment holds the heading between its two samples.
    pub fn build_path(config: &AnimationConfig, path_cfg: &MotionPathConfig) -> MotionResult<Self> {
        config.validate()?;
        path_cfg.validate()?;
        if path_cfg.points.len() < 2 {
            return Err(MotionError::validation(
                "motion path must have at least 2 points",
            ));
        }

        let samples = path::sample_evenly(&path_cfg.points, PATH_STEPS);
        let steps = samples.len() - 1;
        let at = |p: kurbo::Point, rotate: f64| PropertySet {
            translate_x: p.x,
            translate_y: p.y,
            rotate,
            ..PropertySet::default()
        };

        let mut segments = Vec::with_capacity(steps);
        for i in 0..steps {
            let rotate = if path_cfg.auto_rotate {
                path::tangent_angle(samples[i], samples[i + 1])
            } else {
                0.0
            };
            let ease = if i == steps - 1 {
                ease::to_control_points(&config.easing)
            } else {
                ease::LINEAR
            };
            segments.push(Segment {
                start: i as f64 / steps as f64,
                end: (i + 1) as f64 / steps as f64,
                from: at(samples[i], rotate),
                to: at(samples[i + 1], rotate),
                ease,
            });
        }

        let initial = segments[0].from;
        Ok(Self {
            initial,
            segments,
            duration: config.duration,
            delay: config.delay,
            iterations: config.iteration_count,
            yoyo: config.direction.yoyo(),
            start_reversed: config.direction.starts_reversed(),
            elapsed: 0.0,
            progress: 0.0,
            state: PlayState::Idle,
            on_update: None,
        })
    }

    /// Registers the single hook driving visual synchronization. Called with
    /// the current pass progress in `[0, 1]` whenever it changes.
    pub fn on_update(&mut self, f: impl FnMut(f64) + 'static) {
        self.on_update = Some(Box::new(f));
    }

    pub fn play(&mut self) {
        if !matches!(self.state, PlayState::Killed) {
            self.state = PlayState::Playing;
        }
    }

    pub fn pause(&mut self) {
        if matches!(self.state, PlayState::Playing) {
            self.state = PlayState::Paused;
        }
    }

    /// Direct progress assignment. Idempotent: seeking twice to the same
    /// value yields the same rendered state and no duplicate callback.
    pub fn seek(&mut self, progress: f64) {
        if matches!(self.state, PlayState::Killed) {
            return;
        }
        let progress = progress.clamp(0.0, 1.0);
        self.elapsed = self.delay + progress * self.duration;
        self.set_progress(progress);
    }

    /// Advances playback by `dt` seconds and returns the current progress.
    /// A no-op unless playing.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if matches!(self.state, PlayState::Playing) {
            self.elapsed += dt.max(0.0);
            self.recompute();
        }
        self.progress
    }

    /// Stops emitting updates and leaves the last rendered state in place.
    pub fn kill(&mut self) {
        self.state = PlayState::Killed;
        self.on_update = None;
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    /// One pass in seconds, excluding delay and repeats.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Re-derives progress from an externally assigned clock. Used by master
    /// timelines that schedule this one as a child.
    pub(crate) fn sync(&mut self, elapsed: f64) {
        if matches!(self.state, PlayState::Killed) {
            return;
        }
        self.elapsed = elapsed;
        self.recompute();
    }

    fn recompute(&mut self) {
        let local = (self.elapsed - self.delay).max(0.0);
        let raw = local / self.duration;

        let (pass, frac) = match self.iterations {
            IterationCount::Infinite => (raw.floor(), raw.fract()),
            IterationCount::Finite(n) => {
                if raw >= f64::from(n) {
                    self.state = PlayState::Finished;
                    (f64::from(n) - 1.0, 1.0)
                } else {
                    (raw.floor(), raw.fract())
                }
            }
        };

        let odd_pass = (pass as u64) % 2 == 1;
        let reversed = self.start_reversed ^ (self.yoyo && odd_pass);
        let progress = if reversed { 1.0 - frac } else { frac };
        self.set_progress(progress);
    }

    fn set_progress(&mut self, progress: f64) {
        if (progress - self.progress).abs() < f64::EPSILON {
            return;
        }
        self.progress = progress;
        if let Some(f) = self.on_update.as_mut() {
            f(progress);
        }
    }

    /// Property state at an arbitrary pass progress, independent of playback.
    pub fn sample(&self, progress: f64) -> PropertySet {
        let progress = progress.clamp(0.0, 1.0);
        let Some(first) = self.segments.first() else {
            return self.initial;
        };
        if progress <= first.start {
            return first.from;
        }
        if let Some(last) = self.segments.last()
            && progress >= last.end
        {
            return last.to;
        }
        for seg in &self.segments {
            if progress >= seg.start && progress <= seg.end {
                return seg.sample(progress);
            }
        }
        self.initial
    }

    /// Property state at the current playhead.
    pub fn current(&self) -> PropertySet {
        self.sample(self.progress)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// One master timeline scheduling the same animation across several targets,
/// each offset by its stagger delay. The master's callback reports only the
/// master span, never the children's.
pub struct StaggeredTimeline {
    children: Vec<Timeline>,
    total: f64,
    elapsed: f64,
    progress: f64,
    state: PlayState,
    on_update: Option<UpdateFn>,
}

impl StaggeredTimeline {
    pub fn build(
        config: &AnimationConfig,
        sequencer: &SequencerConfig,
        rng: &mut impl Rng,
    ) -> MotionResult<Self> {
        sequencer.validate()?;
        if sequencer.element_count < 2 {
            return Err(MotionError::validation(
                "sequencer element count must be >= 2",
            ));
        }

        let delays = sequencer.delays(rng);
        let mut children = Vec::with_capacity(delays.len());
        let mut max_delay = 0.0f64;
        for d in &delays {
            let mut child = Timeline::build(config)?;
            child.delay += d;
            max_delay = max_delay.max(*d);
            children.push(child);
        }

        let total = config.delay + max_delay + config.duration;
        Ok(Self {
            children,
            total,
            elapsed: 0.0,
            progress: 0.0,
            state: PlayState::Idle,
            on_update: None,
        })
    }

    pub fn on_update(&mut self, f: impl FnMut(f64) + 'static) {
        self.on_update = Some(Box::new(f));
    }

    pub fn play(&mut self) {
        if !matches!(self.state, PlayState::Killed) {
            self.state = PlayState::Playing;
            for child in &mut self.children {
                child.play();
            }
        }
    }

    pub fn pause(&mut self) {
        if matches!(self.state, PlayState::Playing) {
            self.state = PlayState::Paused;
            for child in &mut self.children {
                child.pause();
            }
        }
    }

    pub fn seek(&mut self, progress: f64) {
        if matches!(self.state, PlayState::Killed) {
            return;
        }
        let progress = progress.clamp(0.0, 1.0);
        self.elapsed = progress * self.total;
        for child in &mut self.children {
            child.sync(self.elapsed);
        }
        self.set_progress(progress);
    }

    pub fn advance(&mut self, dt: f64) -> f64 {
        if matches!(self.state, PlayState::Playing) {
            self.elapsed += dt.max(0.0);
            for child in &mut self.children {
                child.sync(self.elapsed);
            }
            let progress = (self.elapsed / self.total).clamp(0.0, 1.0);
            if progress >= 1.0 {
                self.state = PlayState::Finished;
            }
            self.set_progress(progress);
        }
        self.progress
    }

    pub fn kill(&mut self) {
        self.state = PlayState::Killed;
        self.on_update = None;
        for child in &mut self.children {
            child.kill();
        }
    }

    fn set_progress(&mut self, progress: f64) {
        if (progress - self.progress).abs() < f64::EPSILON {
            return;
        }
        self.progress = progress;
        if let Some(f) = self.on_update.as_mut() {
            f(progress);
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Master span in seconds: base delay + largest stagger delay + one pass.
    pub fn total_duration(&self) -> f64 {
        self.total
    }

    pub fn element_count(&self) -> usize {
        self.children.len()
    }

    pub fn element_progress(&self, index: usize) -> Option<f64> {
        self.children.get(index).map(Timeline::progress)
    }

    pub fn sample_element(&self, index: usize) -> Option<PropertySet> {
        self.children.get(index).map(Timeline::current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, StaggerDirection};
    use rand::SeedableRng as _;
    use std::{cell::RefCell, rc::Rc};

    fn two_step() -> AnimationConfig {
        AnimationConfig {
            keyframes: vec![
                Keyframe {
                    opacity: 0.0,
                    translate_y: 20.0,
                    ..Keyframe::at(0.0)
                },
                Keyframe::at(1.0),
            ],
            duration: 1.0,
            ..AnimationConfig::default()
        }
    }

    #[test]
    fn endpoints_render_exact_keyframe_values() {
        let tl = Timeline::build(&two_step()).unwrap();
        let start = tl.sample(0.0);
        assert_eq!(start.opacity, 0.0);
        assert_eq!(start.translate_y, 20.0);
        let end = tl.sample(1.0);
        assert_eq!(end.opacity, 1.0);
        assert_eq!(end.translate_y, 0.0);
    }

    #[test]
    fn per_keyframe_easing_overrides_timeline_easing() {
        let mut config = two_step();
        config.easing = "ease-in".to_string();
        config.keyframes[1].easing = Some("linear".to_string());
        let tl = Timeline::build(&config).unwrap();
        // A linear override at the midpoint interpolates exactly halfway;
        // ease-in would land well below.
        assert!((tl.sample(0.5).opacity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn advance_reports_progress_through_callback() {
        let mut tl = Timeline::build(&two_step()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        tl.on_update(move |p| sink.borrow_mut().push(p));

        tl.play();
        tl.advance(0.25);
        tl.advance(0.25);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!((seen[0] - 0.25).abs() < 1e-9);
        assert!((seen[1] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn delay_holds_progress_at_zero() {
        let mut config = two_step();
        config.delay = 0.5;
        let mut tl = Timeline::build(&config).unwrap();
        tl.play();
        assert_eq!(tl.advance(0.4), 0.0);
        assert!((tl.advance(0.6) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn seek_is_idempotent() {
        let mut tl = Timeline::build(&two_step()).unwrap();
        tl.seek(0.3);
        let first = tl.current();
        tl.seek(0.3);
        assert_eq!(tl.current(), first);
        assert!((tl.progress() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn finite_iterations_finish_at_full_progress() {
        let mut tl = Timeline::build(&two_step()).unwrap();
        tl.play();
        tl.advance(2.5);
        assert_eq!(tl.state(), PlayState::Finished);
        assert!((tl.progress() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn alternate_direction_reverses_odd_passes() {
        let config = AnimationConfig {
            direction: Direction::Alternate,
            iteration_count: IterationCount::Finite(2),
            ..two_step()
        };
        let mut tl = Timeline::build(&config).unwrap();
        tl.play();
        // Second pass, one quarter in: the playhead runs backwards.
        tl.advance(1.25);
        assert!((tl.progress() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn reverse_direction_starts_at_end() {
        let config = AnimationConfig {
            direction: Direction::Reverse,
            ..two_step()
        };
        let mut tl = Timeline::build(&config).unwrap();
        tl.play();
        tl.advance(0.25);
        assert!((tl.progress() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn killed_timeline_stops_reporting() {
        let mut tl = Timeline::build(&two_step()).unwrap();
        let count = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&count);
        tl.on_update(move |_| *sink.borrow_mut() += 1);
        tl.play();
        tl.advance(0.25);
        tl.kill();
        tl.advance(0.25);
        tl.play();
        tl.advance(0.25);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn stagger_orders_elements_by_delay() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let sequencer = SequencerConfig {
            enabled: true,
            element_count: 3,
            stagger_delay: 0.2,
            stagger_direction: StaggerDirection::Forward,
        };
        let mut master = StaggeredTimeline::build(&two_step(), &sequencer, &mut rng).unwrap();
        master.play();
        master.advance(0.5);

        let first = master.element_progress(0).unwrap();
        let last = master.element_progress(2).unwrap();
        assert!(first > last, "element 0 ({first}) should lead ({last})");
        assert!((master.total_duration() - 1.4).abs() < 1e-9);
    }

    #[test]
    fn master_reports_only_its_own_span() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        let sequencer = SequencerConfig {
            enabled: true,
            element_count: 2,
            stagger_delay: 0.5,
            stagger_direction: StaggerDirection::Forward,
        };
        let mut master = StaggeredTimeline::build(&two_step(), &sequencer, &mut rng).unwrap();
        master.play();
        // Half of the 1.5 s master span; child 0 is already at 0.75.
        master.advance(0.75);
        assert!((master.progress() - 0.5).abs() < 1e-9);
        assert!((master.element_progress(0).unwrap() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn chain_appends_phases_gaplessly() {
        let chain = AnimationChain {
            enabled: true,
            ..AnimationChain::default()
        };
        let tl = Timeline::build_chain(&chain).unwrap();
        assert!((tl.duration() - 2.0).abs() < 1e-9);

        // End of the enter phase: fully faded in.
        let enter_end = chain.enter.duration / chain.total_duration();
        assert!((tl.sample(enter_end).opacity - 1.0).abs() < 1e-6);
        // End of the exit phase: faded out and lifted.
        let end = tl.sample(1.0);
        assert!((end.opacity - 0.0).abs() < 1e-6);
        assert!((end.translate_y - -20.0).abs() < 1e-6);
    }

    #[test]
    fn path_timeline_tracks_anchors() {
        let config = two_step();
        let path_cfg = MotionPathConfig {
            enabled: true,
            points: crate::path::template_line(),
            auto_rotate: false,
        };
        let tl = Timeline::build_path(&config, &path_cfg).unwrap();
        assert_eq!(tl.segments().len(), PATH_STEPS);

        let start = tl.sample(0.0);
        assert!((start.translate_x - 20.0).abs() < 1e-6);
        let end = tl.sample(1.0);
        assert!((end.translate_x - 280.0).abs() < 1e-6);
        assert!((end.translate_y - 150.0).abs() < 1e-6);
    }

    #[test]
    fn path_auto_rotate_follows_heading() {
        let config = two_step();
        let path_cfg = MotionPathConfig {
            enabled: true,
            points: crate::path::template_line(),
            auto_rotate: true,
        };
        let tl = Timeline::build_path(&config, &path_cfg).unwrap();
        // A left-to-right horizontal sweep has heading 0 throughout.
        assert!(tl.sample(0.5).rotate.abs() < 1e-6);
    }
}
