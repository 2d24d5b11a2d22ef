#![forbid(unsafe_code)]

pub mod codegen;
pub mod ease;
pub mod error;
pub mod model;
pub mod parse;
pub mod path;
pub mod share;
pub mod spring;
pub mod timeline;

pub use codegen::{Format, GenerateRequest, generate};
pub use error::{MotionError, MotionResult};
pub use model::{
    AnimationChain, AnimationConfig, Direction, EasingMode, FillMode, IterationCount, Keyframe,
    MotionPathConfig, PathPoint, SequencerConfig, ShareableState, SpringConfig, StaggerDirection,
};
pub use parse::parse_keyframes;
pub use share::{decode_state, encode_state};
pub use spring::{SpringSample, approximate_bezier, settle_time, solve};
pub use timeline::{PlayState, PropertySet, StaggeredTimeline, Timeline};
