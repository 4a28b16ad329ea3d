//! Tempora is a temporal scene-composition engine.
//!
//! A scene is a tree of nodes that each answer two questions every frame:
//! "am I still active at this time offset?" and "draw yourself". Combinators
//! reshape the time their children see ([`StopAfter`], [`Delay`]), select
//! among candidates ([`AllValid`], [`Sequence`], [`RandomSelect`],
//! [`FirstValidInterrupt`]), or branch on conditions ([`Condition`],
//! [`Trigger`]); a [`StateMachine`] and a [`Particles`] container are built
//! from the same contract. Leaves draw primitives or sample media through the
//! narrow host capabilities in [`host`]; rendering, decoding, tracking, and
//! audio stay on the host's side of that boundary.
//!
//! Everything is single-threaded and frame-driven: the host calls
//! [`Scene::frame`] once per frame, which runs `update` top-down (each
//! combinator recomputing its active child set) and then `draw` over exactly
//! those children.
#![forbid(unsafe_code)]

pub mod branch;
pub mod combinators;
pub mod core;
pub mod decorators;
pub mod error;
pub mod host;
pub mod leaf;
pub mod machine;
pub mod node;
pub mod particles;
pub mod scene;

pub use crate::branch::{Condition, Trigger};
pub use crate::combinators::{
    AllValid, Delay, FirstValidInterrupt, RandomSelect, Sequence, StopAfter,
};
pub use crate::core::{Eval, Point, Rect, Timebase, Vec2, Vec2Attr};
pub use crate::decorators::{
    AttachedPoint, Color, Homography, LineWidth, Rotate, Scale, TargetGate, TimeMode, Translate,
};
pub use crate::error::{TemporaError, TemporaResult};
pub use crate::host::{
    AudioPlayer, Clock, MediaLoader, RenderContext, Target, TargetTracker, Texture, VideoConfig,
};
pub use crate::leaf::{Image, LineStrip, Quad, RectShape, Sound, Video};
pub use crate::machine::{MachineCtl, StateMachine};
pub use crate::node::{Group, Node};
pub use crate::particles::Particles;
pub use crate::scene::Scene;
