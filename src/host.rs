//! Capabilities consumed from the host.
//!
//! The engine orchestrates *when* and *in what transformed context* leaves
//! render; everything that actually touches pixels, decoders, trackers, or
//! speakers lives behind these traits. All of them are single-threaded and
//! frame-synchronous (see the crate docs for the concurrency model).

use crate::core::{Point, Rect, Timebase, Vec2};
use crate::error::{TemporaError, TemporaResult};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Monotonic elapsed-time source driving the scene root.
pub trait Clock {
    fn elapsed(&self) -> Timebase;
}

/// Frame or texture handle owned by the host's media subsystem.
///
/// Static images ignore the video-specific calls; the default impls report a
/// single frame at index 0.
pub trait Texture {
    /// Seek video playback to `t` seconds into the stream. No-op for images.
    fn set_video_time(&self, _t: Timebase) {}

    fn first_frame(&self) -> u32 {
        0
    }

    fn last_frame(&self) -> u32 {
        0
    }

    /// Frame index the stream rewinds to when looping.
    fn set_loop_from(&self, _frame: u32) {}
}

/// Implicit rendering-context stack.
///
/// Discipline is strict push-before-recurse, pop-after-recurse on every code
/// path; decorators rely on it to keep sibling subtrees isolated.
pub trait RenderContext {
    fn push_color(&mut self, rgba: [f64; 4]);
    fn pop_color(&mut self);

    fn push_line_width(&mut self, width: f64);
    fn pop_line_width(&mut self);

    fn push_translate(&mut self, offset: Vec2);
    fn push_scale(&mut self, factors: Vec2);
    /// Rotation in degrees around `pivot`.
    fn push_rotate(&mut self, angle_deg: f64, pivot: Point);
    /// Push the homography mapping the four `src` points onto `dst`.
    fn push_homography(&mut self, src: &[Point; 4], dst: &[Point; 4]);
    /// Pops whatever transform was pushed last (translate, scale, rotate, or
    /// homography).
    fn pop_transform(&mut self);

    fn draw_quad(&mut self, corners: &[Point; 4]);
    fn draw_line_strip(&mut self, points: &[Point]);
    fn draw_rect(&mut self, rect: Rect);

    fn active_texture(&self) -> Option<Rc<dyn Texture>>;
    fn set_texture(&mut self, texture: Option<Rc<dyn Texture>>);
}

/// Parameters for opening a frame-sequence video.
///
/// `start`/`stop` of `-1` mean "use the stream's own bounds", mirroring the
/// host decoder's convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub name: String,
    pub fps: f64,
    pub looped: bool,
    pub start: i64,
    pub stop: i64,
    pub loop_from: u32,
    pub extend_last_frame: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            fps: 15.0,
            looped: false,
            start: -1,
            stop: -1,
            loop_from: 0,
            extend_last_frame: false,
        }
    }
}

impl VideoConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> TemporaResult<()> {
        if self.name.is_empty() {
            return Err(TemporaError::config("video name must not be empty"));
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(TemporaError::config(format!(
                "video fps must be positive, got {}",
                self.fps
            )));
        }
        Ok(())
    }
}

/// Texture and video loading. Missing assets are fatal at leaf construction;
/// the engine never retries or substitutes placeholders.
pub trait MediaLoader {
    fn load_image(&mut self, name: &str) -> TemporaResult<Rc<dyn Texture>>;
    fn open_video(&mut self, config: &VideoConfig) -> TemporaResult<Rc<dyn Texture>>;
}

/// Handle onto one tracked target, resolved from a [`TargetTracker`].
pub trait Target {
    fn detected(&self) -> bool;

    fn lost(&self) -> bool {
        !self.detected()
    }

    /// Seconds since the target last re-entered the view.
    fn since_last_appeared(&self) -> Timebase;

    /// Register a hook fired when the target reappears.
    fn on_appeared(&self, _hook: Box<dyn FnMut()>) {}

    /// Push / pop the target's estimated pose transform.
    fn push_transform(&self, gfx: &mut dyn RenderContext);
    fn pop_transform(&self, gfx: &mut dyn RenderContext);

    /// 2D motion of the target relative to `reference`, in units per second.
    fn speed(&self, _reference: Point) -> Vec2 {
        Vec2::ZERO
    }
}

/// Resolves numeric target ids to handles. Unknown ids are a configuration
/// error at scene-assembly time.
pub trait TargetTracker {
    fn target(&self, id: u32) -> Option<Rc<dyn Target>>;
}

/// Fire-and-forget sound playback.
pub trait AudioPlayer {
    fn play(&mut self, name: &str);
}
