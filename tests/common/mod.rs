//! Mock host capabilities shared by the integration tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use tempora::{
    AudioPlayer, MediaLoader, Node, Point, Rect, RenderContext, Target, TargetTracker,
    TemporaError, TemporaResult, Texture, Timebase, Vec2, VideoConfig,
};

/// Render context that records stack depths and draw calls instead of
/// rasterizing.
#[derive(Default)]
pub struct RecordingGfx {
    pub color_depth: i32,
    pub width_depth: i32,
    pub transform_depth: i32,
    pub max_transform_depth: i32,
    pub ops: Vec<String>,
    texture: Option<Rc<dyn Texture>>,
}

impl RecordingGfx {
    pub fn balanced(&self) -> bool {
        self.color_depth == 0 && self.width_depth == 0 && self.transform_depth == 0
    }

    fn push_transform_op(&mut self, op: &str) {
        self.transform_depth += 1;
        self.max_transform_depth = self.max_transform_depth.max(self.transform_depth);
        self.ops.push(op.to_owned());
    }
}

impl RenderContext for RecordingGfx {
    fn push_color(&mut self, _rgba: [f64; 4]) {
        self.color_depth += 1;
        self.ops.push("push_color".to_owned());
    }

    fn pop_color(&mut self) {
        self.color_depth -= 1;
        self.ops.push("pop_color".to_owned());
    }

    fn push_line_width(&mut self, _width: f64) {
        self.width_depth += 1;
        self.ops.push("push_line_width".to_owned());
    }

    fn pop_line_width(&mut self) {
        self.width_depth -= 1;
        self.ops.push("pop_line_width".to_owned());
    }

    fn push_translate(&mut self, _offset: Vec2) {
        self.push_transform_op("push_translate");
    }

    fn push_scale(&mut self, _factors: Vec2) {
        self.push_transform_op("push_scale");
    }

    fn push_rotate(&mut self, _angle_deg: f64, _pivot: Point) {
        self.push_transform_op("push_rotate");
    }

    fn push_homography(&mut self, _src: &[Point; 4], _dst: &[Point; 4]) {
        self.push_transform_op("push_homography");
    }

    fn pop_transform(&mut self) {
        self.transform_depth -= 1;
        self.ops.push("pop_transform".to_owned());
    }

    fn draw_quad(&mut self, _corners: &[Point; 4]) {
        self.ops.push("draw_quad".to_owned());
    }

    fn draw_line_strip(&mut self, points: &[Point]) {
        self.ops.push(format!("draw_line_strip({})", points.len()));
    }

    fn draw_rect(&mut self, _rect: Rect) {
        self.ops.push("draw_rect".to_owned());
    }

    fn active_texture(&self) -> Option<Rc<dyn Texture>> {
        self.texture.clone()
    }

    fn set_texture(&mut self, texture: Option<Rc<dyn Texture>>) {
        self.ops.push(match &texture {
            Some(_) => "set_texture".to_owned(),
            None => "clear_texture".to_owned(),
        });
        self.texture = texture;
    }
}

/// Texture stub exposing seekable video state.
#[derive(Default)]
pub struct FakeTexture {
    pub first: u32,
    pub last: u32,
    pub video_time: Cell<Timebase>,
    pub loop_from: Cell<u32>,
}

impl Texture for FakeTexture {
    fn set_video_time(&self, t: Timebase) {
        self.video_time.set(t);
    }

    fn first_frame(&self) -> u32 {
        self.first
    }

    fn last_frame(&self) -> u32 {
        self.last
    }

    fn set_loop_from(&self, frame: u32) {
        self.loop_from.set(frame);
    }
}

/// Loader knowing a fixed set of asset names; everything else is missing.
pub struct FakeLoader {
    pub images: HashSet<String>,
    pub video_frames: u32,
    pub last_video: Option<Rc<FakeTexture>>,
}

impl FakeLoader {
    pub fn with_images(names: &[&str]) -> Self {
        Self {
            images: names.iter().map(|s| (*s).to_owned()).collect(),
            video_frames: 30,
            last_video: None,
        }
    }
}

impl MediaLoader for FakeLoader {
    fn load_image(&mut self, name: &str) -> TemporaResult<Rc<dyn Texture>> {
        if !self.images.contains(name) {
            return Err(TemporaError::resource(format!("image '{name}' not found")));
        }
        Ok(Rc::new(FakeTexture::default()))
    }

    fn open_video(&mut self, config: &VideoConfig) -> TemporaResult<Rc<dyn Texture>> {
        if !self.images.contains(config.name.as_str()) {
            return Err(TemporaError::resource(format!(
                "video '{}' not found",
                config.name
            )));
        }
        let tex = Rc::new(FakeTexture {
            first: 0,
            last: self.video_frames,
            ..FakeTexture::default()
        });
        self.last_video = Some(tex.clone());
        Ok(tex)
    }
}

/// Scriptable tracked target: flip `detected` and advance `since_appeared`
/// from the test body.
#[derive(Default)]
pub struct FakeTarget {
    pub is_detected: Cell<bool>,
    pub since_appeared: Cell<Timebase>,
}

impl Target for FakeTarget {
    fn detected(&self) -> bool {
        self.is_detected.get()
    }

    fn since_last_appeared(&self) -> Timebase {
        self.since_appeared.get()
    }

    fn push_transform(&self, gfx: &mut dyn RenderContext) {
        gfx.push_translate(Vec2::ZERO);
    }

    fn pop_transform(&self, gfx: &mut dyn RenderContext) {
        gfx.pop_transform();
    }
}

pub struct FakeTracker {
    pub targets: Vec<(u32, Rc<FakeTarget>)>,
}

impl FakeTracker {
    pub fn single(id: u32) -> (Self, Rc<FakeTarget>) {
        let target = Rc::new(FakeTarget::default());
        (
            Self {
                targets: vec![(id, target.clone())],
            },
            target,
        )
    }
}

impl TargetTracker for FakeTracker {
    fn target(&self, id: u32) -> Option<Rc<dyn Target>> {
        self.targets
            .iter()
            .find(|(tid, _)| *tid == id)
            .map(|(_, t)| t.clone() as Rc<dyn Target>)
    }
}

#[derive(Default)]
pub struct FakeAudio {
    pub played: Vec<String>,
}

impl AudioPlayer for FakeAudio {
    fn play(&mut self, name: &str) {
        self.played.push(name.to_owned());
    }
}

/// Leaf that stays alive for `ttl` seconds of relative time and counts its
/// draws, used to observe which candidate a selector picked.
pub struct TagLeaf {
    ttl: Timebase,
    pub draws: Rc<Cell<usize>>,
}

impl TagLeaf {
    pub fn new(ttl: Timebase) -> (Box<dyn Node>, Rc<Cell<usize>>) {
        let draws = Rc::new(Cell::new(0));
        (
            Box::new(Self {
                ttl,
                draws: draws.clone(),
            }),
            draws,
        )
    }
}

impl Node for TagLeaf {
    fn update(&mut self, t: Timebase) -> bool {
        t < self.ttl
    }

    fn draw(&self, _gfx: &mut dyn RenderContext) {
        self.draws.set(self.draws.get() + 1);
    }

    fn node_name(&self) -> &'static str {
        "TagLeaf"
    }
}
