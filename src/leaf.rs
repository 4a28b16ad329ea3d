//! Terminal nodes: concrete renderable primitives and media-backed leaves.
//!
//! Leaves evaluate their attributes during `update` and emit host drawing
//! calls during `draw`. Missing media assets are fatal at construction; the
//! engine never substitutes placeholders.

use crate::core::{Eval, Point, Timebase};
use crate::error::TemporaResult;
use crate::host::{AudioPlayer, MediaLoader, RenderContext, Texture, VideoConfig};
use crate::node::{Node, draw_all, print_all, print_header, update_all};
use std::cell::RefCell;
use std::rc::Rc;

enum QuadAttr {
    Points([Eval<Point>; 4]),
    Coords([Eval<f64>; 8]),
}

/// Four-cornered primitive. Corners are given either as 4 evaluable points or
/// as 8 evaluable scalars.
pub struct Quad {
    attr: QuadAttr,
    cached: [Point; 4],
}

impl Quad {
    pub fn from_points(points: [Eval<Point>; 4]) -> Self {
        Self {
            attr: QuadAttr::Points(points),
            cached: [Point::ZERO; 4],
        }
    }

    pub fn from_coords(coords: [Eval<f64>; 8]) -> Self {
        Self {
            attr: QuadAttr::Coords(coords),
            cached: [Point::ZERO; 4],
        }
    }
}

impl Node for Quad {
    fn update(&mut self, t: Timebase) -> bool {
        match &self.attr {
            QuadAttr::Points(points) => {
                for (i, p) in points.iter().enumerate() {
                    self.cached[i] = p.get(t);
                }
            }
            QuadAttr::Coords(coords) => {
                for i in 0..4 {
                    self.cached[i] =
                        Point::new(coords[i * 2].get(t), coords[i * 2 + 1].get(t));
                }
            }
        }
        true
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        gfx.draw_quad(&self.cached);
    }

    fn node_name(&self) -> &'static str {
        "Quad"
    }
}

/// Polyline through an evaluable list of points.
pub struct LineStrip {
    points: Eval<Vec<Point>>,
    cached: Vec<Point>,
}

impl LineStrip {
    pub fn new(points: impl Into<Eval<Vec<Point>>>) -> Self {
        Self {
            points: points.into(),
            cached: Vec::new(),
        }
    }
}

impl Node for LineStrip {
    fn update(&mut self, t: Timebase) -> bool {
        self.cached = self.points.get(t);
        true
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        gfx.draw_line_strip(&self.cached);
    }

    fn node_name(&self) -> &'static str {
        "LineStrip"
    }
}

/// Axis-aligned rectangle with evaluable origin and size.
pub struct RectShape {
    x: Eval<f64>,
    y: Eval<f64>,
    w: Eval<f64>,
    h: Eval<f64>,
    cached: crate::core::Rect,
}

impl RectShape {
    pub fn new(
        x: impl Into<Eval<f64>>,
        y: impl Into<Eval<f64>>,
        w: impl Into<Eval<f64>>,
        h: impl Into<Eval<f64>>,
    ) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            w: w.into(),
            h: h.into(),
            cached: crate::core::Rect::ZERO,
        }
    }
}

impl Node for RectShape {
    fn update(&mut self, t: Timebase) -> bool {
        let (x, y) = (self.x.get(t), self.y.get(t));
        self.cached = crate::core::Rect::new(x, y, x + self.w.get(t), y + self.h.get(t));
        true
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        gfx.draw_rect(self.cached);
    }

    fn node_name(&self) -> &'static str {
        "RectShape"
    }
}

/// Static textured leaf: binds its texture while the children draw, then
/// restores whatever texture was active before.
pub struct Image {
    texture: Rc<dyn Texture>,
    children: Vec<Box<dyn Node>>,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image").finish_non_exhaustive()
    }
}

impl Image {
    pub fn new(
        loader: &mut dyn MediaLoader,
        name: &str,
        children: Vec<Box<dyn Node>>,
    ) -> TemporaResult<Self> {
        let texture = loader.load_image(name)?;
        Ok(Self { texture, children })
    }
}

impl Node for Image {
    fn update(&mut self, t: Timebase) -> bool {
        update_all(&mut self.children, t)
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        let previous = gfx.active_texture();
        gfx.set_texture(Some(self.texture.clone()));
        draw_all(&self.children, gfx);
        gfx.set_texture(previous);
    }

    fn node_name(&self) -> &'static str {
        "Image"
    }

    fn print(&self, out: &mut String, level: usize) {
        print_header(out, level, self.node_name(), "");
        print_all(&self.children, out, level + 1);
    }
}

/// Video-backed leaf. Seeks the stream to the local timebase every frame and
/// stays active while looping, extending its last frame, or within its
/// duration.
pub struct Video {
    texture: Rc<dyn Texture>,
    duration: Timebase,
    looped: bool,
    extend_last_frame: bool,
    children: Vec<Box<dyn Node>>,
    playing: bool,
}

impl Video {
    pub fn new(
        loader: &mut dyn MediaLoader,
        config: VideoConfig,
        children: Vec<Box<dyn Node>>,
    ) -> TemporaResult<Self> {
        config.validate()?;
        let texture = loader.open_video(&config)?;
        texture.set_loop_from(config.loop_from);
        let frames = texture.last_frame().saturating_sub(texture.first_frame());
        let duration = frames as Timebase / config.fps;
        Ok(Self {
            texture,
            duration,
            looped: config.looped,
            extend_last_frame: config.extend_last_frame,
            children,
            playing: false,
        })
    }

    pub fn duration(&self) -> Timebase {
        self.duration
    }
}

impl Node for Video {
    fn update(&mut self, t: Timebase) -> bool {
        self.texture.set_video_time(t);
        if self.extend_last_frame || self.looped || t < self.duration {
            self.playing = true;
            update_all(&mut self.children, t)
        } else {
            self.playing = false;
            false
        }
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        if !self.playing {
            return;
        }
        let previous = gfx.active_texture();
        gfx.set_texture(Some(self.texture.clone()));
        draw_all(&self.children, gfx);
        gfx.set_texture(previous);
    }

    fn node_name(&self) -> &'static str {
        "Video"
    }

    fn print(&self, out: &mut String, level: usize) {
        let note = if self.playing { "playing" } else { "ended" };
        print_header(out, level, self.node_name(), note);
        print_all(&self.children, out, level + 1);
    }
}

/// Fire-and-forget sound: triggers playback on the frame it first updates and
/// is inactive afterwards, so it composes as an instant inside sequences.
pub struct Sound {
    player: Rc<RefCell<dyn AudioPlayer>>,
    name: String,
    fired: bool,
}

impl Sound {
    pub fn new(player: Rc<RefCell<dyn AudioPlayer>>, name: impl Into<String>) -> Self {
        Self {
            player,
            name: name.into(),
            fired: false,
        }
    }
}

impl Node for Sound {
    fn update(&mut self, _t: Timebase) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        self.player.borrow_mut().play(&self.name);
        true
    }

    fn draw(&self, _gfx: &mut dyn RenderContext) {}

    fn node_name(&self) -> &'static str {
        "Sound"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Eval;

    #[test]
    fn quad_coords_and_points_cache_the_same_corners() {
        let mut by_points = Quad::from_points([
            Eval::Constant(Point::new(0.0, 0.0)),
            Eval::Constant(Point::new(1.0, 0.0)),
            Eval::Constant(Point::new(1.0, 1.0)),
            Eval::Constant(Point::new(0.0, 1.0)),
        ]);
        let mut by_coords = Quad::from_coords([
            0.0.into(),
            0.0.into(),
            1.0.into(),
            0.0.into(),
            1.0.into(),
            1.0.into(),
            0.0.into(),
            1.0.into(),
        ]);
        assert!(by_points.update(0.0));
        assert!(by_coords.update(0.0));
        assert_eq!(by_points.cached, by_coords.cached);
    }

    #[test]
    fn rect_caches_origin_plus_size() {
        let mut r = RectShape::new(1.0, 2.0, Eval::time(|t| t * 10.0), 4.0);
        r.update(0.5);
        assert_eq!(r.cached, crate::core::Rect::new(1.0, 2.0, 6.0, 6.0));
    }

    #[test]
    fn line_strip_reevaluates_points_each_update() {
        let mut ls = LineStrip::new(Eval::time(|t| vec![Point::new(t, 0.0)]));
        ls.update(1.0);
        assert_eq!(ls.cached, vec![Point::new(1.0, 0.0)]);
        ls.update(2.0);
        assert_eq!(ls.cached, vec![Point::new(2.0, 0.0)]);
    }

    #[test]
    fn sound_fires_exactly_once() {
        struct Recorder(Vec<String>);
        impl AudioPlayer for Recorder {
            fn play(&mut self, name: &str) {
                self.0.push(name.to_owned());
            }
        }

        let player = Rc::new(RefCell::new(Recorder(Vec::new())));
        let mut s = Sound::new(player.clone(), "ding.wav");
        assert!(s.update(0.0));
        assert!(!s.update(1.0));
        assert!(!s.update(2.0));
        assert_eq!(player.borrow().0, vec!["ding.wav"]);
    }
}
