//! Decorators: single-purpose nodes that wrap a child set and modify the
//! rendering context around it.
//!
//! `update` evaluates the decorator's attributes against its own timebase and
//! passes that timebase through to the children unchanged; `draw` pushes the
//! attribute, recurses, and pops on every path so no rendering state leaks
//! past the subtree.

use crate::core::{Eval, Point, Timebase, Vec2, Vec2Attr};
use crate::error::{TemporaError, TemporaResult};
use crate::host::{RenderContext, Target, TargetTracker};
use crate::node::{Node, draw_all, print_all, print_header, update_all};
use std::rc::Rc;

/// Blends an RGBA color over the subtree.
pub struct Color {
    r: Eval<f64>,
    g: Eval<f64>,
    b: Eval<f64>,
    a: Eval<f64>,
    cached: [f64; 4],
    children: Vec<Box<dyn Node>>,
}

impl Color {
    pub fn new(
        r: impl Into<Eval<f64>>,
        g: impl Into<Eval<f64>>,
        b: impl Into<Eval<f64>>,
        a: impl Into<Eval<f64>>,
        children: Vec<Box<dyn Node>>,
    ) -> Self {
        Self {
            r: r.into(),
            g: g.into(),
            b: b.into(),
            a: a.into(),
            cached: [0.0; 4],
            children,
        }
    }
}

impl Node for Color {
    fn update(&mut self, t: Timebase) -> bool {
        self.cached = [
            self.r.get(t),
            self.g.get(t),
            self.b.get(t),
            self.a.get(t),
        ];
        update_all(&mut self.children, t)
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        gfx.push_color(self.cached);
        draw_all(&self.children, gfx);
        gfx.pop_color();
    }

    fn node_name(&self) -> &'static str {
        "Color"
    }

    fn print(&self, out: &mut String, level: usize) {
        print_header(out, level, self.node_name(), "");
        print_all(&self.children, out, level + 1);
    }
}

/// Sets the line width for line-strip leaves in the subtree.
pub struct LineWidth {
    width: Eval<f64>,
    cached: f64,
    children: Vec<Box<dyn Node>>,
}

impl LineWidth {
    pub fn new(width: impl Into<Eval<f64>>, children: Vec<Box<dyn Node>>) -> Self {
        Self {
            width: width.into(),
            cached: 1.0,
            children,
        }
    }
}

impl Node for LineWidth {
    fn update(&mut self, t: Timebase) -> bool {
        self.cached = self.width.get(t);
        update_all(&mut self.children, t)
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        gfx.push_line_width(self.cached);
        draw_all(&self.children, gfx);
        gfx.pop_line_width();
    }

    fn node_name(&self) -> &'static str {
        "LineWidth"
    }

    fn print(&self, out: &mut String, level: usize) {
        print_header(out, level, self.node_name(), "");
        print_all(&self.children, out, level + 1);
    }
}

pub struct Translate {
    vector: Vec2Attr,
    cached: Point,
    children: Vec<Box<dyn Node>>,
}

impl Translate {
    pub fn new(vector: Vec2Attr, children: Vec<Box<dyn Node>>) -> Self {
        Self {
            vector,
            cached: Point::ZERO,
            children,
        }
    }

    pub fn xy(
        x: impl Into<Eval<f64>>,
        y: impl Into<Eval<f64>>,
        children: Vec<Box<dyn Node>>,
    ) -> Self {
        Self::new(Vec2Attr::xy(x, y), children)
    }
}

impl Node for Translate {
    fn update(&mut self, t: Timebase) -> bool {
        self.cached = self.vector.get(t);
        update_all(&mut self.children, t)
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        gfx.push_translate(self.cached.to_vec2());
        draw_all(&self.children, gfx);
        gfx.pop_transform();
    }

    fn node_name(&self) -> &'static str {
        "Translate"
    }

    fn print(&self, out: &mut String, level: usize) {
        print_header(out, level, self.node_name(), "");
        print_all(&self.children, out, level + 1);
    }
}

pub struct Scale {
    factors: Vec2Attr,
    cached: Point,
    children: Vec<Box<dyn Node>>,
}

impl Scale {
    pub fn new(factors: Vec2Attr, children: Vec<Box<dyn Node>>) -> Self {
        Self {
            factors,
            cached: Point::new(1.0, 1.0),
            children,
        }
    }

    pub fn xy(
        x: impl Into<Eval<f64>>,
        y: impl Into<Eval<f64>>,
        children: Vec<Box<dyn Node>>,
    ) -> Self {
        Self::new(Vec2Attr::xy(x, y), children)
    }
}

impl Node for Scale {
    fn update(&mut self, t: Timebase) -> bool {
        self.cached = self.factors.get(t);
        update_all(&mut self.children, t)
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        gfx.push_scale(Vec2::new(self.cached.x, self.cached.y));
        draw_all(&self.children, gfx);
        gfx.pop_transform();
    }

    fn node_name(&self) -> &'static str {
        "Scale"
    }

    fn print(&self, out: &mut String, level: usize) {
        print_header(out, level, self.node_name(), "");
        print_all(&self.children, out, level + 1);
    }
}

/// Rotation in degrees around an evaluable pivot.
pub struct Rotate {
    angle_deg: Eval<f64>,
    pivot: Vec2Attr,
    cached_angle: f64,
    cached_pivot: Point,
    children: Vec<Box<dyn Node>>,
}

impl Rotate {
    pub fn new(
        angle_deg: impl Into<Eval<f64>>,
        pivot: Vec2Attr,
        children: Vec<Box<dyn Node>>,
    ) -> Self {
        Self {
            angle_deg: angle_deg.into(),
            pivot,
            cached_angle: 0.0,
            cached_pivot: Point::ZERO,
            children,
        }
    }
}

impl Node for Rotate {
    fn update(&mut self, t: Timebase) -> bool {
        self.cached_angle = self.angle_deg.get(t);
        self.cached_pivot = self.pivot.get(t);
        update_all(&mut self.children, t)
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        gfx.push_rotate(self.cached_angle, self.cached_pivot);
        draw_all(&self.children, gfx);
        gfx.pop_transform();
    }

    fn node_name(&self) -> &'static str {
        "Rotate"
    }

    fn print(&self, out: &mut String, level: usize) {
        print_header(out, level, self.node_name(), "");
        print_all(&self.children, out, level + 1);
    }
}

/// One attached-point sample: where the point sits on the reference frame and
/// where it currently is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttachedPoint {
    pub src: Point,
    pub pos: Point,
}

/// Warps the subtree by the homography induced by four attached points.
pub struct Homography {
    points: [Eval<AttachedPoint>; 4],
    cached_src: [Point; 4],
    cached_dst: [Point; 4],
    children: Vec<Box<dyn Node>>,
}

impl Homography {
    pub fn new(points: [Eval<AttachedPoint>; 4], children: Vec<Box<dyn Node>>) -> Self {
        Self {
            points,
            cached_src: [Point::ZERO; 4],
            cached_dst: [Point::ZERO; 4],
            children,
        }
    }
}

impl Node for Homography {
    fn update(&mut self, t: Timebase) -> bool {
        for (i, p) in self.points.iter().enumerate() {
            let sample = p.get(t);
            self.cached_src[i] = sample.src;
            self.cached_dst[i] = sample.pos;
        }
        update_all(&mut self.children, t)
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        gfx.push_homography(&self.cached_src, &self.cached_dst);
        draw_all(&self.children, gfx);
        gfx.pop_transform();
    }

    fn node_name(&self) -> &'static str {
        "Homography"
    }

    fn print(&self, out: &mut String, level: usize) {
        print_header(out, level, self.node_name(), "");
        print_all(&self.children, out, level + 1);
    }
}

/// Which timebase a re-appearing target's children resume on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeMode {
    /// Children keep seeing the gate's own (global) timebase.
    Absolute,
    /// Children see the target's time-since-reappeared.
    Relative,
}

/// Gates a subtree on the presence of a tracked target and wraps its drawing
/// in the target's estimated pose.
///
/// While the target is lost the gate reports inactive and clears its active
/// set, so a later re-appearance restarts the children rather than resuming
/// them mid-flight.
pub struct TargetGate {
    target: Rc<dyn Target>,
    mode: TimeMode,
    children: Vec<Box<dyn Node>>,
    activated: bool,
}

impl std::fmt::Debug for TargetGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetGate")
            .field("mode", &self.mode)
            .field("activated", &self.activated)
            .finish_non_exhaustive()
    }
}

impl TargetGate {
    /// Resolve `target_id` through the tracker. Unknown ids abort scene
    /// assembly.
    pub fn new(
        tracker: &dyn TargetTracker,
        target_id: u32,
        mode: TimeMode,
        children: Vec<Box<dyn Node>>,
    ) -> TemporaResult<Self> {
        let target = tracker.target(target_id).ok_or_else(|| {
            TemporaError::config(format!("tracker target {target_id} not found"))
        })?;
        Ok(Self {
            target,
            mode,
            children,
            activated: false,
        })
    }
}

impl Node for TargetGate {
    fn update(&mut self, t: Timebase) -> bool {
        if self.target.lost() {
            self.activated = false;
            return false;
        }
        self.activated = true;
        let child_time = match self.mode {
            TimeMode::Absolute => t,
            TimeMode::Relative => self.target.since_last_appeared(),
        };
        update_all(&mut self.children, child_time)
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        if !self.activated {
            return;
        }
        self.target.push_transform(gfx);
        draw_all(&self.children, gfx);
        self.target.pop_transform(gfx);
    }

    fn node_name(&self) -> &'static str {
        "TargetGate"
    }

    fn print(&self, out: &mut String, level: usize) {
        let note = if self.activated { "detected" } else { "lost" };
        print_header(out, level, self.node_name(), note);
        print_all(&self.children, out, level + 1);
    }
}
