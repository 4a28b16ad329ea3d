//! Host-facing composition root.

use crate::core::Timebase;
use crate::host::{Clock, RenderContext};
use crate::node::Node;

/// Owns the root node and enforces the per-frame `update`-then-`draw` pairing.
///
/// The host constructs the tree, wraps it in a `Scene`, and calls
/// [`Scene::frame`] once per frame from its main loop. The scene never draws
/// without a same-frame update first.
pub struct Scene {
    root: Box<dyn Node>,
    live: bool,
}

impl Scene {
    pub fn new(root: Box<dyn Node>) -> Self {
        Self { root, live: false }
    }

    /// Run one frame at the given elapsed time. Returns the root's liveness.
    pub fn frame(&mut self, t: Timebase, gfx: &mut dyn RenderContext) -> bool {
        self.live = self.root.update(t);
        self.root.draw(gfx);
        self.live
    }

    /// Convenience wrapper sampling the host clock.
    pub fn frame_with_clock(&mut self, clock: &dyn Clock, gfx: &mut dyn RenderContext) -> bool {
        self.frame(clock.elapsed(), gfx)
    }

    /// Liveness reported by the most recent frame.
    pub fn live(&self) -> bool {
        self.live
    }

    /// Render the write-only diagnostic tree dump.
    pub fn print_tree(&self) -> String {
        let mut out = String::new();
        self.root.print(&mut out, 0);
        out
    }
}
