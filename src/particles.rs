//! Dynamic-arity container for short-lived leaf instances.

use crate::core::Timebase;
use crate::host::RenderContext;
use crate::node::{Node, print_header};

/// Spawn policy: invoked once per frame with the container's timebase, returns
/// the particles to materialize this frame. Throttling is the policy's job;
/// the container enforces no population cap.
pub type SpawnFn = Box<dyn FnMut(Timebase) -> Vec<Box<dyn Node>>>;

struct Spawned {
    birth: Timebase,
    node: Box<dyn Node>,
}

/// Spawns, updates, and retires particles.
///
/// Each particle runs on its own relative clock (`t - birth_time`) and is
/// dropped the first time its `update` reports not-alive.
pub struct Particles {
    spawn: SpawnFn,
    particles: Vec<Spawned>,
}

impl Particles {
    pub fn new(spawn: impl FnMut(Timebase) -> Vec<Box<dyn Node>> + 'static) -> Self {
        Self {
            spawn: Box::new(spawn),
            particles: Vec::new(),
        }
    }

    pub fn population(&self) -> usize {
        self.particles.len()
    }
}

impl Node for Particles {
    fn update(&mut self, t: Timebase) -> bool {
        for node in (self.spawn)(t) {
            self.particles.push(Spawned { birth: t, node });
        }
        self.particles.retain_mut(|p| p.node.update(t - p.birth));
        !self.particles.is_empty()
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        for p in &self.particles {
            p.node.draw(gfx);
        }
    }

    fn node_name(&self) -> &'static str {
        "Particles"
    }

    fn print(&self, out: &mut String, level: usize) {
        let note = format!("{} live", self.particles.len());
        print_header(out, level, self.node_name(), &note);
        for p in &self.particles {
            p.node.print(out, level + 1);
        }
    }
}
