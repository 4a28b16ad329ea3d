//! The two-phase node contract and the plain child container.

use crate::core::Timebase;
use crate::host::RenderContext;
use std::fmt::Write as _;

/// Unit of the composition tree.
///
/// The host (or a parent combinator) calls `update` exactly once per frame,
/// then `draw`. `update` returns liveness ("still relevant, keep calling me")
/// and may replace the node's active child set; `draw` emits rendering side
/// effects for exactly the children that were active after the most recent
/// `update`, and must not mutate selection state.
pub trait Node {
    fn update(&mut self, t: Timebase) -> bool;

    fn draw(&self, gfx: &mut dyn RenderContext);

    /// Class name used by the `print` diagnostic.
    fn node_name(&self) -> &'static str;

    /// Write-only diagnostic dump of the subtree. Combinators annotate the
    /// header with selection state and recurse into all declared children,
    /// hidden or active.
    fn print(&self, out: &mut String, level: usize) {
        print_header(out, level, self.node_name(), "");
    }
}

pub(crate) fn print_header(out: &mut String, level: usize, name: &str, note: &str) {
    for _ in 0..level {
        out.push_str("  ");
    }
    if note.is_empty() {
        let _ = writeln!(out, "{name}:");
    } else {
        let _ = writeln!(out, "{name} [{note}]:");
    }
}

/// Update every child, reporting true iff any child is live. An empty child
/// list counts as live, so placeholder nodes hold their slot in sequences.
pub(crate) fn update_all(children: &mut [Box<dyn Node>], t: Timebase) -> bool {
    if children.is_empty() {
        return true;
    }
    let mut live = false;
    for child in children.iter_mut() {
        if child.update(t) {
            live = true;
        }
    }
    live
}

pub(crate) fn draw_all(children: &[Box<dyn Node>], gfx: &mut dyn RenderContext) {
    for child in children {
        child.draw(gfx);
    }
}

pub(crate) fn print_all(children: &[Box<dyn Node>], out: &mut String, level: usize) {
    for child in children {
        child.print(out, level);
    }
}

/// Plain container: every declared child is active on every frame.
pub struct Group {
    children: Vec<Box<dyn Node>>,
}

impl Group {
    pub fn new(children: Vec<Box<dyn Node>>) -> Self {
        Self { children }
    }
}

impl Node for Group {
    fn update(&mut self, t: Timebase) -> bool {
        update_all(&mut self.children, t)
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        draw_all(&self.children, gfx);
    }

    fn node_name(&self) -> &'static str {
        "Group"
    }

    fn print(&self, out: &mut String, level: usize) {
        print_header(out, level, self.node_name(), "");
        print_all(&self.children, out, level + 1);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{NullGfx, Probe};
    use super::*;

    #[test]
    fn empty_group_stays_live() {
        let mut g = Group::new(vec![]);
        assert!(g.update(0.0));
    }

    #[test]
    fn group_is_live_iff_any_child_is() {
        let (a, _) = Probe::never();
        let (b, _) = Probe::always();
        let mut g = Group::new(vec![a, b]);
        assert!(g.update(1.0));

        let (a, _) = Probe::never();
        let (b, _) = Probe::never();
        let mut g = Group::new(vec![a, b]);
        assert!(!g.update(1.0));
    }

    #[test]
    fn group_passes_timebase_through_unchanged() {
        let (a, ha) = Probe::always();
        let mut g = Group::new(vec![a]);
        g.update(2.5);
        assert_eq!(ha.times(), vec![2.5]);
    }

    #[test]
    fn group_draws_all_children() {
        let (a, ha) = Probe::always();
        let (b, hb) = Probe::never();
        let mut g = Group::new(vec![a, b]);
        g.update(0.0);
        g.draw(&mut NullGfx);
        assert_eq!(ha.draw_count(), 1);
        assert_eq!(hb.draw_count(), 1);
    }

    #[test]
    fn print_indents_children() {
        let (a, _) = Probe::always();
        let g = Group::new(vec![a]);
        let mut out = String::new();
        g.print(&mut out, 0);
        assert_eq!(out, "Group:\n  Probe:\n");
    }
}
