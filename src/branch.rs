//! Branching combinators: pick between two fixed alternatives, each with its
//! own relative clock.

use crate::core::Timebase;
use crate::host::RenderContext;
use crate::node::{Node, draw_all, print_all, print_header, update_all};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Branch {
    If,
    Else,
}

/// Switches between two child sets on the liveness of a predicate child set.
///
/// The branch clock (`delay`) resets only when the predicate's liveness
/// actually changes; while a branch stays current its children see a steadily
/// increasing relative time. An empty current branch reports inactive.
pub struct Condition {
    predicate: Vec<Box<dyn Node>>,
    if_children: Vec<Box<dyn Node>>,
    else_children: Vec<Box<dyn Node>>,
    current: Option<Branch>,
    delay: Timebase,
}

impl Condition {
    pub fn new(
        predicate: Vec<Box<dyn Node>>,
        if_children: Vec<Box<dyn Node>>,
        else_children: Vec<Box<dyn Node>>,
    ) -> Self {
        Self {
            predicate,
            if_children,
            else_children,
            current: None,
            delay: 0.0,
        }
    }

    fn current_children(&self) -> Option<&Vec<Box<dyn Node>>> {
        match self.current? {
            Branch::If => Some(&self.if_children),
            Branch::Else => Some(&self.else_children),
        }
    }
}

impl Node for Condition {
    fn update(&mut self, t: Timebase) -> bool {
        let target = if update_all(&mut self.predicate, t) {
            Branch::If
        } else {
            Branch::Else
        };
        if self.current != Some(target) {
            self.current = Some(target);
            self.delay = t;
        }

        let children = match target {
            Branch::If => &mut self.if_children,
            Branch::Else => &mut self.else_children,
        };
        if children.is_empty() {
            return false;
        }
        update_all(children, t - self.delay)
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        if let Some(children) = self.current_children() {
            draw_all(children, gfx);
        }
    }

    fn node_name(&self) -> &'static str {
        "Condition"
    }

    fn print(&self, out: &mut String, level: usize) {
        let note = match self.current {
            Some(Branch::If) => "if",
            Some(Branch::Else) => "else",
            None => "unset",
        };
        print_header(out, level, self.node_name(), note);
        print_all(&self.predicate, out, level + 1);
        print_all(&self.if_children, out, level + 1);
        print_all(&self.else_children, out, level + 1);
    }
}

/// Like [`Condition`], but the predicate is a direct boolean function of the
/// current branch's relative time rather than a child set.
///
/// Starts on the else branch. Once the predicate fires, the if branch runs;
/// when its children go inactive the predicate is re-checked at relative time
/// 0, and only a false answer falls back to the else branch. Each branch
/// entry resets the clock, so both branches always start at relative time 0.
pub struct Trigger {
    test: Box<dyn Fn(Timebase) -> bool>,
    if_children: Vec<Box<dyn Node>>,
    else_children: Vec<Box<dyn Node>>,
    current: Branch,
    delay: Timebase,
}

impl Trigger {
    pub fn new(
        test: impl Fn(Timebase) -> bool + 'static,
        if_children: Vec<Box<dyn Node>>,
        else_children: Vec<Box<dyn Node>>,
    ) -> Self {
        Self {
            test: Box::new(test),
            if_children,
            else_children,
            current: Branch::Else,
            delay: 0.0,
        }
    }
}

impl Node for Trigger {
    fn update(&mut self, t: Timebase) -> bool {
        match self.current {
            Branch::If => {
                if update_all(&mut self.if_children, t - self.delay) {
                    return true;
                }
                // If-children finished: stay on the if branch with a fresh
                // clock unless the predicate has gone false.
                self.delay = t;
                if !(self.test)(0.0) {
                    self.current = Branch::Else;
                }
                let children = match self.current {
                    Branch::If => &mut self.if_children,
                    Branch::Else => &mut self.else_children,
                };
                update_all(children, 0.0)
            }
            Branch::Else => {
                if (self.test)(t - self.delay) {
                    self.delay = t;
                    self.current = Branch::If;
                }
                let children = match self.current {
                    Branch::If => &mut self.if_children,
                    Branch::Else => &mut self.else_children,
                };
                update_all(children, t - self.delay)
            }
        }
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        match self.current {
            Branch::If => draw_all(&self.if_children, gfx),
            Branch::Else => draw_all(&self.else_children, gfx),
        }
    }

    fn node_name(&self) -> &'static str {
        "Trigger"
    }

    fn print(&self, out: &mut String, level: usize) {
        let note = match self.current {
            Branch::If => "if",
            Branch::Else => "else",
        };
        print_header(out, level, self.node_name(), note);
        print_all(&self.if_children, out, level + 1);
        print_all(&self.else_children, out, level + 1);
    }
}
