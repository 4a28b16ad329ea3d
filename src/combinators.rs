//! Time-shaping and selection combinators.
//!
//! Every combinator owns its candidate subtrees outright (fixed at
//! construction) and expresses "currently active" as an index or flag rather
//! than re-owning children. The `delay` field records the outer time at which
//! the current child-set became active; children always see
//! `outer_time - delay`.

use crate::core::{Eval, Rng64, Timebase};
use crate::host::RenderContext;
use crate::node::{Node, draw_all, print_all, print_header, update_all};

/// Active while `t < duration`, then permanently inactive.
///
/// While active the children see the combinator's own timebase unchanged.
/// Expiry latches: once `t` reaches the (evaluable) duration the node clears
/// its active set and no later input reactivates it.
pub struct StopAfter {
    duration: Eval<Timebase>,
    children: Vec<Box<dyn Node>>,
    expired: bool,
    gated: bool,
}

impl StopAfter {
    pub fn new(duration: impl Into<Eval<Timebase>>, children: Vec<Box<dyn Node>>) -> Self {
        Self {
            duration: duration.into(),
            children,
            expired: false,
            gated: false,
        }
    }
}

impl Node for StopAfter {
    fn update(&mut self, t: Timebase) -> bool {
        if self.expired {
            return false;
        }
        if t < self.duration.get(t) {
            self.gated = true;
            update_all(&mut self.children, t)
        } else {
            self.expired = true;
            self.gated = false;
            false
        }
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        if self.gated {
            draw_all(&self.children, gfx);
        }
    }

    fn node_name(&self) -> &'static str {
        "StopAfter"
    }

    fn print(&self, out: &mut String, level: usize) {
        let note = if self.expired { "expired" } else { "running" };
        print_header(out, level, self.node_name(), note);
        print_all(&self.children, out, level + 1);
    }
}

/// Holds its place (live, empty active set) until `t >= delay`, then runs the
/// children at `t - delay`.
///
/// The delay value is frozen at the moment the children first activate; an
/// evaluable delay that grows past the current time afterwards is ignored, so
/// children never get re-suspended or see their relative clock jump backwards.
pub struct Delay {
    delay: Eval<Timebase>,
    children: Vec<Box<dyn Node>>,
    started: bool,
    frozen: Timebase,
}

impl Delay {
    pub fn new(delay: impl Into<Eval<Timebase>>, children: Vec<Box<dyn Node>>) -> Self {
        Self {
            delay: delay.into(),
            children,
            started: false,
            frozen: 0.0,
        }
    }
}

impl Node for Delay {
    fn update(&mut self, t: Timebase) -> bool {
        if !self.started {
            let d = self.delay.get(t);
            if t < d {
                return true;
            }
            self.started = true;
            self.frozen = d;
        }
        update_all(&mut self.children, t - self.frozen)
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        if self.started {
            draw_all(&self.children, gfx);
        }
    }

    fn node_name(&self) -> &'static str {
        "Delay"
    }

    fn print(&self, out: &mut String, level: usize) {
        let note = if self.started { "started" } else { "waiting" };
        print_header(out, level, self.node_name(), note);
        print_all(&self.children, out, level + 1);
    }
}

/// All-or-nothing gate: active iff every candidate is active this frame.
///
/// Evaluation short-circuits on the first failure, so later candidates are
/// not updated on failing frames.
pub struct AllValid {
    children: Vec<Box<dyn Node>>,
    all_valid: bool,
}

impl AllValid {
    pub fn new(children: Vec<Box<dyn Node>>) -> Self {
        Self {
            children,
            all_valid: false,
        }
    }
}

impl Node for AllValid {
    fn update(&mut self, t: Timebase) -> bool {
        let mut valid = true;
        for child in self.children.iter_mut() {
            if !child.update(t) {
                valid = false;
                break;
            }
        }
        self.all_valid = valid;
        valid
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        if self.all_valid {
            draw_all(&self.children, gfx);
        }
    }

    fn node_name(&self) -> &'static str {
        "AllValid"
    }

    fn print(&self, out: &mut String, level: usize) {
        let note = if self.all_valid { "valid" } else { "blocked" };
        print_header(out, level, self.node_name(), note);
        print_all(&self.children, out, level + 1);
    }
}

/// One candidate active at a time, in list order.
///
/// The selected child runs at `t - delay`. When it fails, selection advances
/// (wrapping, at most once fully around the list) with `delay` reset so the
/// newly selected child starts at relative time 0. If every candidate fails
/// the node is inactive and selection resets to unset for the next frame.
///
/// First-valid mode re-attempts candidate 0 every frame before the advance
/// loop, biasing toward the head of the list.
pub struct Sequence {
    candidates: Vec<Box<dyn Node>>,
    selected: Option<usize>,
    delay: Timebase,
    first_valid: bool,
}

impl Sequence {
    pub fn new(candidates: Vec<Box<dyn Node>>) -> Self {
        Self {
            candidates,
            selected: None,
            delay: 0.0,
            first_valid: false,
        }
    }

    /// Variant that retries the first candidate every frame.
    pub fn first_valid(candidates: Vec<Box<dyn Node>>) -> Self {
        Self {
            first_valid: true,
            ..Self::new(candidates)
        }
    }
}

impl Node for Sequence {
    fn update(&mut self, t: Timebase) -> bool {
        if self.candidates.is_empty() {
            return false;
        }

        let mut sel = match self.selected {
            None => {
                self.delay = t;
                0
            }
            Some(i) if self.first_valid => {
                if self.candidates[i].update(t - self.delay) {
                    return true;
                }
                self.delay = t;
                0
            }
            Some(i) => i,
        };

        let mut remaining = self.candidates.len();
        loop {
            if self.candidates[sel].update(t - self.delay) {
                self.selected = Some(sel);
                return true;
            }
            if remaining == 0 {
                self.selected = None;
                return false;
            }
            remaining -= 1;
            sel = (sel + 1) % self.candidates.len();
            self.delay = t;
            tracing::debug!(next = sel, "sequence advancing");
        }
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        if let Some(i) = self.selected {
            self.candidates[i].draw(gfx);
        }
    }

    fn node_name(&self) -> &'static str {
        if self.first_valid { "FirstValid" } else { "Sequence" }
    }

    fn print(&self, out: &mut String, level: usize) {
        let note = match self.selected {
            Some(i) => format!("selected {i}/{}", self.candidates.len()),
            None => "unset".to_owned(),
        };
        print_header(out, level, self.node_name(), &note);
        print_all(&self.candidates, out, level + 1);
    }
}

/// Delegates to one randomly chosen candidate until it goes inactive, then
/// re-rolls uniformly over the candidates that report active at relative
/// time 0. `delay` resets at every re-roll.
///
/// In once mode the first failure of a selected candidate makes the whole
/// node permanently inactive instead of re-rolling.
pub struct RandomSelect {
    candidates: Vec<Box<dyn Node>>,
    selected: Option<usize>,
    delay: Timebase,
    once: bool,
    done: bool,
    rng: Rng64,
}

impl RandomSelect {
    pub fn new(candidates: Vec<Box<dyn Node>>) -> Self {
        Self {
            candidates,
            selected: None,
            delay: 0.0,
            once: false,
            done: false,
            rng: Rng64::from_time(),
        }
    }

    /// Variant that never re-rolls: once the chosen candidate finishes, the
    /// node is done.
    pub fn once(candidates: Vec<Box<dyn Node>>) -> Self {
        Self {
            once: true,
            ..Self::new(candidates)
        }
    }

    /// Replace the wall-clock seed with a fixed one for reproducible scenes.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Rng64::new(seed);
        self
    }
}

impl Node for RandomSelect {
    fn update(&mut self, t: Timebase) -> bool {
        if self.done {
            return false;
        }

        if let Some(i) = self.selected {
            if self.candidates[i].update(t - self.delay) {
                return true;
            }
            if self.once {
                self.done = true;
                self.selected = None;
                return false;
            }
        }

        self.delay = t;
        self.selected = None;

        let mut valid = Vec::new();
        for (i, candidate) in self.candidates.iter_mut().enumerate() {
            if candidate.update(0.0) {
                valid.push(i);
            }
        }
        if valid.is_empty() {
            return false;
        }

        let chosen = valid[self.rng.next_index(valid.len())];
        tracing::debug!(chosen, out_of = valid.len(), "random select re-roll");
        self.selected = Some(chosen);
        true
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        if let Some(i) = self.selected {
            self.candidates[i].draw(gfx);
        }
    }

    fn node_name(&self) -> &'static str {
        if self.once {
            "RandomSelectOnce"
        } else {
            "RandomSelect"
        }
    }

    fn print(&self, out: &mut String, level: usize) {
        let note = match self.selected {
            Some(i) => format!("selected {i}/{}", self.candidates.len()),
            None if self.done => "done".to_owned(),
            None => "unset".to_owned(),
        };
        print_header(out, level, self.node_name(), &note);
        print_all(&self.candidates, out, level + 1);
    }
}

/// Priority selection: re-checks candidates in list order every frame, so a
/// higher-priority candidate coming alive interrupts a lower-priority one
/// already in progress.
///
/// Keeping the current selection preserves its `delay` (and relative clock);
/// switching resets it. A deposed candidate that later wins again resumes the
/// clock it had only if it was never replaced in between.
pub struct FirstValidInterrupt {
    candidates: Vec<Box<dyn Node>>,
    selected: Option<usize>,
    delay: Timebase,
    active: bool,
}

impl FirstValidInterrupt {
    pub fn new(candidates: Vec<Box<dyn Node>>) -> Self {
        Self {
            candidates,
            selected: None,
            delay: 0.0,
            active: false,
        }
    }
}

impl Node for FirstValidInterrupt {
    fn update(&mut self, t: Timebase) -> bool {
        self.active = false;
        for i in 0..self.candidates.len() {
            let rel = if self.selected == Some(i) {
                t - self.delay
            } else {
                0.0
            };
            if self.candidates[i].update(rel) {
                if self.selected != Some(i) {
                    self.selected = Some(i);
                    self.delay = t;
                }
                self.active = true;
                return true;
            }
        }
        false
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        if let Some(i) = self.selected
            && self.active
        {
            self.candidates[i].draw(gfx);
        }
    }

    fn node_name(&self) -> &'static str {
        "FirstValidInterrupt"
    }

    fn print(&self, out: &mut String, level: usize) {
        let note = match self.selected {
            Some(i) if self.active => format!("selected {i}/{}", self.candidates.len()),
            _ => "unset".to_owned(),
        };
        print_header(out, level, self.node_name(), &note);
        print_all(&self.candidates, out, level + 1);
    }
}
