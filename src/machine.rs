//! Named-state machine built on the node contract, so it composes with every
//! combinator.

use crate::core::Timebase;
use crate::error::{TemporaError, TemporaResult};
use crate::host::RenderContext;
use crate::node::{Node, draw_all, print_all, print_header, update_all};
use std::collections::BTreeMap;

/// Transition callback: `(relative_time, ctl, children_active)`. Invoked once
/// per frame after the current state's children updated; may request a state
/// change through the [`MachineCtl`].
pub type TransitionFn = Box<dyn FnMut(Timebase, &mut MachineCtl, bool)>;

struct State {
    children: Vec<Box<dyn Node>>,
    transition: TransitionFn,
}

/// Handle passed to transition callbacks. Collects at most one state-change
/// request per frame; requesting the current state is a no-op.
pub struct MachineCtl<'a> {
    current: &'a str,
    pending: Option<String>,
}

impl MachineCtl<'_> {
    /// Name of the state the machine is currently in.
    pub fn state(&self) -> &str {
        self.current
    }

    /// Request a transition. Applied after the callback returns; a request
    /// for an unregistered state is a fatal configuration error.
    pub fn set_state(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name == self.current {
            return;
        }
        self.pending = Some(name);
    }
}

/// A named-state graph where each state owns a child set and a per-frame
/// transition function.
///
/// `update` advances the machine clock, runs the current state's children at
/// `t - delay`, hands the liveness result to the transition callback, and
/// returns it. Real transitions reset `delay` and immediately run one child
/// update pass at relative time 0, so the next frame starts from established
/// liveness; self-transitions are no-ops and do not reset the clock.
pub struct StateMachine {
    states: BTreeMap<String, State>,
    current: String,
    delay: Timebase,
    current_time: Timebase,
    children_active: bool,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            states: BTreeMap::new(),
            current: String::new(),
            delay: 0.0,
            current_time: 0.0,
            children_active: false,
        }
    }

    /// Register a state. Duplicate names abort scene assembly.
    pub fn add_state(
        &mut self,
        name: impl Into<String>,
        children: Vec<Box<dyn Node>>,
        transition: impl FnMut(Timebase, &mut MachineCtl, bool) + 'static,
    ) -> TemporaResult<()> {
        let name = name.into();
        if self.states.contains_key(&name) {
            return Err(TemporaError::config(format!(
                "state '{name}' registered twice"
            )));
        }
        self.states.insert(
            name,
            State {
                children,
                transition: Box::new(transition),
            },
        );
        Ok(())
    }

    /// Host-facing transition; also sets the initial state. Setting the
    /// current state again is a no-op that keeps the relative clock running.
    pub fn set_state(&mut self, name: &str) -> TemporaResult<()> {
        if name == self.current {
            return Ok(());
        }
        if !self.states.contains_key(name) {
            return Err(TemporaError::config(format!(
                "state '{name}' is not registered"
            )));
        }
        self.apply_state(name.to_owned());
        Ok(())
    }

    /// Name of the current state, empty before the initial `set_state`.
    pub fn state(&self) -> &str {
        &self.current
    }

    fn apply_state(&mut self, name: String) {
        tracing::debug!(from = %self.current, to = %name, "state transition");
        self.current = name;
        self.delay = self.current_time;
        let state = self
            .states
            .get_mut(&self.current)
            .expect("transition target validated by caller");
        self.children_active = update_all(&mut state.children, 0.0);
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for StateMachine {
    /// # Panics
    ///
    /// Panics if no initial state was set, or if the transition callback
    /// requests an unregistered state. Both are configuration errors the
    /// node contract has no error channel for.
    fn update(&mut self, t: Timebase) -> bool {
        self.current_time = t;
        let rel = t - self.delay;

        let state = self
            .states
            .get_mut(&self.current)
            .unwrap_or_else(|| panic!("state machine updated before an initial set_state"));
        self.children_active = update_all(&mut state.children, rel);

        let mut ctl = MachineCtl {
            current: self.current.as_str(),
            pending: None,
        };
        (state.transition)(rel, &mut ctl, self.children_active);

        if let Some(next) = ctl.pending {
            assert!(
                self.states.contains_key(&next),
                "transition requested unregistered state '{next}'"
            );
            self.apply_state(next);
        }
        self.children_active
    }

    fn draw(&self, gfx: &mut dyn RenderContext) {
        if let Some(state) = self.states.get(&self.current) {
            draw_all(&state.children, gfx);
        }
    }

    fn node_name(&self) -> &'static str {
        "StateMachine"
    }

    fn print(&self, out: &mut String, level: usize) {
        let note = if self.current.is_empty() {
            "uninitialized".to_owned()
        } else {
            format!("state '{}'", self.current)
        };
        print_header(out, level, self.node_name(), &note);
        for (name, state) in &self.states {
            print_header(out, level + 1, name, "");
            print_all(&state.children, out, level + 2);
        }
    }
}
