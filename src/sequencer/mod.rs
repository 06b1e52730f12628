//! Function-pointer finite state machine that sequences the prop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                      │
//! │  ┌──────────────────────┬──────────┬──────────┬───────────────┐  │
//! │  │ StateId              │ on_enter │ on_exit  │ on_update     │  │
//! │  ├──────────────────────┼──────────┼──────────┼───────────────┤  │
//! │  │ Setup                │ fn(ctx)  │ fn(ctx)  │ fn(ctx)->Opt  │  │
//! │  │ WaitForEmergencyPower│ fn(ctx)  │    -     │ fn(ctx)->Opt  │  │
//! │  │ WaitForFloatSwitch   │ fn(ctx)  │    -     │ fn(ctx)->Opt  │  │
//! │  │ WaitForStart         │ fn(ctx)  │ fn(ctx)  │ fn(ctx)->Opt  │  │
//! │  │ Started              │ fn(ctx)  │ fn(ctx)  │ fn(ctx)->Opt  │  │
//! │  └──────────────────────┴──────────┴──────────┴───────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine loads the fresh edges, levels and clock into the
//! [`SequencerContext`], calls `on_update` for the current state and, on
//! `Some(next)`, runs `on_exit` / `on_enter`.  Handlers never touch
//! hardware: they record [`SideEffect`]s, which the tick returns in a
//! [`TickOutcome`] for the controller to apply.

pub mod context;
pub mod states;

pub use context::{
    Effects, SensorEdges, SensorLevels, SequencerContext, SequencerOptions, SideEffect,
};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Setup = 0,
    WaitForEmergencyPower = 1,
    WaitForFloatSwitch = 2,
    WaitForStart = 3,
    Started = 4,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert an index back to `StateId`.  Out-of-range indices assert in
    /// debug builds and fall back to `WaitForEmergencyPower` in release,
    /// which never activates without fresh preconditions.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Setup,
            1 => Self::WaitForEmergencyPower,
            2 => Self::WaitForFloatSwitch,
            3 => Self::WaitForStart,
            4 => Self::Started,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::WaitForEmergencyPower
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut SequencerContext);

/// Per-tick handler.  Returns `Some(next)` to trigger a transition.
pub type StateUpdateFn = fn(&mut SequencerContext) -> Option<StateId>;

/// One row of the state table.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// Tick result
// ---------------------------------------------------------------------------

/// What a tick (or a forced reset) did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// `(from, to)` when the state changed.
    pub transition: Option<(StateId, StateId)>,
    /// Output requests in the order the handlers produced them.
    pub effects: Effects,
}

impl TickOutcome {
    pub fn transitioned(&self) -> bool {
        self.transition.is_some()
    }
}

// ---------------------------------------------------------------------------
// Sequencer engine
// ---------------------------------------------------------------------------

pub struct Sequencer {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    tick_count: u64,
    /// Tick at which the current state was entered.
    state_entry_tick: u64,
    ctx: SequencerContext,
}

impl Sequencer {
    pub fn new(options: SequencerOptions, initial: StateId) -> Self {
        Self {
            table: states::build_state_table(),
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
            ctx: SequencerContext::new(options),
        }
    }

    /// Run the initial `on_enter`.  Call once before the first `tick()`.
    pub fn start(&mut self) -> TickOutcome {
        self.ctx.effects.clear();
        if let Some(enter) = self.table[self.current].on_enter {
            enter(&mut self.ctx);
        }
        self.outcome(None)
    }

    /// Advance by one tick with freshly consumed edges and current levels.
    pub fn tick(
        &mut self,
        edges: SensorEdges,
        levels: SensorLevels,
        now_ms: u64,
        hold_duration_ms: u64,
    ) -> TickOutcome {
        self.tick_count += 1;
        self.ctx.effects.clear();
        self.ctx.edges = edges;
        self.ctx.levels = levels;
        self.ctx.now_ms = now_ms;
        self.ctx.hold_duration_ms = hold_duration_ms;

        let from = self.state();
        let next = (self.table[self.current].on_update)(&mut self.ctx);

        let transition = next.filter(|&to| to != from).map(|to| {
            self.transition(to);
            (from, to)
        });
        self.outcome(transition)
    }

    /// Unconditionally rewind to `target` (a game reset command).
    ///
    /// Unlike a normal transition this always clears both stages, the
    /// hold timer and any activation, and releases a manual override,
    /// even when `target` is already the current state.
    pub fn reset_to(&mut self, target: StateId) -> TickOutcome {
        self.ctx.effects.clear();
        let from = self.state();

        self.ctx.set_stage1(false);
        self.ctx.set_stage2(false);
        self.ctx.hold_armed_at = None;
        self.ctx.push(SideEffect::Deactivate);
        self.ctx.push(SideEffect::ReleaseOverride);

        self.current = target as usize;
        self.state_entry_tick = self.tick_count;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(&mut self.ctx);
        }

        let transition = (from != target).then_some((from, target));
        self.outcome(transition)
    }

    pub fn state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// Name of the current state as it appears in the table.
    pub fn state_name(&self) -> &'static str {
        self.table[self.current].name
    }

    pub fn stage1(&self) -> bool {
        self.ctx.stage1()
    }

    pub fn stage2(&self) -> bool {
        self.ctx.stage2()
    }

    pub fn is_activated(&self) -> bool {
        self.state() == StateId::Started
    }

    /// Press time of the start hold currently being counted.
    pub fn hold_armed_at(&self) -> Option<u64> {
        self.ctx.hold_armed_at
    }

    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: StateId) {
        if let Some(exit) = self.table[self.current].on_exit {
            exit(&mut self.ctx);
        }

        self.current = next as usize;
        self.state_entry_tick = self.tick_count;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(&mut self.ctx);
        }
    }

    fn outcome(&self, transition: Option<(StateId, StateId)>) -> TickOutcome {
        TickOutcome {
            transition,
            effects: self.ctx.effects.clone(),
        }
    }
}
