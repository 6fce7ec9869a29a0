//! Function-pointer finite state machine engine for the network link.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  StateTable                                            │
//! │  ┌────────────┬──────────┬─────────┬─────────────────┐ │
//! │  │ LinkState  │ on_enter │ on_exit │ on_update        │ │
//! │  ├────────────┼──────────┼─────────┼─────────────────┤ │
//! │  │ Down       │ fn(ctx)  │ fn(ctx) │ fn(ctx)->Option │ │
//! │  │ Connecting │ fn(ctx)  │ fn(ctx) │ fn(ctx)->Option │ │
//! │  │ Up         │ fn(ctx)  │ fn(ctx) │ fn(ctx)->Option │ │
//! │  └────────────┴──────────┴─────────┴─────────────────┘ │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and updates the
//! current pointer. All functions receive `&mut LinkContext`, which
//! holds the observed platform status, attempt results, and retry
//! accounting.

pub mod context;
pub mod states;

use context::LinkContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Link states. Must stay in sync with the table built in
/// [`states::build_state_table`].
///
/// Invariant: `Up` implies the platform link is associated and holds a
/// non-sentinel address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LinkState {
    Down = 0,
    Connecting = 1,
    Up = 2,
}

impl LinkState {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert a `u8` index back to `LinkState`. Panics on
    /// out-of-range in debug builds; returns `Down` in release
    /// (fail-closed fallback).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Down,
            1 => Self::Connecting,
            2 => Self::Up,
            _ => {
                debug_assert!(false, "invalid link state index: {idx}");
                Self::Down
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut LinkContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut LinkContext) -> Option<LinkState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: LinkState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and threads a mutable [`LinkContext`] through
/// every handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `LinkState as usize`.
    table: [StateDescriptor; LinkState::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Monotonically increasing tick counter.
    tick_count: u64,
    /// Tick at which the current state was entered.
    state_entry_tick: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; LinkState::COUNT], initial: LinkState) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut LinkContext) {
        info!("link FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn tick(&mut self, ctx: &mut LinkContext) {
        self.tick_count += 1;
        ctx.ticks_in_state = self.tick_count - self.state_entry_tick;

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Force an immediate transition (used by tests and the link
    /// manager's loss detection).
    pub fn force_transition(&mut self, next: LinkState, ctx: &mut LinkContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> LinkState {
        LinkState::from_index(self.current)
    }

    /// How many ticks the FSM has been in the current state.
    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: LinkState, ctx: &mut LinkContext) {
        let next_idx = next_id as usize;

        info!(
            "link: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.state_entry_tick = self.tick_count;
        ctx.ticks_in_state = 0;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
