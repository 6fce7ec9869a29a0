//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no
//! dynamic dispatch, no heap.
//!
//! ```text
//!  DOWN ──────────────▶ CONNECTING ──[attempt ok]──▶ UP
//!                         │    ▲                      │
//!              [attempt failed]│                [link lost /
//!                         │    │                 0.0.0.0]
//!                         ▼    │                      │
//!                    (retry, count++)                 │
//!                         │                           │
//!              [20 consecutive failures]              │
//!                         ▼                           │
//!                   restart requested    DOWN ◀───────┘
//! ```

use super::context::LinkContext;
use super::{LinkState, StateDescriptor};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table. Called once at startup.
pub fn build_state_table() -> [StateDescriptor; LinkState::COUNT] {
    [
        // Index 0 — Down
        StateDescriptor {
            id: LinkState::Down,
            name: "Down",
            on_enter: Some(down_enter),
            on_exit: None,
            on_update: down_update,
        },
        // Index 1 — Connecting
        StateDescriptor {
            id: LinkState::Connecting,
            name: "Connecting",
            on_enter: Some(connecting_enter),
            on_exit: None,
            on_update: connecting_update,
        },
        // Index 2 — Up
        StateDescriptor {
            id: LinkState::Up,
            name: "Up",
            on_enter: Some(up_enter),
            on_exit: None,
            on_update: up_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  DOWN state
// ═══════════════════════════════════════════════════════════════════════════

fn down_enter(ctx: &mut LinkContext) {
    ctx.attempt_result = None;
    info!("DOWN: link not associated");
}

fn down_update(_ctx: &mut LinkContext) -> Option<LinkState> {
    // A down link is never acceptable — seek a connection immediately.
    Some(LinkState::Connecting)
}

// ═══════════════════════════════════════════════════════════════════════════
//  CONNECTING state
// ═══════════════════════════════════════════════════════════════════════════

fn connecting_enter(ctx: &mut LinkContext) {
    ctx.connect_requested = true;
    info!("CONNECTING: requesting association attempt");
}

fn connecting_update(ctx: &mut LinkContext) -> Option<LinkState> {
    match ctx.attempt_result.take() {
        // Attempt still in flight (or not yet performed).
        None => None,

        Some(true) => Some(LinkState::Up),

        Some(false) => {
            ctx.consecutive_failures += 1;
            if ctx.consecutive_failures >= ctx.max_attempts {
                warn!(
                    "CONNECTING: {} consecutive failures — escalating to restart",
                    ctx.consecutive_failures
                );
                ctx.restart_requested = true;
                ctx.consecutive_failures = 0;
            }
            // Fixed-backoff retry; the link manager sleeps between
            // attempts.
            ctx.connect_requested = true;
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  UP state
// ═══════════════════════════════════════════════════════════════════════════

fn up_enter(ctx: &mut LinkContext) {
    ctx.consecutive_failures = 0;
    info!("UP: link associated and addressed");
}

fn up_update(ctx: &mut LinkContext) -> Option<LinkState> {
    // Loss is detected from the platform snapshot: de-association or
    // the 0.0.0.0 address sentinel.
    if !ctx.observed.alive() {
        warn!("UP: link lost (associated={}, addressed={})",
            ctx.observed.associated, ctx.observed.has_address);
        return Some(LinkState::Down);
    }
    None
}
