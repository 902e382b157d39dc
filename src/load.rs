//! Progressive load controller.
//!
//! ```text
//! Pending ──advance──▶ Triggered ──settle(Success)──▶ Settled(Success)
//!                                └─settle(Failure)──▶ Settled(Failure)
//! ```
//!
//! `advance` hands out a [`LoadTicket`]. Settling consumes it, so a load
//! completion can resolve the state machine at most once, and a ticket from
//! a torn-down pass is rejected. The controller does not touch any element
//! itself; it returns [`Effect`]s for the component to apply.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PASS: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Triggered,
    Settled(Outcome),
}

/// Which image element a host load/error event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    /// The full-quality image whose completion settles the state machine.
    Target,
    /// The quality-mode placeholder. Its events never settle anything.
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// One image, fetched when triggered.
    Single,
    /// A zero-cost placeholder is already showing; the full-quality tree is
    /// swapped in once its image has loaded.
    Progressive,
}

/// Mutation requested by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Assign the fetch-triggering attribute of the target image.
    SetSource(String),
    /// Turn off the default reveal animation before swapping trees.
    SuppressReveal,
    /// Replace the visible placeholder tree with the full-quality tree.
    SwapPicture,
}

/// One-shot completion token for a triggered load.
#[derive(Debug)]
#[must_use = "dropping the ticket leaves the load unsettled"]
pub struct LoadTicket {
    pass: u64,
}

#[derive(Debug)]
pub struct LoadController {
    pass: u64,
    state: LoadState,
    mode: LoadMode,
    target_url: String,
    torn_down: bool,
}

impl LoadController {
    /// Fresh controller for a new render pass.
    pub fn new(target_url: impl Into<String>, mode: LoadMode) -> Self {
        Self {
            pass: NEXT_PASS.fetch_add(1, Ordering::Relaxed),
            state: LoadState::Pending,
            mode,
            target_url: target_url.into(),
            torn_down: false,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Pending → Triggered. Any other state, or a torn-down controller,
    /// yields `None`.
    pub fn advance(&mut self) -> Option<(Vec<Effect>, LoadTicket)> {
        if self.torn_down || self.state != LoadState::Pending {
            return None;
        }
        self.state = LoadState::Triggered;
        tracing::debug!(pass = self.pass, url = %self.target_url, mode = ?self.mode, "load triggered");
        Some((
            vec![Effect::SetSource(self.target_url.clone())],
            LoadTicket { pass: self.pass },
        ))
    }

    /// Triggered → Settled. Returns the effects to apply, or `None` when the
    /// ticket is stale.
    pub fn settle(&mut self, ticket: LoadTicket, outcome: Outcome) -> Option<Vec<Effect>> {
        if self.torn_down || ticket.pass != self.pass || self.state != LoadState::Triggered {
            tracing::debug!(pass = ticket.pass, "stale load ticket ignored");
            return None;
        }
        self.state = LoadState::Settled(outcome);
        tracing::debug!(pass = self.pass, ?outcome, "load settled");
        let effects = match (self.mode, outcome) {
            (LoadMode::Progressive, Outcome::Success) => {
                vec![Effect::SuppressReveal, Effect::SwapPicture]
            }
            _ => Vec::new(),
        };
        Some(effects)
    }

    /// Detach. Outstanding tickets can no longer settle this controller.
    pub fn teardown(&mut self) {
        self.torn_down = true;
    }
}
