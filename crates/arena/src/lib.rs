//! Async runtime for live duels.
//!
//! This crate owns the wire vocabulary and the per-duel coordinator task,
//! sitting between the battle engine (pure rules) and the TCP hosting layer
//! (sockets and the lobby registry).
//!
//! ## Wire
//!
//! - [`ServerMessage`] / [`ClientMessage`] — framed lobby JSON, tagged by `type`
//! - [`ActionFrame`] — pipe-delimited in-duel action frames
//! - [`Protocol`] — action validation against the acting side's squad
//!
//! ## Coordination
//!
//! - [`Duel`] — one coordinator task per match: request, collect, resolve,
//!   broadcast, repeat until a squad falls or a side goes silent
//! - [`Side`] — a duel's view of one participant: squad plus channel endpoints
//! - [`SessionControl`] — routing-mode signals sent back to session readers
//! - [`TimerConfig`] — action and write deadlines, injectable for tests
//!
//! ## Reporting
//!
//! - [`SlotState`] / [`snapshot`] — per-slot squad state sent with every
//!   `turn_result`
mod action;
mod duel;
mod handle;
mod message;
mod protocol;
mod snapshot;
mod timer;

pub use action::*;
pub use duel::*;
pub use handle::*;
pub use message::*;
pub use protocol::*;
pub use snapshot::*;
pub use timer::*;
