//! TCP hosting for beastduel.
//!
//! One listener task accepts connections; each connection gets a reader task
//! (frame parsing and routing) and a writer task (deadline-bounded sends).
//! The process-wide [`Lobby`] owns the registry of named sessions and active
//! duels and is the only component that mutates it.
//!
//! - [`Server`] — bind, accept, spawn sessions
//! - [`Lobby`] — registry, matchmaking, duel lifecycle cleanup
//! - [`session`] — per-connection reader/writer tasks and frame draining
//! - [`setup`] — squad assembly against the catalog at match start
mod lobby;
mod server;

pub mod session;
pub mod setup;

pub use lobby::*;
pub use server::*;
