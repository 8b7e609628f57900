//! Read-only creature catalog: data templates and the oracle that serves them.
//!
//! The battle engine treats the catalog as an external oracle answering two
//! queries: a creature by name or id, and a move by its catalog URL. This
//! crate defines the immutable templates those queries return, the [`Catalog`]
//! trait they hide behind, and squad assembly on top of them.
//!
//! ## Templates
//!
//! - [`Creature`] — identifier, typing, base stats, learnable move references
//! - [`MoveData`] — power, accuracy, damage class, priority, PP, typing
//!
//! ## Oracle
//!
//! - [`Catalog`] — async lookup trait; implementations must cache
//! - [`HttpCatalog`] — reqwest-backed implementation with retry and backoff
//!   (behind the `http` feature)
//! - [`fixtures`] — deterministic in-memory catalog for tests and local play
//!
//! ## Assembly
//!
//! - [`learnset`] — filter a creature's learn list down to a usable moveset
//! - [`squad`] — six distinct random species fetched with bounded fan-out
mod learnset;
mod oracle;
mod squad;
mod template;

#[cfg(feature = "http")]
mod client;

pub mod fixtures;

pub use learnset::*;
pub use oracle::*;
pub use squad::*;
pub use template::*;

#[cfg(feature = "http")]
pub use client::*;
