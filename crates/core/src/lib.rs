//! Core type aliases, traits, and constants for beastduel.
//!
//! This crate provides the foundational types and configuration parameters
//! used throughout the beastduel workspace.
#![allow(dead_code)]

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Base stat value as reported by the creature catalog.
pub type BaseStat = i32;
/// Derived stat value at the fixed battle level.
pub type StatValue = i32;
/// Live hit points. Fractional because residual damage divides max HP.
pub type Hp = f64;
/// Per-move usage counter.
pub type Pp = i32;
/// Temporary stat modifier in `[-6, +6]`.
pub type Stage = i8;
/// Turn counter within a duel, starting at 1.
pub type TurnNumber = u32;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying UUID.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}
impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

// ============================================================================
// BATTLE PARAMETERS
// All duels run at a fixed level with fixed individual values and no effort
// values, matching the catalog's reference ruleset.
// ============================================================================
/// Fixed battle level for every participant.
pub const LEVEL: i32 = 100;
/// Fixed individual value applied to every stat.
pub const IV: i32 = 31;
/// Creatures per squad.
pub const SQUAD_SIZE: usize = 6;
/// Moves per battler.
pub const MOVES_PER_SET: usize = 4;
/// Stat stage floor.
pub const STAGE_MIN: Stage = -6;
/// Stat stage ceiling.
pub const STAGE_MAX: Stage = 6;

/// Same-type attack bonus multiplier.
pub const STAB_BONUS: f64 = 1.5;
/// Critical hit chance, in percent of a `[0, 100)` roll.
pub const CRIT_CHANCE: f64 = 6.25;
/// Critical hit damage multiplier.
pub const CRIT_BONUS: f64 = 1.5;
/// Lower bound of the uniform damage roll in `[DAMAGE_ROLL_MIN, 1.0]`.
pub const DAMAGE_ROLL_MIN: f64 = 0.85;
/// Chance a frozen battler thaws at its turn to act.
pub const THAW_CHANCE: f64 = 0.20;
/// Chance a paralyzed battler is fully paralyzed and loses its action.
pub const FULL_PARALYSIS_CHANCE: f64 = 0.25;
/// Chance a confused battler hits itself instead of acting.
pub const CONFUSION_SELF_HIT_CHANCE: f64 = 0.33;

// ============================================================================
// NETWORK PARAMETERS
// ============================================================================
/// How long the coordinator waits for each side's action per turn.
pub const TURN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(65);
/// Deadline applied to every socket write.
pub const WRITE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
/// Default listen host.
pub const DEFAULT_HOST: &str = "localhost";
/// Default listen port.
pub const DEFAULT_PORT: u16 = 9090;

// ============================================================================
// CATALOG PARAMETERS
// ============================================================================
/// Default base URL of the creature catalog API.
pub const CATALOG_BASE_URL: &str = "http://localhost:4000/api/v2";
/// Highest species id the catalog's reference generation covers.
pub const CATALOG_SPECIES: u32 = 386;
/// Lookup attempts per URL before the slot is rejected.
pub const CATALOG_RETRIES: usize = 3;
/// Backoff between lookup attempts.
pub const CATALOG_BACKOFF: std::time::Duration = std::time::Duration::from_millis(200);
/// Upper bound on concurrent catalog lookups during squad setup.
pub const CATALOG_FANOUT: usize = 10;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
