use super::Kind;
use super::stats;
use bd_catalog::Creature;
use bd_catalog::MoveData;
use bd_core::BaseStat;
use bd_core::CONFUSION_SELF_HIT_CHANCE;
use bd_core::FULL_PARALYSIS_CHANCE;
use bd_core::Hp;
use bd_core::ID;
use bd_core::Pp;
use bd_core::STAGE_MAX;
use bd_core::STAGE_MIN;
use bd_core::Stage;
use bd_core::StatValue;
use bd_core::THAW_CHANCE;
use bd_core::Unique;
use rand::Rng;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

/// Major status condition. A battler holds at most one until it is cured.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Status {
    Brn,
    Psn,
    Tox,
    Par,
    Slp,
    Frz,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Status::Brn => write!(f, "brn"),
            Status::Psn => write!(f, "psn"),
            Status::Tox => write!(f, "tox"),
            Status::Par => write!(f, "par"),
            Status::Slp => write!(f, "slp"),
            Status::Frz => write!(f, "frz"),
        }
    }
}

/// Transient per-battler flag. Does not persist across switches.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Volatile {
    Confusion,
    Flinch,
}

/// Base stat snapshot taken from the creature template at battler creation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatBlock {
    pub hp: BaseStat,
    pub attack: BaseStat,
    pub defense: BaseStat,
    pub special_attack: BaseStat,
    pub special_defense: BaseStat,
    pub speed: BaseStat,
}

impl From<&Creature> for StatBlock {
    fn from(creature: &Creature) -> Self {
        Self {
            hp: creature.base_stat("hp"),
            attack: creature.base_stat("attack"),
            defense: creature.base_stat("defense"),
            special_attack: creature.base_stat("special-attack"),
            special_defense: creature.base_stat("special-defense"),
            speed: creature.base_stat("speed"),
        }
    }
}

/// One creature instance in a duel.
///
/// Owns all mutable battle state; the immutable template data it needs is
/// snapshotted at construction so the engine never reaches back into the
/// catalog mid-duel.
#[derive(Debug, Clone)]
pub struct Battler {
    id: ID<Battler>,
    name: String,
    kinds: Vec<Kind>,
    base: StatBlock,
    max_hp: Hp,
    current_hp: Hp,
    moves: Vec<Arc<MoveData>>,
    pp: HashMap<String, Pp>,
    status: Option<Status>,
    status_turns: i32,
    tox_stacks: i32,
    fainted: bool,
    stages: HashMap<String, Stage>,
    volatile: HashSet<Volatile>,
}

impl Battler {
    pub fn new(creature: &Creature, moves: Vec<Arc<MoveData>>) -> Self {
        let kinds = creature
            .type_names()
            .into_iter()
            .filter_map(|name| match Kind::try_from(name) {
                Ok(kind) => Some(kind),
                Err(e) => {
                    log::warn!("[battler] {}: {}", creature.name, e);
                    None
                }
            })
            .collect();
        let base = StatBlock::from(creature);
        let max_hp = stats::max_hp(base.hp);
        let pp = moves.iter().map(|m| (m.name.clone(), m.pp)).collect();
        Self {
            id: ID::default(),
            name: creature.name.clone(),
            kinds,
            base,
            max_hp,
            current_hp: max_hp,
            moves,
            pp,
            status: None,
            status_turns: 0,
            tox_stacks: 0,
            fainted: false,
            stages: HashMap::new(),
            volatile: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kinds(&self) -> &[Kind] {
        &self.kinds
    }
    pub fn base(&self) -> &StatBlock {
        &self.base
    }
    pub fn max_hp(&self) -> Hp {
        self.max_hp
    }
    pub fn current_hp(&self) -> Hp {
        self.current_hp
    }
    pub fn hp_percent(&self) -> f64 {
        match self.max_hp > 0.0 {
            true => self.current_hp / self.max_hp * 100.0,
            false => 0.0,
        }
    }
    pub fn fainted(&self) -> bool {
        self.fainted
    }
    pub fn status(&self) -> Option<Status> {
        self.status
    }
    pub fn status_turns(&self) -> i32 {
        self.status_turns
    }
    pub fn moves(&self) -> &[Arc<MoveData>] {
        &self.moves
    }
    pub fn move_pp(&self, name: &str) -> Pp {
        self.pp.get(name).copied().unwrap_or(0)
    }
    /// Effective speed for action ordering.
    pub fn speed(&self) -> StatValue {
        stats::stat(self.base.speed)
    }
    pub fn stage(&self, stat: &str) -> Stage {
        self.stages.get(stat).copied().unwrap_or(0)
    }
    pub fn has_volatile(&self, flag: Volatile) -> bool {
        self.volatile.contains(&flag)
    }
}

impl Battler {
    /// Spends one PP of the named move. False when the battler is fainted,
    /// the move is unknown, or its PP is exhausted.
    pub fn use_move(&mut self, name: &str) -> bool {
        if self.fainted {
            return false;
        }
        match self.pp.get_mut(name) {
            Some(pp) if *pp > 0 => {
                *pp -= 1;
                true
            }
            _ => false,
        }
    }

    /// Subtracts damage, clamping at zero and marking the faint.
    pub fn apply_damage(&mut self, damage: Hp) {
        self.current_hp -= damage;
        if self.current_hp <= 0.0 {
            self.current_hp = 0.0;
            self.fainted = true;
        }
    }

    /// Sets a major status. Rejected while fainted or already statused.
    pub fn apply_status(&mut self, status: Status) -> bool {
        if self.fainted || self.status.is_some() {
            return false;
        }
        self.status = Some(status);
        if status == Status::Tox {
            self.tox_stacks = 1;
        }
        true
    }

    /// Sets a major status with a countdown (sleep and freeze durations).
    pub fn apply_status_with_duration(&mut self, status: Status, turns: i32) -> bool {
        if self.apply_status(status) {
            self.status_turns = turns;
            return true;
        }
        false
    }

    /// Clears the major status and every counter tied to it.
    pub fn cure_status(&mut self) {
        self.status = None;
        self.status_turns = 0;
        self.tox_stacks = 0;
    }

    /// Nudges a stat stage, clamped into the legal band.
    pub fn apply_stat_stage(&mut self, stat: &str, delta: Stage) {
        let stage = self.stages.entry(stat.to_string()).or_insert(0);
        *stage = (*stage + delta).clamp(STAGE_MIN, STAGE_MAX);
    }

    pub fn apply_volatile(&mut self, flag: Volatile) {
        self.volatile.insert(flag);
    }
    pub fn remove_volatile(&mut self, flag: Volatile) {
        self.volatile.remove(&flag);
    }
    /// Drops every volatile flag. Runs when the battler leaves the field.
    pub fn clear_volatiles(&mut self) {
        self.volatile.clear();
    }
}

impl Battler {
    /// Pre-move gate: decides whether the battler gets to execute its
    /// scheduled move this turn, emitting the events that explain why not.
    pub fn can_act<R: Rng>(&mut self, rng: &mut R) -> (bool, Vec<String>) {
        let mut events = Vec::new();
        if self.fainted {
            return (false, events);
        }
        if self.volatile.remove(&Volatile::Flinch) {
            events.push(format!("{} flinched and couldn't move!", self.name));
            return (false, events);
        }
        match self.status {
            Some(Status::Slp) => {
                if self.status_turns > 0 {
                    self.status_turns -= 1;
                    events.push(format!("{} is fast asleep.", self.name));
                    return (false, events);
                }
                self.cure_status();
                events.push(format!("{} woke up!", self.name));
            }
            Some(Status::Frz) => {
                if rng.random::<f64>() < THAW_CHANCE {
                    self.cure_status();
                    events.push(format!("{} thawed out!", self.name));
                } else {
                    events.push(format!("{} is frozen solid!", self.name));
                    return (false, events);
                }
            }
            Some(Status::Par) => {
                if rng.random::<f64>() < FULL_PARALYSIS_CHANCE {
                    events.push(format!("{} is paralyzed! It can't move!", self.name));
                    return (false, events);
                }
            }
            _ => {}
        }
        if self.volatile.contains(&Volatile::Confusion) {
            events.push(format!("{} is confused!", self.name));
            if rng.random::<f64>() < CONFUSION_SELF_HIT_CHANCE {
                let hurt = match self.max_hp > 0.0 {
                    true => (self.max_hp / 16.0).floor(),
                    false => 10.0,
                };
                self.apply_damage(hurt);
                events.push(format!("{} hurt itself in its confusion!", self.name));
                if self.fainted {
                    events.push(format!("{} fainted!", self.name));
                }
                return (false, events);
            }
        }
        (true, events)
    }

    /// Residual status damage after both sides have acted. Toxic stacks grow
    /// monotonically and reset only when the status clears.
    pub fn end_of_turn(&mut self) -> Vec<String> {
        let mut events = Vec::new();
        if self.fainted {
            return events;
        }
        let residual = match self.status {
            Some(Status::Brn) => Some(((self.max_hp / 16.0).floor(), "is hurt by its burn")),
            Some(Status::Psn) => Some(((self.max_hp / 8.0).floor(), "is hurt by poison")),
            Some(Status::Tox) => {
                let damage = ((self.tox_stacks as f64 * self.max_hp) / 16.0).floor();
                self.tox_stacks += 1;
                Some((damage, "is hurt by poison"))
            }
            _ => None,
        };
        if let Some((damage, text)) = residual {
            self.apply_damage(damage);
            events.push(format!("{} {}!", self.name, text));
            if self.fainted {
                events.push(format!("{} fainted!", self.name));
            }
        }
        events
    }
}

impl Unique for Battler {
    fn id(&self) -> ID<Battler> {
        self.id
    }
}

impl std::fmt::Display for Battler {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {:.1}/{:.1}", self.name, self.current_hp, self.max_hp)?;
        if let Some(status) = self.status {
            write!(f, " [{}]", status)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bd_catalog::fixtures::FixtureCatalog;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn battler(name: &str, moves: &[&str]) -> Battler {
        let catalog = FixtureCatalog::standard();
        let moves = moves
            .iter()
            .map(|m| Arc::new(catalog.get_move(m)))
            .collect();
        Battler::new(&catalog.get(name), moves)
    }

    #[test]
    fn construction_derives_hp_and_pp() {
        let b = battler("charmander", &["ember", "scratch"]);
        assert_eq!(b.max_hp(), 150.0);
        assert_eq!(b.current_hp(), 150.0);
        assert_eq!(b.move_pp("ember"), 25);
        assert_eq!(b.move_pp("scratch"), 35);
        assert_eq!(b.kinds(), &[Kind::Fire]);
        assert!(!b.fainted());
    }

    #[test]
    fn damage_clamps_and_faints() {
        let mut b = battler("charmander", &["ember"]);
        b.apply_damage(149.5);
        assert!(!b.fainted());
        assert_eq!(b.current_hp(), 0.5);
        b.apply_damage(10.0);
        assert!(b.fainted());
        assert_eq!(b.current_hp(), 0.0);
    }

    #[test]
    fn pp_drains_and_bottoms_out() {
        let mut b = battler("charmander", &["ember"]);
        for _ in 0..25 {
            assert!(b.use_move("ember"));
        }
        assert!(!b.use_move("ember"));
        assert_eq!(b.move_pp("ember"), 0);
    }

    #[test]
    fn fainted_battler_cannot_move_or_gain_status() {
        let mut b = battler("charmander", &["ember"]);
        b.apply_damage(1000.0);
        assert!(!b.use_move("ember"));
        assert!(!b.apply_status(Status::Brn));
    }

    #[test]
    fn one_major_status_at_a_time() {
        let mut b = battler("charmander", &["ember"]);
        assert!(b.apply_status(Status::Brn));
        assert!(!b.apply_status(Status::Psn));
        b.cure_status();
        assert!(b.apply_status(Status::Psn));
    }

    #[test]
    fn stat_stages_clamp() {
        let mut b = battler("charmander", &["ember"]);
        for _ in 0..10 {
            b.apply_stat_stage("attack", 1);
        }
        assert_eq!(b.stage("attack"), STAGE_MAX);
        for _ in 0..20 {
            b.apply_stat_stage("attack", -1);
        }
        assert_eq!(b.stage("attack"), STAGE_MIN);
    }

    #[test]
    fn flinch_consumes_the_flag_and_blocks_action() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut b = battler("charmander", &["ember"]);
        b.apply_volatile(Volatile::Flinch);
        let (acts, events) = b.can_act(&mut rng);
        assert!(!acts);
        assert!(events[0].contains("flinched"));
        assert!(!b.has_volatile(Volatile::Flinch));
        let (acts, _) = b.can_act(&mut rng);
        assert!(acts);
    }

    #[test]
    fn sleep_counts_down_then_wakes() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut b = battler("charmander", &["ember"]);
        assert!(b.apply_status_with_duration(Status::Slp, 2));
        let (acts, _) = b.can_act(&mut rng);
        assert!(!acts);
        let (acts, _) = b.can_act(&mut rng);
        assert!(!acts);
        let (acts, events) = b.can_act(&mut rng);
        assert!(acts);
        assert!(events[0].contains("woke up"));
        assert!(b.status().is_none());
    }

    #[test]
    fn frozen_either_thaws_or_stays_frozen() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut b = battler("charmander", &["ember"]);
        assert!(b.apply_status(Status::Frz));
        let (acts, events) = b.can_act(&mut rng);
        match acts {
            true => {
                assert!(events.iter().any(|e| e.contains("thawed")));
                assert!(b.status().is_none());
            }
            false => {
                assert!(events.iter().any(|e| e.contains("frozen")));
                assert_eq!(b.status(), Some(Status::Frz));
            }
        }
    }

    #[test]
    fn burn_residual_is_a_sixteenth() {
        let mut b = battler("charmander", &["ember"]);
        b.apply_status(Status::Brn);
        let events = b.end_of_turn();
        assert_eq!(b.current_hp(), 150.0 - (150.0f64 / 16.0).floor());
        assert!(events[0].contains("burn"));
    }

    #[test]
    fn toxic_stacks_grow_each_turn() {
        let mut b = battler("slowbro", &["tackle"]);
        b.apply_status(Status::Tox);
        let max = b.max_hp();
        b.end_of_turn();
        let first = max - b.current_hp();
        b.end_of_turn();
        let second = max - b.current_hp() - first;
        assert_eq!(first, (max / 16.0).floor());
        assert_eq!(second, (2.0 * max / 16.0).floor());
        b.cure_status();
        b.apply_status(Status::Tox);
        b.end_of_turn();
        // stacks reset with the cure
        assert_eq!(max - b.current_hp() - first - second, (max / 16.0).floor());
    }

    #[test]
    fn residual_faint_emits_event() {
        let mut b = battler("charmander", &["ember"]);
        b.apply_status(Status::Psn);
        b.apply_damage(149.0);
        let events = b.end_of_turn();
        assert!(b.fainted());
        assert!(events.iter().any(|e| e.contains("fainted")));
    }
}
