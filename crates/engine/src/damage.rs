use super::Battler;
use super::Kind;
use super::Status;
use super::stats;
use bd_catalog::DamageClass;
use bd_catalog::MoveData;
use bd_core::CRIT_BONUS;
use bd_core::CRIT_CHANCE;
use bd_core::DAMAGE_ROLL_MIN;
use bd_core::LEVEL;
use bd_core::STAB_BONUS;
use rand::Rng;

/// Outcome of one damage computation.
#[derive(Debug, Clone, Default)]
pub struct DamageReport {
    /// Integer damage to subtract from the defender.
    pub amount: i32,
    /// Damage as a percentage of the defender's maximum HP.
    pub percent: f64,
    /// Calculator-emitted event lines, in order.
    pub events: Vec<String>,
}

impl DamageReport {
    fn none() -> Self {
        Self::default()
    }
    fn missed(attacker: &Battler) -> Self {
        Self {
            events: vec![format!("{} missed!", attacker.name())],
            ..Self::default()
        }
    }
    fn immune(defender: &Battler) -> Self {
        Self {
            events: vec![format!("It doesn't affect {}!", defender.name())],
            ..Self::default()
        }
    }
}

/// Computes the damage one move deals, pure given the RNG.
///
/// Draws from the RNG in a fixed order (accuracy, damage roll, crit roll) so
/// a seeded generator reproduces the exact report.
pub fn damage<R: Rng>(
    attacker: &Battler,
    defender: &Battler,
    mv: &MoveData,
    rng: &mut R,
) -> DamageReport {
    let (attack, defense) = match mv.class() {
        DamageClass::Physical => (stats::stat(attacker.base().attack), stats::stat(defender.base().defense)),
        DamageClass::Special => (
            stats::stat(attacker.base().special_attack),
            stats::stat(defender.base().special_defense),
        ),
        DamageClass::Status => return DamageReport::none(),
    };
    if attack == 0 || defense == 0 {
        log::warn!("[damage] stat retrieval failed for {} vs {}", attacker.name(), defender.name());
        return DamageReport::none();
    }
    if mv.power == 0 {
        return DamageReport::none();
    }
    let mut attack = attack as f64;
    if attacker.status() == Some(Status::Brn) && mv.class() == DamageClass::Physical {
        attack /= 2.0;
    }

    if mv.accuracy > 0 && rng.random_range(0.0..100.0) >= mv.accuracy as f64 {
        return DamageReport::missed(attacker);
    }

    let kind = Kind::try_from(mv.kind_name()).ok();
    let stab = match kind {
        Some(kind) if attacker.kinds().contains(&kind) => STAB_BONUS,
        _ => 1.0,
    };
    let effectiveness = match kind {
        Some(kind) => kind.against(defender.kinds()),
        None => 1.0,
    };
    let mut events = Vec::new();
    if effectiveness == 0.0 {
        return DamageReport::immune(defender);
    } else if effectiveness > 1.0 {
        events.push("It's super effective!".to_string());
    } else if effectiveness < 1.0 {
        events.push("It's not very effective...".to_string());
    }

    let mut base = ((2.0 * LEVEL as f64 / 5.0 + 2.0) * mv.power as f64 * attack / defense as f64) / 50.0;
    if base < 1.0 {
        base = 1.0;
    }
    base += 2.0;

    let roll = rng.random_range(DAMAGE_ROLL_MIN..=1.0);
    let crit = match rng.random_range(0.0..100.0) < CRIT_CHANCE {
        true => {
            events.push("Critical hit!".to_string());
            CRIT_BONUS
        }
        false => 1.0,
    };

    let mut amount = (base * stab * effectiveness * roll * crit).floor() as i32;
    if amount < 1 {
        amount = 1;
    }
    let percent = amount as f64 / defender.max_hp() * 100.0;
    DamageReport {
        amount,
        percent,
        events,
    }
}
