use bd_core::BaseStat;
use bd_core::Pp;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// The catalog reports some numeric fields as JSON null (e.g. accuracy of
/// moves that never miss). Zero carries the same meaning downstream.
fn zero_when_null<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or(0))
}

/// A named catalog resource with its lookup URL.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// One base stat line of a creature.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatLine {
    pub base_stat: BaseStat,
    pub stat: Resource,
}

/// One typing slot of a creature. Slot 1 is the primary type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: i32,
    #[serde(rename = "type")]
    pub kind: Resource,
}

/// How and where a creature learns a move.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LearnDetail {
    #[serde(default)]
    pub level_learned_at: i32,
    pub move_learn_method: Resource,
    pub version_group: Resource,
}

/// A move reference on a creature's learn list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Learnable {
    #[serde(rename = "move")]
    pub reference: Resource,
    #[serde(default)]
    pub version_group_details: Vec<LearnDetail>,
}

/// Immutable creature template as served by the catalog.
///
/// Base stats arrive as a list of named lines rather than a struct because
/// that is the catalog's wire shape; [`Creature::base_stat`] resolves a line
/// by its canonical name (`hp`, `attack`, `defense`, `special-attack`,
/// `special-defense`, `speed`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Creature {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatLine>,
    #[serde(default)]
    pub moves: Vec<Learnable>,
}

impl Creature {
    /// Base stat by canonical catalog name. Zero when the line is absent.
    pub fn base_stat(&self, name: &str) -> BaseStat {
        self.stats
            .iter()
            .find(|line| line.stat.name == name)
            .map(|line| line.base_stat)
            .unwrap_or(0)
    }
    /// Type names in slot order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.kind.name.as_str()).collect()
    }
}

/// Damage class of a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageClass {
    Physical,
    Special,
    Status,
}

impl std::fmt::Display for DamageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Physical => write!(f, "physical"),
            Self::Special => write!(f, "special"),
            Self::Status => write!(f, "status"),
        }
    }
}

/// Immutable move template as served by the catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    #[serde(default, deserialize_with = "zero_when_null")]
    pub power: i32,
    #[serde(default, deserialize_with = "zero_when_null")]
    pub accuracy: i32,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub pp: Pp,
    pub damage_class: Resource,
    #[serde(rename = "type")]
    pub kind: Resource,
}

impl MoveData {
    /// Damage class, defaulting unknown catalog values to `Status` so they
    /// never deal direct damage.
    pub fn class(&self) -> DamageClass {
        match self.damage_class.name.as_str() {
            "physical" => DamageClass::Physical,
            "special" => DamageClass::Special,
            _ => DamageClass::Status,
        }
    }
    /// Attacking type name.
    pub fn kind_name(&self) -> &str {
        &self.kind.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_power_and_accuracy_read_as_zero() {
        let json = r#"{
            "name": "splash",
            "power": null,
            "accuracy": null,
            "priority": 0,
            "pp": 40,
            "damage_class": {"name": "status", "url": ""},
            "type": {"name": "normal", "url": ""}
        }"#;
        let mv: MoveData = serde_json::from_str(json).unwrap();
        assert_eq!(mv.power, 0);
        assert_eq!(mv.accuracy, 0);
        assert_eq!(mv.class(), DamageClass::Status);
    }

    #[test]
    fn base_stat_resolves_by_name() {
        let json = r#"{
            "id": 7,
            "name": "squirtle",
            "types": [{"slot": 1, "type": {"name": "water", "url": ""}}],
            "stats": [
                {"base_stat": 44, "stat": {"name": "hp", "url": ""}},
                {"base_stat": 48, "stat": {"name": "attack", "url": ""}}
            ],
            "moves": []
        }"#;
        let creature: Creature = serde_json::from_str(json).unwrap();
        assert_eq!(creature.base_stat("hp"), 44);
        assert_eq!(creature.base_stat("attack"), 48);
        assert_eq!(creature.base_stat("speed"), 0);
        assert_eq!(creature.type_names(), vec!["water"]);
    }
}
