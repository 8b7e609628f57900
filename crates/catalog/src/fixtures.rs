//! Deterministic in-memory catalog for tests and offline play.
//!
//! Serves a small roster of real catalog entries with pinned base stats so
//! engine tests can assert exact derived values. Move URLs use a `fixture://`
//! scheme; numeric creature idents cycle through the roster.
use super::Catalog;
use super::Creature;
use super::Learnable;
use super::LearnDetail;
use super::MoveData;
use super::Resource;
use super::StatLine;
use super::TypeSlot;
use std::collections::HashMap;
use std::sync::Arc;

const STAT_NAMES: [&str; 6] = [
    "hp",
    "attack",
    "defense",
    "special-attack",
    "special-defense",
    "speed",
];

fn resource(name: &str, url: &str) -> Resource {
    Resource {
        name: name.to_string(),
        url: url.to_string(),
    }
}

fn creature(id: u32, name: &str, kinds: &[&str], stats: [i32; 6], learnset: &[&str]) -> Creature {
    Creature {
        id,
        name: name.to_string(),
        types: kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| TypeSlot {
                slot: i as i32 + 1,
                kind: resource(kind, ""),
            })
            .collect(),
        stats: STAT_NAMES
            .iter()
            .zip(stats)
            .map(|(stat, base_stat)| StatLine {
                base_stat,
                stat: resource(stat, ""),
            })
            .collect(),
        moves: learnset
            .iter()
            .map(|mv| Learnable {
                reference: resource(mv, &format!("fixture://move/{}", mv)),
                version_group_details: vec![LearnDetail {
                    level_learned_at: 1,
                    move_learn_method: resource("level-up", ""),
                    version_group: resource("firered-leafgreen", ""),
                }],
            })
            .collect(),
    }
}

fn attack(name: &str, kind: &str, class: &str, power: i32, accuracy: i32, priority: i32, pp: i32) -> MoveData {
    MoveData {
        name: name.to_string(),
        power,
        accuracy,
        priority,
        pp,
        damage_class: resource(class, ""),
        kind: resource(kind, ""),
    }
}

/// In-memory catalog with a fixed roster.
pub struct FixtureCatalog {
    roster: Vec<Arc<Creature>>,
    by_name: HashMap<String, Arc<Creature>>,
    moves: HashMap<String, Arc<MoveData>>,
}

impl FixtureCatalog {
    /// The standard test roster: pinned base stats from the reference catalog.
    pub fn standard() -> Self {
        let roster = vec![
            creature(1, "bulbasaur", &["grass", "poison"], [45, 49, 49, 65, 65, 45], &["vine-whip", "tackle", "growl"]),
            creature(4, "charmander", &["fire"], [39, 52, 43, 60, 50, 65], &["ember", "scratch", "growl", "swift"]),
            creature(7, "squirtle", &["water"], [44, 48, 65, 50, 64, 43], &["water-gun", "tackle", "tail-whip"]),
            creature(25, "pikachu", &["electric"], [35, 55, 40, 50, 50, 90], &["thunder-shock", "quick-attack", "growl"]),
            creature(80, "slowbro", &["water", "psychic"], [95, 75, 110, 100, 80, 30], &["water-gun", "tackle"]),
            creature(92, "gastly", &["ghost", "poison"], [30, 35, 30, 100, 35, 80], &["lick", "night-shade"]),
            creature(95, "onix", &["rock", "ground"], [35, 45, 160, 30, 45, 70], &["rock-throw", "tackle", "earthquake"]),
            creature(215, "sneasel", &["dark", "ice"], [55, 95, 55, 35, 75, 115], &["scratch", "quick-attack"]),
        ];
        let moves = vec![
            attack("tackle", "normal", "physical", 40, 100, 0, 35),
            attack("scratch", "normal", "physical", 40, 100, 0, 35),
            attack("quick-attack", "normal", "physical", 40, 100, 1, 30),
            attack("swift", "normal", "special", 60, 0, 0, 20),
            attack("ember", "fire", "special", 40, 100, 0, 25),
            attack("water-gun", "water", "special", 40, 100, 0, 25),
            attack("vine-whip", "grass", "special", 45, 100, 0, 25),
            attack("thunder-shock", "electric", "special", 40, 100, 0, 30),
            attack("lick", "ghost", "physical", 30, 100, 0, 30),
            attack("night-shade", "ghost", "special", 60, 100, 0, 15),
            attack("rock-throw", "rock", "physical", 50, 90, 0, 15),
            attack("earthquake", "ground", "physical", 100, 100, 0, 10),
            attack("hyper-beam", "normal", "special", 150, 90, 0, 5),
            attack("growl", "normal", "status", 0, 100, 0, 40),
            attack("tail-whip", "normal", "status", 0, 100, 0, 30),
        ];
        let by_name = roster
            .iter()
            .cloned()
            .map(|c| Arc::new(c))
            .map(|c| (c.name.clone(), c))
            .collect::<HashMap<_, _>>();
        Self {
            roster: by_name.values().cloned().collect(),
            by_name,
            moves: moves
                .into_iter()
                .map(Arc::new)
                .map(|m| (format!("fixture://move/{}", m.name), m))
                .collect(),
        }
    }

    /// A roster creature by name. Panics on unknown names; fixtures are for
    /// tests.
    pub fn get(&self, name: &str) -> Creature {
        self.by_name
            .get(name)
            .map(|c| c.as_ref().clone())
            .expect("fixture creature")
    }

    /// A roster move by name. Panics on unknown names.
    pub fn get_move(&self, name: &str) -> MoveData {
        self.moves
            .get(&format!("fixture://move/{}", name))
            .map(|m| m.as_ref().clone())
            .expect("fixture move")
    }
}

#[async_trait::async_trait]
impl Catalog for FixtureCatalog {
    async fn creature(&self, ident: &str) -> anyhow::Result<Arc<Creature>> {
        if let Some(hit) = self.by_name.get(ident) {
            return Ok(hit.clone());
        }
        let id = ident
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("unknown fixture creature: {}", ident))?;
        Ok(self.roster[id % self.roster.len()].clone())
    }

    async fn move_data(&self, url: &str) -> anyhow::Result<Arc<MoveData>> {
        self.moves
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown fixture move: {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn numeric_idents_cycle_the_roster() {
        let catalog = FixtureCatalog::standard();
        let one = catalog.creature("1").await.unwrap();
        let far = catalog.creature("301").await.unwrap();
        assert!(!one.name.is_empty());
        assert!(!far.name.is_empty());
    }

    #[tokio::test]
    async fn move_lookup_by_fixture_url() {
        let catalog = FixtureCatalog::standard();
        let mv = catalog.move_data("fixture://move/ember").await.unwrap();
        assert_eq!(mv.name, "ember");
        assert_eq!(mv.power, 40);
    }
}
