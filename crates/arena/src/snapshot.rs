use bd_core::Pp;
use bd_engine::Battler;
use bd_engine::Squad;
use serde::Deserialize;
use serde::Serialize;

/// One squad slot as reported to clients in `turn_result`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SlotState {
    pub squad_index: usize,
    pub name: String,
    pub current_hp: f64,
    pub max_hp: f64,
    pub hp_percent: f64,
    pub fainted: bool,
    /// Major status abbreviation, empty when healthy.
    pub status: String,
}

/// One move menu entry as reported to clients in `turn_request`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MovePp {
    pub name: String,
    pub current_pp: Pp,
    pub max_pp: Pp,
}

/// Full squad state in slot order.
pub fn snapshot(squad: &Squad) -> Vec<SlotState> {
    squad
        .battlers()
        .iter()
        .enumerate()
        .map(|(squad_index, b)| SlotState {
            squad_index,
            name: b.name().to_string(),
            current_hp: b.current_hp(),
            max_hp: b.max_hp(),
            hp_percent: b.hp_percent(),
            fainted: b.fainted(),
            status: b.status().map(|s| s.to_string()).unwrap_or_default(),
        })
        .collect()
}

/// The active battler's move menu with live PP counts.
pub fn move_menu(battler: &Battler) -> Vec<MovePp> {
    battler
        .moves()
        .iter()
        .map(|m| MovePp {
            name: m.name.clone(),
            current_pp: battler.move_pp(&m.name),
            max_pp: m.pp,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bd_catalog::fixtures::FixtureCatalog;
    use bd_engine::Status;
    use std::sync::Arc;

    fn squad() -> Squad {
        let catalog = FixtureCatalog::standard();
        let names = ["charmander", "squirtle", "bulbasaur", "pikachu", "onix", "sneasel"];
        Squad::new(
            names
                .iter()
                .map(|n| Battler::new(&catalog.get(n), vec![Arc::new(catalog.get_move("tackle"))]))
                .collect(),
        )
    }

    #[test]
    fn snapshot_covers_every_slot_in_order() {
        let mut squad = squad();
        squad.active_mut().apply_damage(30.0);
        squad.active_mut().apply_status(Status::Brn);
        let state = snapshot(&squad);
        assert_eq!(state.len(), 6);
        assert_eq!(state[0].name, "charmander");
        assert_eq!(state[0].current_hp, 120.0);
        assert_eq!(state[0].status, "brn");
        assert!(!state[0].fainted);
        assert_eq!(state[1].status, "");
        assert!((state[0].hp_percent - 80.0).abs() < 1e-9);
    }

    #[test]
    fn move_menu_tracks_pp() {
        let mut squad = squad();
        squad.active_mut().use_move("tackle");
        let menu = move_menu(squad.active());
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].name, "tackle");
        assert_eq!(menu[0].current_pp, 34);
        assert_eq!(menu[0].max_pp, 35);
    }
}
