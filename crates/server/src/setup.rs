//! Squad assembly at match start.
use bd_arena::ServerMessage;
use bd_catalog::Catalog;
use bd_catalog::SquadSlot;
use bd_catalog::random_squad;
use bd_engine::Battler;
use bd_engine::Squad;

/// Builds both sides' random squads concurrently against the catalog.
/// Either squad failing aborts the whole setup; the duel never starts.
pub async fn build_squads(catalog: &dyn Catalog) -> anyhow::Result<(Squad, Squad)> {
    let (yours, theirs) = tokio::join!(random_squad(catalog), random_squad(catalog));
    Ok((to_squad(yours?), to_squad(theirs?)))
}

/// Instantiates battlers from resolved catalog slots.
fn to_squad(slots: Vec<SquadSlot>) -> Squad {
    Squad::new(
        slots
            .into_iter()
            .map(|slot| Battler::new(&slot.creature, slot.moves))
            .collect(),
    )
}

/// The `game_start` message for one side's perspective.
pub fn game_start(yours: &Squad, theirs: &Squad) -> ServerMessage {
    ServerMessage::GameStart {
        your_squad: yours.names(),
        opponent_squad: theirs.names(),
        your_pokemon: yours.active().name().to_string(),
        opponent_pokemon: theirs.active().name().to_string(),
        your_moves: yours
            .active()
            .moves()
            .iter()
            .map(|m| m.name.clone())
            .collect(),
    }
}
