use super::Catalog;
use super::Creature;
use super::MoveData;
use super::pick_moves;
use bd_core::CATALOG_FANOUT;
use bd_core::CATALOG_SPECIES;
use bd_core::SQUAD_SIZE;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// One assembled squad slot: a creature template and its battle moveset.
#[derive(Clone, Debug)]
pub struct SquadSlot {
    pub creature: Arc<Creature>,
    pub moves: Vec<Arc<MoveData>>,
}

/// Assembles a squad of six distinct random species.
///
/// Creature and move lookups run concurrently under one shared permit pool so
/// total catalog fan-out stays bounded. Any slot that cannot be resolved
/// fails the whole squad; the caller aborts setup.
pub async fn random_squad(catalog: &dyn Catalog) -> anyhow::Result<Vec<SquadSlot>> {
    let species = rand::seq::index::sample(&mut rand::rng(), CATALOG_SPECIES as usize, SQUAD_SIZE)
        .into_iter()
        .map(|index| index as u32 + 1)
        .collect::<Vec<_>>();
    log::debug!("[catalog] assembling squad from species {:?}", species);
    let bound = Semaphore::new(CATALOG_FANOUT);
    futures::future::try_join_all(species.into_iter().map(|id| {
        let bound = &bound;
        async move {
            let creature = {
                let _permit = bound.acquire().await?;
                catalog.creature(&id.to_string()).await?
            };
            let moves = pick_moves(catalog, &creature, bound).await?;
            Ok(SquadSlot { creature, moves })
        }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FixtureCatalog;

    #[tokio::test]
    async fn squad_has_six_slots_with_moves() {
        let catalog = FixtureCatalog::standard();
        let squad = random_squad(&catalog).await.unwrap();
        assert_eq!(squad.len(), SQUAD_SIZE);
        for slot in &squad {
            assert!(!slot.moves.is_empty());
            assert!(slot.creature.base_stat("hp") > 0);
        }
    }
}
