use super::Catalog;
use super::Creature;
use super::DamageClass;
use super::MoveData;
use super::Resource;
use bd_core::CATALOG_FANOUT;
use bd_core::MOVES_PER_SET;
use futures::StreamExt;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Reference version group the learn list is filtered against.
const VERSION_GROUP: &str = "firered-leafgreen";

/// Move learn methods eligible for a battle moveset.
const LEARN_METHODS: [&str; 2] = ["level-up", "egg"];

/// Filters a creature's learn list to moves it learns naturally in the
/// reference version group, deduplicated by name in list order.
pub fn learnable(creature: &Creature) -> Vec<Resource> {
    let mut seen = HashSet::new();
    creature
        .moves
        .iter()
        .filter(|entry| {
            entry.version_group_details.iter().any(|detail| {
                LEARN_METHODS.contains(&detail.move_learn_method.name.as_str())
                    && detail.version_group.name == VERSION_GROUP
            })
        })
        .map(|entry| entry.reference.clone())
        .filter(|reference| seen.insert(reference.name.clone()))
        .collect()
}

/// Picks a battle moveset: shuffle the learnable references, resolve them
/// against the catalog with bounded fan-out, and keep the first four that
/// deal damage. Failed lookups are skipped; an empty result rejects the slot.
pub async fn pick_moves(
    catalog: &dyn Catalog,
    creature: &Creature,
    bound: &Semaphore,
) -> anyhow::Result<Vec<Arc<MoveData>>> {
    let mut candidates = learnable(creature);
    candidates.shuffle(&mut rand::rng());
    let picked = futures::stream::iter(candidates)
        .map(|reference| async move {
            let _permit = bound.acquire().await?;
            catalog.move_data(&reference.url).await
        })
        .buffered(CATALOG_FANOUT)
        .filter_map(|result| async move {
            match result {
                Ok(mv) if mv.class() != DamageClass::Status => Some(mv),
                Ok(mv) => {
                    log::debug!("[catalog] skipping status move {}", mv.name);
                    None
                }
                Err(e) => {
                    log::warn!("[catalog] skipping unresolvable move: {}", e);
                    None
                }
            }
        })
        .take(MOVES_PER_SET)
        .collect::<Vec<_>>()
        .await;
    if picked.is_empty() {
        anyhow::bail!("no usable moves for {}", creature.name);
    }
    Ok(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FixtureCatalog;

    #[test]
    fn learnable_filters_method_and_version_group() {
        let catalog = FixtureCatalog::standard();
        let creature = catalog.get("charmander");
        let moves = learnable(&creature);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| !m.name.is_empty()));
    }

    #[tokio::test]
    async fn picked_moves_deal_damage() {
        let catalog = FixtureCatalog::standard();
        let creature = catalog.get("charmander");
        let bound = Semaphore::new(CATALOG_FANOUT);
        let moves = pick_moves(&catalog, &creature, &bound).await.unwrap();
        assert!(!moves.is_empty());
        assert!(moves.len() <= MOVES_PER_SET);
        assert!(moves.iter().all(|m| m.class() != DamageClass::Status));
    }
}
