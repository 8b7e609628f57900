use super::Creature;
use super::MoveData;
use std::sync::Arc;

/// Read-only oracle over the external creature catalog.
///
/// Implementations must cache: squad setup fans out dozens of lookups and the
/// same moves recur across squads. Lookups that keep failing after the
/// implementation's retry budget reject the affected squad slot.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch a creature template by name or numeric id.
    async fn creature(&self, ident: &str) -> anyhow::Result<Arc<Creature>>;
    /// Fetch a move template by its catalog URL.
    async fn move_data(&self, url: &str) -> anyhow::Result<Arc<MoveData>>;
}
