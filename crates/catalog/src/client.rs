use super::Catalog;
use super::Creature;
use super::MoveData;
use bd_core::CATALOG_BACKOFF;
use bd_core::CATALOG_BASE_URL;
use bd_core::CATALOG_RETRIES;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// HTTP-backed catalog oracle.
///
/// Wraps a reqwest client with an in-memory cache for both query kinds and a
/// per-URL retry loop. The base URL points at a catalog API mirror serving
/// `/pokemon/<ident>/` and absolute move URLs.
pub struct HttpCatalog {
    base: String,
    http: reqwest::Client,
    creatures: RwLock<HashMap<String, Arc<Creature>>>,
    moves: RwLock<HashMap<String, Arc<MoveData>>>,
}

impl HttpCatalog {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http: reqwest::Client::new(),
            creatures: RwLock::new(HashMap::new()),
            moves: RwLock::new(HashMap::new()),
        }
    }

    /// GET a JSON document with the catalog retry budget.
    async fn fetch<T>(&self, url: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut last = None;
        for attempt in 1..=CATALOG_RETRIES {
            match self.attempt::<T>(url).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    log::warn!("[catalog] attempt {}/{} failed for {}: {}", attempt, CATALOG_RETRIES, url, e);
                    last = Some(e);
                    if attempt < CATALOG_RETRIES {
                        tokio::time::sleep(CATALOG_BACKOFF).await;
                    }
                }
            }
        }
        Err(last.unwrap_or_else(|| anyhow::anyhow!("catalog lookup failed: {}", url)))
    }

    async fn attempt<T>(&self, url: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.http.get(url).send().await?;
        let response = response.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

impl Default for HttpCatalog {
    fn default() -> Self {
        Self::new(CATALOG_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Catalog for HttpCatalog {
    async fn creature(&self, ident: &str) -> anyhow::Result<Arc<Creature>> {
        if let Some(hit) = self.creatures.read().await.get(ident) {
            return Ok(hit.clone());
        }
        let url = format!("{}/pokemon/{}/", self.base, ident);
        let creature = Arc::new(self.fetch::<Creature>(&url).await?);
        self.creatures
            .write()
            .await
            .insert(ident.to_string(), creature.clone());
        log::debug!("[catalog] cached creature {}", creature.name);
        Ok(creature)
    }

    async fn move_data(&self, url: &str) -> anyhow::Result<Arc<MoveData>> {
        if let Some(hit) = self.moves.read().await.get(url) {
            return Ok(hit.clone());
        }
        let mv = Arc::new(self.fetch::<MoveData>(url).await?);
        self.moves.write().await.insert(url.to_string(), mv.clone());
        log::debug!("[catalog] cached move {}", mv.name);
        Ok(mv)
    }
}
