use std::time::Duration;

use serde::Deserialize;

use crate::error::{BattleError, BattleResult};

/// Default remote catalog base URL.
pub const DEFAULT_CATALOG_URL: &str = "https://pokeapi.co/api/v2/pokemon";

/// Per-creature catalog record: display name plus sprite URLs by facing.
#[derive(Clone, Debug, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default)]
    pub sprites: SpriteSet,
}

/// Facing-keyed sprite URLs; any of them may be absent.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SpriteSet {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
    pub back_default: Option<String>,
    pub back_shiny: Option<String>,
}

/// Catalog access seam: one call for metadata, one for raw sprite bytes.
///
/// Implementations may fail; the resolver above this boundary absorbs
/// failures into "unavailable".
pub trait SpriteSource {
    fn entry(&self, identifier: &str) -> BattleResult<CatalogEntry>;
    fn image_bytes(&self, url: &str) -> BattleResult<Vec<u8>>;
}

/// Blocking HTTP catalog client with a bounded timeout; a timed-out fetch is
/// indistinguishable from an unavailable sprite.
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> BattleResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BattleError::catalog(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl SpriteSource for HttpCatalog {
    fn entry(&self, identifier: &str) -> BattleResult<CatalogEntry> {
        let url = format!("{}/{}", self.base_url, identifier);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| BattleError::catalog(format!("fetch {url}: {e}")))?;
        if !resp.status().is_success() {
            return Err(BattleError::catalog(format!(
                "fetch {url}: status {}",
                resp.status()
            )));
        }
        resp.json::<CatalogEntry>()
            .map_err(|e| BattleError::catalog(format!("decode {url}: {e}")))
    }

    fn image_bytes(&self, url: &str) -> BattleResult<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| BattleError::catalog(format!("fetch {url}: {e}")))?;
        if !resp.status().is_success() {
            return Err(BattleError::catalog(format!(
                "fetch {url}: status {}",
                resp.status()
            )));
        }
        let bytes = resp
            .bytes()
            .map_err(|e| BattleError::catalog(format!("read {url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}
