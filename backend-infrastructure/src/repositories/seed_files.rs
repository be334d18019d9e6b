use std::path::Path;

use anyhow::{anyhow, Result};
use tokio::fs;
use tracing::info;

use super::memory_store::{MemoryStore, StoreSnapshot};

/// Loads a JSON snapshot for the in-memory store. A missing file yields an
/// empty store.
pub async fn load_memory_store(path: Option<&str>) -> Result<MemoryStore> {
    let Some(path) = path else {
        return Ok(MemoryStore::new());
    };
    if !Path::new(path).exists() {
        info!("seed file {} not found, starting empty", path);
        return Ok(MemoryStore::new());
    }
    let content = fs::read_to_string(path).await?;
    let snapshot: StoreSnapshot = serde_json::from_str(&content)
        .map_err(|err| anyhow!("invalid seed file {}: {}", path, err))?;
    info!(
        "seeded memory store from {} ({} events, {} event types)",
        path,
        snapshot.events.len(),
        snapshot.event_types.len()
    );
    Ok(MemoryStore::from_snapshot(snapshot))
}
