use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use backend_application::AppState;
use backend_domain::{EventRepository, StoreKind};
use backend_infrastructure::{build_state, load_memory_store, AppConfig, ClickhouseRepo};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config()?;

        let state = match db_config.store {
            StoreKind::Clickhouse => {
                let repo = Arc::new(ClickhouseRepo::from_config(&db_config));
                repo.ensure_schema().await?;
                info!(
                    "using clickhouse store {} at {}",
                    db_config.clickhouse_database, db_config.clickhouse_url
                );
                build_state(runtime_config, repo)
            }
            StoreKind::Memory => {
                let store =
                    Arc::new(load_memory_store(db_config.memory_seed_path.as_deref()).await?);
                info!("using in-memory store");
                build_state(runtime_config, store)
            }
        };

        Ok(Self { state })
    }
}
