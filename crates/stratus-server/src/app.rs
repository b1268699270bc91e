//! Wiring from configuration to a ready-to-serve read API.

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use std::sync::Arc;
use stratus_query::{ReadApi, ReadApiConfig, ReadOrchestrator};
use stratus_storage::MemoryStore;
use tracing::{info, warn};

/// Build the backing store, seeding it from the configured fixture.
pub async fn build_store(config: &ServerConfig) -> Result<MemoryStore> {
    let store = MemoryStore::new();
    store.create_table(&config.store.table).await;

    match config.store.seed_path {
        Some(ref path) => {
            let cells = store
                .load_fixture(path)
                .await
                .with_context(|| format!("failed to seed store from {}", path.display()))?;
            let rows = store.row_count(&config.store.table).await.unwrap_or(0);
            info!(cells, rows, table = %config.store.table, "store seeded");
        }
        None => warn!(table = %config.store.table, "no seed file configured, serving an empty table"),
    }

    if let (Some(project), Some(instance)) = (&config.store.project_id, &config.store.instance_id) {
        info!(project = %project, instance = %instance, "store target");
    }

    Ok(store)
}

/// Build the read API for a validated configuration.
pub async fn build_api(config: &ServerConfig) -> Result<ReadApi> {
    let store = build_store(config).await?;
    let orchestrator = Arc::new(ReadOrchestrator::new(
        Arc::new(store),
        config.store.table.clone(),
    ));

    let api_config = ReadApiConfig {
        listen_addr: config.listen_addr()?,
        enable_cors: config.server.enable_cors,
    };
    Ok(ReadApi::new(api_config, orchestrator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_build_store_from_seed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"table": "climate_data", "key": "w/A1/2023-10-10 00:00:00", "column": "temp",
                  "timestamp": "2023-10-10T00:00:00Z", "value": "12.5"}},
                {{"table": "climate_data", "key": "w/A1/2023-10-10 01:00:00", "column": "temp",
                  "timestamp": "2023-10-10T01:00:00Z", "value": "12.9"}}
            ]"#
        )
        .unwrap();

        let mut config = ServerConfig::default();
        config.store.seed_path = Some(file.path().to_path_buf());

        let store = build_store(&config).await.unwrap();
        assert_eq!(store.row_count("climate_data").await, Some(2));
    }

    #[tokio::test]
    async fn test_build_store_without_seed_has_empty_table() {
        let store = build_store(&ServerConfig::default()).await.unwrap();
        assert_eq!(store.row_count("climate_data").await, Some(0));
    }

    #[tokio::test]
    async fn test_missing_seed_file_fails() {
        let mut config = ServerConfig::default();
        config.store.seed_path = Some("/nonexistent/stratus-seed.json".into());
        assert!(build_store(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_build_api() {
        let mut config = ServerConfig::default();
        config.server.port = 7100;
        assert!(build_api(&config).await.is_ok());
    }
}
