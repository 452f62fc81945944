//! CLI command implementations

mod bookmarks;
mod catalog;
mod export;
mod import;
mod read;

pub use bookmarks::bookmarks;
pub use catalog::{chapters, texts};
pub use export::{export, export_all};
pub use import::{download, import};
pub use read::read;

use anyhow::{Context, Result};
use lectern_core::catalog::{catalogs_from_config, Catalog, CatalogWriter};
use lectern_core::storage::{LocalStorage, StorageProvider};
use lectern_core::Config;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration and backends shared by every command
pub struct AppContext {
    pub config: Config,
    pub catalog: Arc<dyn Catalog>,
    pub writer: Arc<dyn CatalogWriter>,
    pub storage: Arc<dyn StorageProvider>,
}

impl AppContext {
    /// Read the environment, applying a data directory override
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::from_env().context("Failed to read configuration")?;
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        tracing::debug!("Using data directory {}", config.data_dir.display());

        let catalogs = catalogs_from_config(&config).context("Failed to set up the catalog")?;
        let storage = Arc::new(LocalStorage::new(&config.data_dir));

        Ok(Self {
            config,
            catalog: catalogs.reader,
            writer: catalogs.writer,
            storage,
        })
    }
}
