use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

const DB_FILE_NAME: &str = "hydration.db";

pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    /// Resolve the database location: an explicit path wins, otherwise the
    /// platform data directory is used. The parent directory is created if needed.
    pub fn load(db_override: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_override {
            Some(path) => path,
            None => {
                let proj_dirs = ProjectDirs::from("", "", "hydrate")
                    .context("Could not determine home directory")?;
                proj_dirs.data_dir().join(DB_FILE_NAME)
            }
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        tracing::debug!(path = %db_path.display(), "resolved database path");
        Ok(Config { db_path })
    }
}
