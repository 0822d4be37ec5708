//! Runtime configuration utilities for docsense.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

/// Label the classifier assigns to tokens outside any entity.
pub const DEFAULT_OUTSIDE_LABEL: &str = "O";

const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root folder for the database and other local state.
    pub data_dir: PathBuf,
    /// SQLite file holding uploaded documents.
    pub database_path: PathBuf,
    /// Folder containing `tfidf_vec.json` and `clf.json`.
    pub model_dir: PathBuf,
    /// Entity label dropped from named-entity responses.
    pub outside_label: String,
    /// Request body cap for uploads, in bytes.
    pub max_upload_bytes: usize,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let database_path = env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("files.db"));
        let model_dir = env::var("MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./models"));
        let outside_label =
            env::var("OUTSIDE_LABEL").unwrap_or_else(|_| DEFAULT_OUTSIDE_LABEL.to_string());
        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        std::fs::create_dir_all(&data_dir).context("creating data dir")?;

        Ok(Self {
            data_dir,
            database_path,
            model_dir,
            outside_label,
            max_upload_bytes,
        })
    }

    /// Settings rooted in an arbitrary directory, used by tests and tooling.
    pub fn rooted_at<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            data_dir: root.to_path_buf(),
            database_path: root.join("files.db"),
            model_dir: root.join("models"),
            outside_label: DEFAULT_OUTSIDE_LABEL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
