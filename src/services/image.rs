use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::config::AssetsConfig;
use crate::validation::movie::is_allowed_image_name;

/// Lookup of poster images in the configured asset directory.
pub struct ImageService {
    images_dir: PathBuf,
}

impl ImageService {
    #[must_use]
    pub fn new(config: &AssetsConfig) -> Self {
        Self {
            images_dir: PathBuf::from(&config.images_path),
        }
    }

    #[must_use]
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Whether `file_name` names a regular file in the asset directory.
    /// Names outside the allowed pattern are never looked up.
    pub async fn exists(&self, file_name: &str) -> bool {
        if !is_allowed_image_name(file_name) {
            return false;
        }

        let path = self.images_dir.join(file_name);
        let present = fs::metadata(&path).await.is_ok_and(|m| m.is_file());
        debug!(path = %path.display(), present, "Checked image asset");
        present
    }
}
