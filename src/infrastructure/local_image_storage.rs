use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::warn;

use crate::domain::{
    error::DomainError,
    models::{image::relative_image_path, user::UserId},
    services::image_storage::ImageStorage,
};

/// Stores images under `<root>/<user_id>/<file_name>`
#[derive(Clone)]
pub struct LocalImageStorage {
    root: PathBuf,
}

impl LocalImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn store(
        &self,
        user_id: UserId,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, DomainError> {
        let user_dir = self.root.join(user_id.to_string());
        fs::create_dir_all(&user_dir)
            .await
            .map_err(|e| DomainError::Storage(format!("{}: {}", user_dir.display(), e)))?;

        let file_path = user_dir.join(file_name);
        if fs::try_exists(&file_path).await.unwrap_or(false) {
            if let Err(e) = fs::remove_file(&file_path).await {
                warn!(path = %file_path.display(), error = %e, "Could not delete old image");
            }
        }

        fs::write(&file_path, bytes)
            .await
            .map_err(|e| DomainError::Storage(format!("{}: {}", file_path.display(), e)))?;

        Ok(relative_image_path(user_id, file_name))
    }
}
