use async_trait::async_trait;

use crate::domain::{error::DomainError, models::user::UserId};

/// Where uploaded user images end up
#[async_trait]
pub trait ImageStorage: Clone + Send + Sync {
    /// Store `bytes` as `file_name` in the user's directory, replacing any
    /// previous file with that name. Returns the path relative to the
    /// storage root, always with `/` separators.
    async fn store(
        &self,
        user_id: UserId,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, DomainError>;
}
