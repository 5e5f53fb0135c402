use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::{
        image::ImageKind,
        user::{NewUser, User, UserDetail, UserId},
    },
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, RepositoryError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    async fn find_detail_by_id(&self, id: UserId) -> Result<Option<UserDetail>, RepositoryError>;
    /// Insert a user. A duplicate phone yields `RepositoryError::Conflict`.
    async fn insert(&self, new_user: NewUser) -> Result<User, RepositoryError>;
    async fn set_image_path(
        &self,
        id: UserId,
        kind: ImageKind,
        path: &str,
    ) -> Result<User, RepositoryError>;
}
