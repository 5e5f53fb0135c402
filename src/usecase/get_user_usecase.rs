use crate::domain::{
    error::DomainError,
    models::user::{UserDetail, UserId},
    repositories::user_repository::UserRepository,
};

pub struct GetUserUsecase<R: UserRepository> {
    user_repository: R,
}

impl<R: UserRepository> GetUserUsecase<R> {
    pub fn new(user_repository: R) -> Self {
        Self { user_repository }
    }

    pub async fn get_user(&self, id: UserId) -> Result<UserDetail, DomainError>
    where
        R: Send + Sync,
    {
        self.user_repository
            .find_detail_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound)
    }
}
