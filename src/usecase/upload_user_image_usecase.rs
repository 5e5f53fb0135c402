use tracing::info;

use crate::domain::{
    error::{DomainError, RepositoryError},
    models::{
        image::{ImageKind, ImagePolicy, ImageRejection, UploadedFile, stored_file_name},
        user::{User, UserId},
    },
    repositories::user_repository::UserRepository,
    services::image_storage::ImageStorage,
};

/// Raw form fields of an admin image upload
#[derive(Debug, Default)]
pub struct ImageUploadRequest {
    pub file: Option<UploadedFile>,
    pub image_type: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug)]
pub struct ImageUploadResult {
    pub user: User,
    pub image_path: String,
    pub image_kind: ImageKind,
}

pub struct UploadUserImageUsecase<R: UserRepository, S: ImageStorage> {
    user_repository: R,
    image_storage: S,
    policy: ImagePolicy,
}

impl<R: UserRepository, S: ImageStorage> UploadUserImageUsecase<R, S> {
    pub fn new(user_repository: R, image_storage: S, policy: ImagePolicy) -> Self {
        Self {
            user_repository,
            image_storage,
            policy,
        }
    }

    pub async fn upload(&self, request: ImageUploadRequest) -> Result<ImageUploadResult, DomainError>
    where
        R: Send + Sync,
        S: Send + Sync,
    {
        let file = request.file.ok_or(ImageRejection::MissingFile)?;
        let image_kind: ImageKind = request
            .image_type
            .as_deref()
            .ok_or(ImageRejection::InvalidImageType)?
            .parse()?;
        let user_id = parse_user_id(request.user_id.as_deref())?;
        self.policy.validate(&file)?;

        if self.user_repository.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::UserNotFound);
        }

        let file_name = stored_file_name(image_kind, file.file_name.as_deref());
        let image_path = self
            .image_storage
            .store(user_id, &file_name, &file.bytes)
            .await?;

        let user = self
            .user_repository
            .set_image_path(user_id, image_kind, &image_path)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => DomainError::UserNotFound,
                e => DomainError::Repository(e),
            })?;

        info!(user_id, image_path = %image_path, image_type = image_kind.as_str(), "Stored user image");
        Ok(ImageUploadResult {
            user,
            image_path,
            image_kind,
        })
    }
}

fn parse_user_id(raw: Option<&str>) -> Result<UserId, ImageRejection> {
    match raw.map(str::trim) {
        None | Some("") => Err(ImageRejection::MissingUserId),
        Some(value) => value.parse().map_err(|_| ImageRejection::InvalidUserId),
    }
}
