use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    domain::{
        models::{
            image::{ImageKind, UploadedFile},
            user::{User, UserDetail, UserId},
        },
        repositories::user_repository::UserRepository,
        services::image_storage::ImageStorage,
    },
    presentation::{error::ApiError, handlers::user_handler::UserInfo, response::ApiResponse},
    usecase::{
        get_user_usecase::GetUserUsecase,
        upload_user_image_usecase::{ImageUploadRequest, ImageUploadResult, UploadUserImageUsecase},
    },
};

/// Room left in the request body for multipart boundaries and the text fields
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

// Response

/// json for the admin view of one user
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub user: UserInfo,
    pub user_image_origin: Option<String>,
    pub user_image_record: Option<String>,
    pub audio_training_file_count: u64,
}

impl From<UserDetail> for UserDetailResponse {
    fn from(detail: UserDetail) -> Self {
        let user_image_origin = detail.user.user_image_origin.clone();
        let user_image_record = detail.user.user_image_record.clone();
        Self {
            user: detail.user.into(),
            user_image_origin,
            user_image_record,
            audio_training_file_count: detail.audio_training_file_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserImagesInfo {
    pub id: UserId,
    pub phone: String,
    pub name: Option<String>,
    pub user_image_origin: Option<String>,
    pub user_image_record: Option<String>,
}

impl From<User> for UserImagesInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            phone: user.phone,
            name: user.name,
            user_image_origin: user.user_image_origin,
            user_image_record: user.user_image_record,
        }
    }
}

/// json for image upload response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub user: UserImagesInfo,
    pub image_path: String,
    pub image_type: ImageKind,
}

impl From<ImageUploadResult> for ImageUploadResponse {
    fn from(result: ImageUploadResult) -> Self {
        Self {
            user: result.user.into(),
            image_path: result.image_path,
            image_type: result.image_kind,
        }
    }
}

// Admin Router

/// function return Router object
/// Suppose to be nested by main router under /api/admin
pub fn create_admin_router<
    R: UserRepository + Send + Sync + 'static,
    S: ImageStorage + Send + Sync + 'static,
>(
    get_user_service: GetUserUsecase<R>,
    upload_image_service: UploadUserImageUsecase<R, S>,
    max_image_bytes: usize,
) -> Router {
    let state = AdminState {
        get_user_service: Arc::new(get_user_service),
        upload_image_service: Arc::new(upload_image_service),
    };

    Router::new()
        .route("/users/{id}", get(get_user::<R, S>))
        .route(
            "/upload-user-image",
            post(upload_user_image::<R, S>).layer(DefaultBodyLimit::max(
                max_image_bytes + MULTIPART_OVERHEAD_BYTES,
            )),
        )
        .with_state(state)
}

pub struct AdminState<R: UserRepository, S: ImageStorage> {
    pub get_user_service: Arc<GetUserUsecase<R>>,
    pub upload_image_service: Arc<UploadUserImageUsecase<R, S>>,
}

impl<R: UserRepository, S: ImageStorage> Clone for AdminState<R, S> {
    fn clone(&self) -> Self {
        Self {
            get_user_service: Arc::clone(&self.get_user_service),
            upload_image_service: Arc::clone(&self.upload_image_service),
        }
    }
}

// handler function

/// handler function for fetching one user
async fn get_user<R: UserRepository + Send + Sync, S: ImageStorage + Send + Sync>(
    State(state): State<AdminState<R, S>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDetailResponse>>, ApiError> {
    let id: UserId = id
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid user id".to_string()))?;

    let detail = state.get_user_service.get_user(id).await?;

    Ok(Json(ApiResponse::ok(detail.into(), "user fetched")))
}

/// handler function for uploading a user's image
/// form fields: file, imageType, userId
async fn upload_user_image<R: UserRepository + Send + Sync, S: ImageStorage + Send + Sync>(
    State(state): State<AdminState<R, S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ImageUploadResponse>>), ApiError> {
    let mut multipart = multipart.map_err(|e| {
        debug!(error = %e, "Rejected image upload body");
        ApiError::BadRequest("invalid multipart body".to_string())
    })?;

    let mut request = ImageUploadRequest::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                request.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "imageType" => {
                request.image_type = Some(field.text().await.map_err(multipart_error)?);
            }
            "userId" => {
                request.user_id = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let result = state.upload_image_service.upload(request).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(result.into(), "image uploaded")),
    ))
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("upload too large".to_string())
    } else {
        debug!(error = %e, "Failed to read multipart field");
        ApiError::BadRequest("invalid multipart body".to_string())
    }
}
