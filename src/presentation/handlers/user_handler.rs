use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    domain::{
        models::{
            candidate::RegistrationCandidate,
            user::{Gender, Region, User, UserId},
        },
        repositories::user_repository::UserRepository,
        services::{password_service::PasswordHasher, phone_validator::PhoneValidator},
    },
    presentation::{error::ApiError, response::ApiResponse},
    usecase::bulk_register_usecase::{BatchOutcome, BatchResult, BulkRegisterUsecase},
};

// Request

/// json for bulk register request
/// Entries stay untyped here so one badly typed entry fails on its own
#[derive(Serialize, Deserialize)]
pub struct BulkRegisterRequest {
    pub users: Vec<Value>,
}

// Response

/// json for a persisted user
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: UserId,
    pub phone: String,
    pub name: Option<String>,
    pub is_admin: bool,
    pub age: Option<i32>,
    pub gender: Gender,
    pub region: Region,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            phone: user.phone,
            name: user.name,
            is_admin: user.is_admin,
            age: user.age,
            gender: user.gender,
            region: user.region,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessEntry {
    pub index: usize,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FailureEntry {
    pub index: usize,
    pub phone: String,
    pub reason: String,
}

/// json for the per-item summary of a bulk registration
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResultResponse {
    pub total: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub successes: Vec<SuccessEntry>,
    pub failures: Vec<FailureEntry>,
}

impl From<BatchResult> for BatchResultResponse {
    fn from(result: BatchResult) -> Self {
        Self {
            total: result.total(),
            success_count: result.success_count(),
            failed_count: result.failed_count(),
            successes: result
                .successes
                .into_iter()
                .map(|s| SuccessEntry {
                    index: s.index,
                    user: s.user.into(),
                })
                .collect(),
            failures: result
                .failures
                .into_iter()
                .map(|f| FailureEntry {
                    index: f.index,
                    phone: f.phone,
                    reason: f.reason.to_string(),
                })
                .collect(),
        }
    }
}

/* Router Function and Handler Function */

// User Router

/// function return Router object
/// Suppose to be nested by main router under /api/users
pub fn create_user_router<
    R: UserRepository + Send + Sync + 'static,
    P: PasswordHasher + Send + Sync + 'static,
    V: PhoneValidator + Send + Sync + 'static,
>(
    bulk_register_service: BulkRegisterUsecase<R, P, V>,
) -> Router {
    let state = UserState {
        bulk_register_service: Arc::new(bulk_register_service),
    };

    Router::new()
        .route("/bulk-register", post(bulk_register::<R, P, V>))
        .with_state(state)
}

pub struct UserState<R: UserRepository, P: PasswordHasher, V: PhoneValidator> {
    pub bulk_register_service: Arc<BulkRegisterUsecase<R, P, V>>,
}

impl<R: UserRepository, P: PasswordHasher, V: PhoneValidator> Clone for UserState<R, P, V> {
    fn clone(&self) -> Self {
        Self {
            bulk_register_service: Arc::clone(&self.bulk_register_service),
        }
    }
}

// handler function

/// handler function for bulk register
///
/// 201 when every candidate was registered, 400 when none was,
/// 207 Multi-Status otherwise. The per-item summary is returned in all three cases.
async fn bulk_register<
    R: UserRepository + Send + Sync,
    P: PasswordHasher + Send + Sync,
    V: PhoneValidator + Send + Sync,
>(
    State(state): State<UserState<R, P, V>>,
    payload: Result<Json<BulkRegisterRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        debug!(error = %e, "Rejected bulk registration body");
        ApiError::BadRequest("invalid user list".to_string())
    })?;

    let candidates = payload
        .users
        .into_iter()
        .map(RegistrationCandidate::from)
        .collect();

    let result = state.bulk_register_service.register(candidates).await?;

    let outcome = result.outcome();
    let body = BatchResultResponse::from(result);

    let response = match outcome {
        BatchOutcome::AllSucceeded => {
            let message = format!("registered {} users", body.success_count);
            (StatusCode::CREATED, Json(ApiResponse::ok(body, message))).into_response()
        }
        BatchOutcome::AllFailed => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failed_with(body, "no users were registered")),
        )
            .into_response(),
        BatchOutcome::PartialSuccess => {
            let message = format!(
                "registered {}/{} users, {} failed",
                body.success_count, body.total, body.failed_count
            );
            (StatusCode::MULTI_STATUS, Json(ApiResponse::ok(body, message))).into_response()
        }
    };

    Ok(response)
}
