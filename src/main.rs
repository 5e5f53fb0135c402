mod config;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;
mod usecase;

use axum::{Router, routing::get};
use sea_orm::{ConnectOptions, Database};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::AppConfig,
    domain::models::image::ImagePolicy,
    infrastructure::{
        argon2_password_hasher::Argon2PasswordHasher, local_image_storage::LocalImageStorage,
        regex_phone_validator::RegexPhoneValidator, user_repository::SeaOrmUserRepository,
    },
    presentation::handlers::{admin_handler::create_admin_router, user_handler::create_user_router},
    usecase::{
        bulk_register_usecase::BulkRegisterUsecase, get_user_usecase::GetUserUsecase,
        upload_user_image_usecase::UploadUserImageUsecase,
    },
};

/// Mount the feature routers under /api next to the health check
fn build_router(user_router: Router, admin_router: Router) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest(
            "/api",
            Router::new()
                .nest("/users", user_router)
                .nest("/admin", admin_router),
        )
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    config.ensure_upload_dir()?;
    info!(upload_dir = %config.upload_dir.display(), "Upload directory ready");

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(10)
        .min_connections(1)
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    info!("Connected to database");

    let user_repository = SeaOrmUserRepository::new(db.clone());
    let password_hasher = Argon2PasswordHasher::new();
    let phone_validator = RegexPhoneValidator::new();
    let image_storage = LocalImageStorage::new(config.upload_dir.clone());

    let bulk_register_usecase = BulkRegisterUsecase::new(
        user_repository.clone(),
        password_hasher.clone(),
        phone_validator.clone(),
    );
    let get_user_usecase = GetUserUsecase::new(user_repository.clone());
    let upload_user_image_usecase = UploadUserImageUsecase::new(
        user_repository.clone(),
        image_storage,
        ImagePolicy::new(config.max_image_bytes),
    );

    let app = build_router(
        create_user_router(bulk_register_usecase),
        create_admin_router(
            get_user_usecase,
            upload_user_image_usecase,
            config.max_image_bytes,
        ),
    );

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Listening");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
