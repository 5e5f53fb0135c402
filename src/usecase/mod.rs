pub mod bulk_register_usecase;
pub mod get_user_usecase;
pub mod upload_user_image_usecase;
