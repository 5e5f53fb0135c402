pub mod argon2_password_hasher;
pub mod local_image_storage;
pub mod regex_phone_validator;
pub mod user_repository;
