pub mod image_storage;
pub mod password_service;
pub mod phone_validator;
