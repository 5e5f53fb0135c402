pub mod admin_handler;
pub mod user_handler;
