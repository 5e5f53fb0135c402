pub mod candidate;
pub mod credential;
pub mod image;
pub mod user;
