use std::{path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::user::UserId;

pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Which of the two profile images a file is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageKind {
    /// Reference photo of the speaker
    #[serde(rename = "user_image_origin")]
    Origin,
    /// Photo taken at recording time
    #[serde(rename = "user_image_record")]
    Record,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Origin => "user_image_origin",
            ImageKind::Record => "user_image_record",
        }
    }
}

impl FromStr for ImageKind {
    type Err = ImageRejection;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user_image_origin" => Ok(ImageKind::Origin),
            "user_image_record" => Ok(ImageKind::Record),
            _ => Err(ImageRejection::InvalidImageType),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageRejection {
    #[error("image file is required")]
    MissingFile,

    #[error("invalid image type")]
    InvalidImageType,

    #[error("user id is required")]
    MissingUserId,

    #[error("invalid user id")]
    InvalidUserId,

    #[error("unsupported image type")]
    UnsupportedContentType,

    #[error("image file is empty")]
    EmptyFile,

    #[error("image exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

/// A file part taken from a multipart form
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Limits applied to uploaded images
#[derive(Debug, Clone, Copy)]
pub struct ImagePolicy {
    pub max_bytes: usize,
}

impl ImagePolicy {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn validate(&self, file: &UploadedFile) -> Result<(), ImageRejection> {
        let content_type = file.content_type.as_deref().unwrap_or_default();
        if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
            return Err(ImageRejection::UnsupportedContentType);
        }
        if file.bytes.is_empty() {
            return Err(ImageRejection::EmptyFile);
        }
        if file.bytes.len() > self.max_bytes {
            return Err(ImageRejection::TooLarge {
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Name the image is stored under: the kind plus the original extension.
///
/// The extension is reduced to ASCII alphanumerics so a crafted filename
/// cannot escape the user's directory.
pub fn stored_file_name(kind: ImageKind, original_name: Option<&str>) -> String {
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ext.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|ext| !ext.is_empty());

    match extension {
        Some(ext) => format!("{}.{}", kind.as_str(), ext),
        None => kind.as_str().to_string(),
    }
}

/// Path recorded on the user, relative to the upload root
pub fn relative_image_path(user_id: UserId, file_name: &str) -> String {
    format!("{user_id}/{file_name}")
}
