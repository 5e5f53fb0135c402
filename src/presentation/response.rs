use serde::{Deserialize, Serialize};

/// Envelope shared by every JSON endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            error: None,
        }
    }

    /// A failure that still carries diagnostic data
    pub fn failed_with(data: T, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Some(data),
            message: None,
            error: Some(error.into()),
        }
    }
}

impl ApiResponse<()> {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }
}
