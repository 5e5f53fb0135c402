use serde::{Deserialize, Serialize};

/// Value object representing a hashed password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Create a new HashedPassword from an already hashed string
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
