use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, models::credential::HashedPassword};

pub type UserId = i32;

/// Gender stored when a registration omits it
pub const DEFAULT_GENDER: Gender = Gender::Other;
/// Region stored when a registration omits it
pub const DEFAULT_REGION: Region = Region::Unspecified;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "O",
        }
    }
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            "O" => Ok(Gender::Other),
            other => Err(DomainError::UnknownCode(other.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Home region of the speaker.
///
/// `Unspecified` is a storage-only code: it is what gets persisted when a
/// registration carries no region, and it is never accepted as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    /// Bắc
    #[serde(rename = "N")]
    North,
    /// Trung
    #[serde(rename = "M")]
    Central,
    /// Nam
    #[serde(rename = "S")]
    South,
    #[serde(rename = "O")]
    Unspecified,
}

impl Region {
    pub fn code(&self) -> &'static str {
        match self {
            Region::North => "N",
            Region::Central => "M",
            Region::South => "S",
            Region::Unspecified => "O",
        }
    }

    /// Whether a client may submit this region
    pub fn is_selectable(&self) -> bool {
        !matches!(self, Region::Unspecified)
    }
}

impl FromStr for Region {
    type Err = DomainError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "N" => Ok(Region::North),
            "M" => Ok(Region::Central),
            "S" => Ok(Region::South),
            "O" => Ok(Region::Unspecified),
            other => Err(DomainError::UnknownCode(other.to_string())),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub phone: String,
    pub name: Option<String>,
    pub is_admin: bool,
    pub age: Option<i32>,
    pub gender: Gender,
    pub region: Region,
    pub user_image_origin: Option<String>,
    pub user_image_record: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin view of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetail {
    pub user: User,
    pub audio_training_file_count: u64,
}

/// Fields for a user that is about to be inserted.
/// Defaults are already applied; `is_admin` is always false for new users.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub phone: String,
    pub password_hash: HashedPassword,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Gender,
    pub region: Region,
}
