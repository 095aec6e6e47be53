use crate::model::id::UserId;
use chrono::{DateTime, Utc};
use derive_new::new;
use shared::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub access_level: AccessLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Standard,
    Admin,
}

impl AccessLevel {
    pub fn as_i32(&self) -> i32 {
        match self {
            AccessLevel::Standard => 1,
            AccessLevel::Admin => 2,
        }
    }
}

impl TryFrom<i32> for AccessLevel {
    type Error = AppError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AccessLevel::Standard),
            2 => Ok(AccessLevel::Admin),
            v => Err(AppError::ConversionEntityError(format!(
                "unknown access level: {v}"
            ))),
        }
    }
}

/// Result of a successful credential check.
#[derive(Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub password_hash: String,
}

#[derive(Debug, Clone, new)]
pub struct UpdateUser {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub access_level: AccessLevel,
}
