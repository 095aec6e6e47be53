use kernel::model::user::{AccessLevel, User};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub access_level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            user_id,
            first_name,
            last_name,
            email,
            password,
            access_level,
            created_at,
            updated_at,
        } = value;
        Ok(User {
            user_id: user_id.into(),
            first_name,
            last_name,
            email,
            password_hash: password,
            access_level: AccessLevel::try_from(access_level)?,
            created_at,
            updated_at,
        })
    }
}
