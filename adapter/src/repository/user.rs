use crate::database::{model::user::UserRow, with_statement_timeout, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::UserId,
    user::{AuthenticatedUser, UpdateUser, User},
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};
use uuid::Uuid;

#[derive(new)]
pub struct PgUserRepository {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<User> {
        with_statement_timeout("users.find_by_id", async {
            let row: Option<UserRow> = sqlx::query_as(
                r#"
                    SELECT user_id, first_name, last_name, email, password, access_level, created_at, updated_at
                    FROM users
                    WHERE user_id = $1
                "#,
            )
            .bind(user_id.raw())
            .fetch_optional(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

            let row = row
                .ok_or_else(|| AppError::EntityNotFound(format!("user {user_id} was not found")))?;
            User::try_from(row)
        })
        .await
    }

    async fn update(&self, event: UpdateUser) -> AppResult<()> {
        with_statement_timeout("users.update", async {
            let res = sqlx::query(
                r#"
                    UPDATE users
                    SET
                        first_name = $1,
                        last_name = $2,
                        email = $3,
                        access_level = $4,
                        updated_at = CURRENT_TIMESTAMP
                    WHERE user_id = $5
                "#,
            )
            .bind(&event.first_name)
            .bind(&event.last_name)
            .bind(&event.email)
            .bind(event.access_level.as_i32())
            .bind(event.user_id.raw())
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

            if res.rows_affected() < 1 {
                return Err(AppError::EntityNotFound("specified user not found".into()));
            }
            Ok(())
        })
        .await
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let row: Option<(Uuid, String)> = with_statement_timeout("users.authenticate", async {
            sqlx::query_as("SELECT user_id, password FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)
        })
        .await?;

        // an unknown address reads the same as a wrong password
        let Some((user_id, password_hash)) = row else {
            return Err(AppError::InvalidCredentials);
        };

        let matches =
            bcrypt::verify(password, &password_hash).map_err(|_| AppError::InvalidCredentials)?;
        if !matches {
            return Err(AppError::InvalidCredentials);
        }

        Ok(AuthenticatedUser {
            user_id: user_id.into(),
            password_hash,
        })
    }
}
