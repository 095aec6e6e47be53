use crate::model::{
    id::UserId,
    user::{AuthenticatedUser, UpdateUser, User},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<User>;
    async fn update(&self, event: UpdateUser) -> AppResult<()>;
    // unknown email and wrong password both fail with InvalidCredentials
    // so callers cannot probe for account existence
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser>;
}
