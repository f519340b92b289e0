//! User repository: the account-creation primitive and username lookup.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::AppResult;
use domain::{normalize_email, Password, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create and persist a new active user.
    ///
    /// The email domain is normalized and the password hashed before insert.
    /// Fails if the username is already taken (unique index).
    async fn create_user(&self, username: String, email: String, password: String)
        -> AppResult<User>;

    /// Persist all mutable fields of an existing user
    async fn save(&self, user: &User) -> AppResult<User>;

    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
}

/// SeaORM-backed implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create_user(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> AppResult<User> {
        let password_hash = Password::new(&password)?.into_string();
        let user = User::new(Uuid::new_v4(), username, normalize_email(&email), password_hash);

        let active_model = ActiveModel {
            id: Set(user.id),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            is_active: Set(user.is_active),
            is_staff: Set(user.is_staff),
            date_joined: Set(user.date_joined),
            updated_at: Set(user.updated_at),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(User::from(model))
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        let active = ActiveModel {
            id: Unchanged(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            is_active: Set(user.is_active),
            is_staff: Set(user.is_staff),
            date_joined: Unchanged(user.date_joined),
            updated_at: Set(Utc::now()),
        };

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }
}
