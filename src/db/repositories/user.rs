use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::users;

/// User data returned from repository (without the password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: Option<String>,
    pub role: String,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            role: model.role,
            created_at: model.created_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let users = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(users.into_iter().map(User::from).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Persist a resolved username for one user.
    pub async fn set_username(&self, id: i32, username: &str) -> Result<()> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for username update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.username = Set(Some(username.to_string()));
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Users still awaiting a username, in id order.
    pub async fn missing_username(&self) -> Result<Vec<User>> {
        let users = users::Entity::find()
            .filter(users::Column::Username.is_null())
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query users missing a username")?;

        Ok(users.into_iter().map(User::from).collect())
    }

    pub async fn missing_username_count(&self) -> Result<u64> {
        let count = users::Entity::find()
            .filter(users::Column::Username.is_null())
            .count(&self.conn)
            .await
            .context("Failed to count users missing a username")?;

        Ok(count)
    }

    /// Every username currently assigned.
    pub async fn taken_usernames(&self) -> Result<Vec<String>> {
        let names = users::Entity::find()
            .select_only()
            .column(users::Column::Username)
            .filter(users::Column::Username.is_not_null())
            .into_tuple::<Option<String>>()
            .all(&self.conn)
            .await
            .context("Failed to query taken usernames")?;

        Ok(names.into_iter().flatten().collect())
    }

    /// Usernames held by more than one row. Empty after a clean backfill.
    pub async fn duplicate_usernames(&self) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = users::Entity::find()
            .select_only()
            .column(users::Column::Username)
            .column_as(users::Column::Id.count(), "holders")
            .filter(users::Column::Username.is_not_null())
            .group_by(users::Column::Username)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to scan for duplicate usernames")?;

        Ok(rows
            .into_iter()
            .filter(|(_, holders)| *holders > 1)
            .collect())
    }
}
