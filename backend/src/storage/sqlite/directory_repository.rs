use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;

use super::connection::DbConnection;
use crate::domain::models::{format_timestamp, parse_timestamp, Household, User};
use crate::storage::traits::DirectoryStorage;

/// Repository for households and users
#[derive(Clone)]
pub struct SqliteDirectoryRepository {
    db: DbConnection,
}

impl SqliteDirectoryRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DirectoryStorage for SqliteDirectoryRepository {
    async fn insert_household(&self, household: &Household) -> Result<()> {
        sqlx::query("INSERT INTO households (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&household.id)
            .bind(&household.name)
            .bind(format_timestamp(&household.created_at))
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn get_household(&self, household_id: &str) -> Result<Option<Household>> {
        let row = sqlx::query("SELECT id, name, created_at FROM households WHERE id = ?")
            .bind(household_id)
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some(r) => Ok(Some(Household {
                id: r.try_get("id")?,
                name: r.try_get("name")?,
                created_at: parse_timestamp(&r.try_get::<String, _>("created_at")?)?,
            })),
            None => Ok(None),
        }
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query("INSERT INTO users (id, name, email, created_at) VALUES (?, ?, ?, ?)")
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(format_timestamp(&user.created_at))
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, email, created_at FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some(r) => Ok(Some(User {
                id: r.try_get("id")?,
                name: r.try_get("name")?,
                email: r.try_get("email")?,
                created_at: parse_timestamp(&r.try_get::<String, _>("created_at")?)?,
            })),
            None => Ok(None),
        }
    }
}
