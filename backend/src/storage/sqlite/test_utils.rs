//! Fixtures shared by the storage and domain unit tests.

use chrono::Utc;
use uuid::Uuid;

use super::connection::DbConnection;
use super::directory_repository::SqliteDirectoryRepository;
use crate::domain::models::{Household, User};
use crate::storage::traits::DirectoryStorage;

pub struct SeededHousehold {
    pub household_id: String,
    /// In the order the names were given
    pub user_ids: Vec<String>,
}

/// Store a household plus one user per name (email `<name>@example.com`)
pub async fn seed_household(db: &DbConnection, names: &[&str]) -> SeededHousehold {
    let repo = SqliteDirectoryRepository::new(db.clone());
    let household = Household {
        id: Uuid::new_v4().to_string(),
        name: format!("{} household", names.first().copied().unwrap_or("Empty")),
        created_at: Utc::now(),
    };
    repo.insert_household(&household).await.expect("Failed to seed household");

    let mut user_ids = Vec::new();
    for name in names {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            created_at: Utc::now(),
        };
        repo.insert_user(&user).await.expect("Failed to seed user");
        user_ids.push(user.id);
    }

    SeededHousehold {
        household_id: household.id,
        user_ids,
    }
}
