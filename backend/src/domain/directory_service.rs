use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use shared::{CreateHouseholdRequest, CreateUserRequest};

use super::commands::{CreateHouseholdCommand, CreateUserCommand};
use super::error::{LedgerError, LedgerResult};
use super::models::{Household, User};
use crate::storage::DirectoryStorage;

/// Service for the households and users that expenses refer to
#[derive(Clone)]
pub struct DirectoryService {
    storage: Arc<dyn DirectoryStorage>,
}

impl DirectoryService {
    pub fn new(storage: Arc<dyn DirectoryStorage>) -> Self {
        Self { storage }
    }

    pub async fn create_household(&self, request: CreateHouseholdRequest) -> LedgerResult<Household> {
        let command = CreateHouseholdCommand::try_from(request)?;
        info!("Creating household: {}", command.name);

        let household = Household {
            id: Uuid::new_v4().to_string(),
            name: command.name,
            created_at: Utc::now(),
        };

        self.storage.insert_household(&household).await.map_err(|e| {
            error!("Failed to create household: {:#}", e);
            LedgerError::persistence("Failed to create household")
        })?;

        info!("Created household {} with ID: {}", household.name, household.id);
        Ok(household)
    }

    pub async fn get_household(&self, household_id: &str) -> LedgerResult<Household> {
        info!("Getting household: {}", household_id);

        let household = self.storage.get_household(household_id).await.map_err(|e| {
            error!("Failed to get household {}: {:#}", household_id, e);
            LedgerError::persistence("Failed to fetch household")
        })?;

        household.ok_or_else(|| {
            warn!("Household not found: {}", household_id);
            LedgerError::not_found("Household not found")
        })
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> LedgerResult<User> {
        let command = CreateUserCommand::try_from(request)?;
        info!("Creating user: {} <{}>", command.name, command.email);

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: command.name,
            email: command.email,
            created_at: Utc::now(),
        };

        self.storage.insert_user(&user).await.map_err(|e| {
            if is_unique_violation(&e) {
                warn!("Email already registered: {}", user.email);
                return LedgerError::validation(format!("email {} is already registered", user.email));
            }
            error!("Failed to create user: {:#}", e);
            LedgerError::persistence("Failed to create user")
        })?;

        info!("Created user {} with ID: {}", user.name, user.id);
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &str) -> LedgerResult<User> {
        info!("Getting user: {}", user_id);

        let user = self.storage.get_user(user_id).await.map_err(|e| {
            error!("Failed to get user {}: {:#}", user_id, e);
            LedgerError::persistence("Failed to fetch user")
        })?;

        user.ok_or_else(|| {
            warn!("User not found: {}", user_id);
            LedgerError::not_found("User not found")
        })
    }
}

fn is_unique_violation(error: &anyhow::Error) -> bool {
    match error.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_error)) => db_error.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DbConnection, SqliteDirectoryRepository};

    async fn create_test_service() -> DirectoryService {
        let db = DbConnection::in_memory().await.expect("Failed to init test DB");
        DirectoryService::new(Arc::new(SqliteDirectoryRepository::new(db)))
    }

    fn alice() -> CreateUserRequest {
        CreateUserRequest {
            name: Some("Alice".to_string()),
            email: Some("alice@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_household() {
        let service = create_test_service().await;

        let created = service
            .create_household(CreateHouseholdRequest {
                name: Some(" Flat 4B ".to_string()),
            })
            .await
            .expect("Failed to create household");

        assert_eq!(created.name, "Flat 4B");
        assert_eq!(service.get_household(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let service = create_test_service().await;

        let created = service.create_user(alice()).await.expect("Failed to create user");

        assert_eq!(created.email, "alice@example.com");
        assert_eq!(service.get_user(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_validation_error() {
        let service = create_test_service().await;
        service.create_user(alice()).await.unwrap();

        match service.create_user(alice()).await {
            Err(LedgerError::Validation(message)) => assert!(message.contains("already registered")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let service = create_test_service().await;
        assert!(matches!(service.get_household("nope").await, Err(LedgerError::NotFound(_))));
        assert!(matches!(service.get_user("nope").await, Err(LedgerError::NotFound(_))));
    }
}
