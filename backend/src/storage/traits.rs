//! # Storage Traits
//!
//! Persistence seams used by the domain services. The services only ever
//! hold these as `Arc<dyn ...>` so any backend can be injected.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{
    Expense, ExpenseChanges, ExpenseSplit, Household, NewExpense, NewSplit, User,
};

/// Storage operations for expenses and their splits
#[async_trait]
pub trait ExpenseStorage: Send + Sync {
    /// Write an expense and all of its splits as one unit.
    /// Either everything is stored or nothing is.
    async fn insert_expense(&self, expense: &NewExpense, splits: &[NewSplit]) -> Result<Expense>;

    /// All expenses of a household, newest `date` first
    async fn list_expenses(&self, household_id: &str) -> Result<Vec<Expense>>;

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>>;

    /// Apply the given changes.
    /// Returns `None` when no expense has this id.
    async fn update_expense(&self, expense_id: &str, changes: &ExpenseChanges) -> Result<Option<Expense>>;

    /// Delete an expense together with its splits.
    /// Returns false when no expense has this id.
    async fn delete_expense(&self, expense_id: &str) -> Result<bool>;

    /// Set `is_paid` on a split of the given expense.
    /// Returns `None` when the split does not exist under that expense.
    async fn mark_split_paid(&self, expense_id: &str, split_id: &str) -> Result<Option<ExpenseSplit>>;
}

/// Storage operations for the households and users expenses point at
#[async_trait]
pub trait DirectoryStorage: Send + Sync {
    async fn insert_household(&self, household: &Household) -> Result<()>;

    async fn get_household(&self, household_id: &str) -> Result<Option<Household>>;

    async fn insert_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;
}
