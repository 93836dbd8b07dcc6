use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use shared::{CreateExpenseRequest, SplitType, UpdateExpenseRequest};

use super::commands::CreateExpenseCommand;
use super::error::{LedgerError, LedgerResult};
use super::models::{Expense, ExpenseChanges, ExpenseSplit, NewExpense, NewSplit};
use crate::storage::ExpenseStorage;

/// Divide `amount` equally among `member_ids`.
///
/// Plain floating-point division: no remainder is redistributed, so the
/// shares only sum to `amount` within floating-point tolerance. The
/// creator's own share starts out paid.
pub fn equal_split(amount: f64, member_ids: &[String], creator_id: &str) -> Vec<NewSplit> {
    let share = amount / member_ids.len() as f64;
    member_ids
        .iter()
        .map(|user_id| NewSplit {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.clone(),
            amount_owed: share,
            is_paid: user_id == creator_id,
        })
        .collect()
}

/// Service for recording and settling shared household expenses
#[derive(Clone)]
pub struct ExpenseService {
    storage: Arc<dyn ExpenseStorage>,
}

impl ExpenseService {
    pub fn new(storage: Arc<dyn ExpenseStorage>) -> Self {
        Self { storage }
    }

    /// List a household's expenses, newest first
    pub async fn list_expenses(&self, household_id: Option<&str>) -> LedgerResult<Vec<Expense>> {
        let household_id = household_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| LedgerError::validation("householdId query parameter is required"))?;

        info!("Listing expenses for household {}", household_id);

        let expenses = self.storage.list_expenses(household_id).await.map_err(|e| {
            error!("Failed to list expenses for household {}: {:#}", household_id, e);
            LedgerError::persistence("Failed to fetch expenses")
        })?;

        info!("Found {} expenses", expenses.len());
        Ok(expenses)
    }

    pub async fn get_expense(&self, expense_id: &str) -> LedgerResult<Expense> {
        info!("Getting expense: {}", expense_id);

        let expense = self.storage.get_expense(expense_id).await.map_err(|e| {
            error!("Failed to get expense {}: {:#}", expense_id, e);
            LedgerError::persistence("Failed to fetch expense")
        })?;

        expense.ok_or_else(|| {
            warn!("Expense not found: {}", expense_id);
            LedgerError::not_found("Expense not found")
        })
    }

    /// Record an expense and split it equally among the given members
    pub async fn create_expense(&self, request: CreateExpenseRequest) -> LedgerResult<Expense> {
        let command = CreateExpenseCommand::try_from(request)?;
        info!(
            "Creating expense: household={}, creator={}, amount={}, members={}",
            command.household_id,
            command.creator_id,
            command.amount,
            command.member_ids.len()
        );

        let expense = NewExpense {
            id: Uuid::new_v4().to_string(),
            household_id: command.household_id,
            creator_id: command.creator_id,
            amount: command.amount,
            description: command.description,
            category: command.category,
            split_type: SplitType::Equal,
            date: Utc::now(),
        };
        let splits = equal_split(expense.amount, &command.member_ids, &expense.creator_id);

        let created = self.storage.insert_expense(&expense, &splits).await.map_err(|e| {
            error!("Failed to create expense: {:#}", e);
            LedgerError::persistence_with_details("Failed to create expense", &e)
        })?;

        info!("Created expense {} with {} splits", created.id, created.splits.len());
        Ok(created)
    }

    /// Apply the fields present in `request`; absent fields stay as they are
    pub async fn update_expense(&self, expense_id: &str, request: UpdateExpenseRequest) -> LedgerResult<Expense> {
        let changes = ExpenseChanges::try_from(request)?;
        info!("Updating expense {}: {:?}", expense_id, changes);

        let updated = self.storage.update_expense(expense_id, &changes).await.map_err(|e| {
            error!("Failed to update expense {}: {:#}", expense_id, e);
            LedgerError::persistence("Failed to update expense")
        })?;

        updated.ok_or_else(|| {
            warn!("Expense not found for update: {}", expense_id);
            LedgerError::not_found("Expense not found")
        })
    }

    /// Delete an expense; its splits go with it
    pub async fn delete_expense(&self, expense_id: &str) -> LedgerResult<()> {
        info!("Deleting expense: {}", expense_id);

        let deleted = self.storage.delete_expense(expense_id).await.map_err(|e| {
            error!("Failed to delete expense {}: {:#}", expense_id, e);
            LedgerError::persistence("Failed to delete expense")
        })?;

        if !deleted {
            warn!("Expense not found for delete: {}", expense_id);
            return Err(LedgerError::not_found("Expense not found"));
        }
        Ok(())
    }

    /// Mark one split of an expense as paid. Marking a paid split again is a no-op.
    pub async fn mark_split_paid(&self, expense_id: &str, split_id: &str) -> LedgerResult<ExpenseSplit> {
        info!("Marking split {} of expense {} as paid", split_id, expense_id);

        let split = self.storage.mark_split_paid(expense_id, split_id).await.map_err(|e| {
            error!("Failed to mark split {} as paid: {:#}", split_id, e);
            LedgerError::persistence("Failed to mark split as paid")
        })?;

        split.ok_or_else(|| {
            warn!("Split {} not found under expense {}", split_id, expense_id);
            LedgerError::not_found("Expense split not found")
        })
    }
}
