//! Domain entities for the expense ledger.
//!
//! These mirror the persisted records. Timestamps are real `DateTime<Utc>`
//! values here and only become strings at the storage and REST edges.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use shared::{ExpenseCategory, SplitType};

/// Fixed-width RFC 3339 (milliseconds, `Z`). Used both for the stored
/// columns, so that text ordering in SQL is chronological, and on the wire.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Invalid timestamp: {}", raw))?;
    Ok(parsed.with_timezone(&Utc))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Household {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// The user who recorded an expense
#[derive(Debug, Clone, PartialEq)]
pub struct Creator {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// The user who owes a split
#[derive(Debug, Clone, PartialEq)]
pub struct Debtor {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSplit {
    pub id: String,
    pub expense_id: String,
    pub user_id: String,
    pub amount_owed: f64,
    pub is_paid: bool,
    pub debtor: Debtor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: String,
    pub household_id: String,
    pub creator_id: String,
    pub amount: f64,
    pub description: String,
    pub category: ExpenseCategory,
    pub split_type: SplitType,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub creator: Creator,
    pub splits: Vec<ExpenseSplit>,
}

/// Expense row about to be written, before any projection is loaded
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub id: String,
    pub household_id: String,
    pub creator_id: String,
    pub amount: f64,
    pub description: String,
    pub category: ExpenseCategory,
    pub split_type: SplitType,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSplit {
    pub id: String,
    pub user_id: String,
    pub amount_owed: f64,
    pub is_paid: bool,
}

/// Field changes applied by an update. `None` leaves the column as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category: Option<ExpenseCategory>,
}

impl ExpenseChanges {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.description.is_none() && self.category.is_none()
    }
}
