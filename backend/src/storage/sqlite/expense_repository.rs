use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;
use std::collections::HashMap;

use super::connection::DbConnection;
use crate::domain::models::{
    format_timestamp, parse_timestamp, Creator, Debtor, Expense, ExpenseChanges, ExpenseSplit,
    NewExpense, NewSplit,
};
use crate::storage::traits::ExpenseStorage;
use shared::{ExpenseCategory, SplitType};

const EXPENSE_COLUMNS: &str = r#"
    e.id, e.household_id, e.creator_id, e.amount, e.description, e.category,
    e.split_type, e.date, e.created_at, e.updated_at,
    u.name AS creator_name, u.email AS creator_email
"#;

const SPLIT_COLUMNS: &str = r#"
    s.id, s.expense_id, s.user_id, s.amount_owed, s.is_paid,
    u.name AS user_name
"#;

/// Repository for expenses and their splits
#[derive(Clone)]
pub struct SqliteExpenseRepository {
    db: DbConnection,
}

impl SqliteExpenseRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn expense_from_row(row: &SqliteRow) -> Result<Expense> {
        let category: String = row.try_get("category")?;
        let split_type: String = row.try_get("split_type")?;
        let date: String = row.try_get("date")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Expense {
            id: row.try_get("id")?,
            household_id: row.try_get("household_id")?,
            creator_id: row.try_get("creator_id")?,
            amount: row.try_get("amount")?,
            description: row.try_get("description")?,
            category: category.parse::<ExpenseCategory>().map_err(|e| anyhow!(e))?,
            split_type: split_type.parse::<SplitType>().map_err(|e| anyhow!(e))?,
            date: parse_timestamp(&date)?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
            creator: Creator {
                id: row.try_get("creator_id")?,
                name: row.try_get("creator_name")?,
                email: row.try_get("creator_email")?,
            },
            splits: Vec::new(),
        })
    }

    fn split_from_row(row: &SqliteRow) -> Result<ExpenseSplit> {
        let user_id: String = row.try_get("user_id")?;
        Ok(ExpenseSplit {
            id: row.try_get("id")?,
            expense_id: row.try_get("expense_id")?,
            user_id: user_id.clone(),
            amount_owed: row.try_get("amount_owed")?,
            is_paid: row.try_get("is_paid")?,
            debtor: Debtor {
                id: user_id,
                name: row.try_get("user_name")?,
            },
        })
    }

    async fn splits_for_expense(conn: &mut SqliteConnection, expense_id: &str) -> Result<Vec<ExpenseSplit>> {
        let sql = format!(
            "SELECT {} FROM expense_splits s JOIN users u ON u.id = s.user_id \
             WHERE s.expense_id = ? ORDER BY s.rowid ASC",
            SPLIT_COLUMNS
        );
        let rows = sqlx::query(&sql).bind(expense_id).fetch_all(conn).await?;

        rows.iter().map(Self::split_from_row).collect()
    }

    async fn get_split(&self, split_id: &str) -> Result<Option<ExpenseSplit>> {
        let sql = format!(
            "SELECT {} FROM expense_splits s JOIN users u ON u.id = s.user_id WHERE s.id = ?",
            SPLIT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(split_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::split_from_row).transpose()
    }
}

#[async_trait]
impl ExpenseStorage for SqliteExpenseRepository {
    async fn insert_expense(&self, expense: &NewExpense, splits: &[NewSplit]) -> Result<Expense> {
        let now = format_timestamp(&Utc::now());
        let mut tx = self.db.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO expenses
                (id, household_id, creator_id, amount, description, category, split_type, date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.household_id)
        .bind(&expense.creator_id)
        .bind(expense.amount)
        .bind(&expense.description)
        .bind(expense.category.as_str())
        .bind(expense.split_type.as_str())
        .bind(format_timestamp(&expense.date))
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        for split in splits {
            sqlx::query(
                r#"
                INSERT INTO expense_splits (id, expense_id, user_id, amount_owed, is_paid)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&split.id)
            .bind(&expense.id)
            .bind(&split.user_id)
            .bind(split.amount_owed)
            .bind(split.is_paid)
            .execute(&mut *tx)
            .await?;
        }

        // Dropping the transaction without commit rolls everything back
        tx.commit().await?;

        self.get_expense(&expense.id)
            .await?
            .ok_or_else(|| anyhow!("Expense {} missing right after insert", expense.id))
    }

    async fn list_expenses(&self, household_id: &str) -> Result<Vec<Expense>> {
        // Expenses and splits are read from one snapshot so a concurrent
        // delete cannot leave an expense without its splits
        let mut tx = self.db.pool().begin().await?;

        let sql = format!(
            "SELECT {} FROM expenses e JOIN users u ON u.id = e.creator_id \
             WHERE e.household_id = ? ORDER BY e.date DESC, e.rowid DESC",
            EXPENSE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(household_id)
            .fetch_all(&mut *tx)
            .await?;
        let mut expenses = rows
            .iter()
            .map(Self::expense_from_row)
            .collect::<Result<Vec<_>>>()?;

        let split_sql = format!(
            "SELECT {} FROM expense_splits s \
             JOIN users u ON u.id = s.user_id \
             JOIN expenses e ON e.id = s.expense_id \
             WHERE e.household_id = ? ORDER BY s.rowid ASC",
            SPLIT_COLUMNS
        );
        let split_rows = sqlx::query(&split_sql)
            .bind(household_id)
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        let mut by_expense: HashMap<String, Vec<ExpenseSplit>> = HashMap::new();
        for row in &split_rows {
            let split = Self::split_from_row(row)?;
            by_expense.entry(split.expense_id.clone()).or_default().push(split);
        }
        for expense in &mut expenses {
            expense.splits = by_expense.remove(&expense.id).unwrap_or_default();
        }

        Ok(expenses)
    }

    async fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>> {
        let sql = format!(
            "SELECT {} FROM expenses e JOIN users u ON u.id = e.creator_id WHERE e.id = ?",
            EXPENSE_COLUMNS
        );
        let mut tx = self.db.pool().begin().await?;
        let row = sqlx::query(&sql)
            .bind(expense_id)
            .fetch_optional(&mut *tx)
            .await?;

        let expense = match row {
            Some(r) => {
                let mut expense = Self::expense_from_row(&r)?;
                expense.splits = Self::splits_for_expense(&mut tx, expense_id).await?;
                Some(expense)
            }
            None => None,
        };
        tx.commit().await?;

        Ok(expense)
    }

    async fn update_expense(&self, expense_id: &str, changes: &ExpenseChanges) -> Result<Option<Expense>> {
        if changes.is_empty() {
            return self.get_expense(expense_id).await;
        }

        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET amount = COALESCE(?, amount),
                description = COALESCE(?, description),
                category = COALESCE(?, category),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(changes.amount)
        .bind(changes.description.as_deref())
        .bind(changes.category.map(|c| c.as_str()))
        .bind(format_timestamp(&Utc::now()))
        .bind(expense_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_expense(expense_id).await
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(expense_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_split_paid(&self, expense_id: &str, split_id: &str) -> Result<Option<ExpenseSplit>> {
        let result = sqlx::query("UPDATE expense_splits SET is_paid = 1 WHERE id = ? AND expense_id = ?")
            .bind(split_id)
            .bind(expense_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_split(split_id).await
    }
}
