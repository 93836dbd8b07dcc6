//! # Storage Module
//!
//! Data persistence for the ledger. The domain layer talks to the traits in
//! [`traits`]; [`sqlite`] is the production implementation.

pub mod sqlite;
pub mod traits;

pub use sqlite::{DbConnection, SqliteDirectoryRepository, SqliteExpenseRepository};
pub use traits::{DirectoryStorage, ExpenseStorage};
