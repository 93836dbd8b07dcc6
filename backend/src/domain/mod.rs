//! # Domain Module
//!
//! Business rules of the expense ledger: validating requests, splitting an
//! expense equally among members, and turning storage outcomes into the
//! [`LedgerError`] taxonomy. Storage is reached only through the traits in
//! `crate::storage`.

pub mod commands;
pub mod directory_service;
pub mod error;
pub mod expense_service;
pub mod models;

pub use directory_service::DirectoryService;
pub use error::{LedgerError, LedgerResult};
pub use expense_service::{equal_split, ExpenseService};
