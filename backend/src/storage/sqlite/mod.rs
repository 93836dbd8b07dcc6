//! SQLite implementation of the storage traits.

pub mod connection;
pub mod directory_repository;
pub mod expense_repository;
#[cfg(test)]
pub(crate) mod test_utils;

pub use connection::DbConnection;
pub use directory_repository::SqliteDirectoryRepository;
pub use expense_repository::SqliteExpenseRepository;
