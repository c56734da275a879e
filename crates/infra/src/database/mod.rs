//! SQLite database management

pub mod manager;

pub use manager::DbManager;
