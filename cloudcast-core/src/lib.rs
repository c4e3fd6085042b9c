//! Core library for CloudCast.
//!
//! This crate provides the domain models and database operations for the
//! dashboard, independent of any transport layer (HTTP, CLI, etc.).
//!
//! # Usage
//!
//! ```no_run
//! use cloudcast_core::db::Database;
//! use uuid::Uuid;
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let members = db.get_organization_members(Uuid::new_v4())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod db;
pub mod models;

// Re-export commonly used types at crate root
pub use db::Database;
