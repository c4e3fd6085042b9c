//! CloudCast dashboard.
//!
//! The datastore service ([`api`]), the typed remote access layer
//! ([`client`]) and the presentation model the dashboard pages are built
//! from: data tables, loaded pages, the task creation dialog and the chat
//! input.

pub mod api;
pub mod chat;
pub mod client;
pub mod config;
pub mod pages;
pub mod session;
pub mod table;
pub mod task_dialog;

pub use cloudcast_core::{db, models, Database};
