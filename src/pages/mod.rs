//! Dashboard pages: local row caches fed from the remote access layer.
//!
//! A page never trusts a response blindly. Every fetch is issued a
//! [`FetchTicket`]; switching the organization or project invalidates the
//! outstanding tickets, and a late response for an old ticket is dropped
//! instead of overwriting the rows of the new selection.

mod tasks;
mod users;

pub use tasks::{task_columns, TaskBoard};
pub use users::{user_columns, UsersPage};

use crate::client::RemoteError;
use crate::table::{DataTable, TableRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// A data table plus the bookkeeping for filling it from the backend.
pub struct LoadedTable<R> {
    table: DataTable<R>,
    generation: u64,
    loading: bool,
    last_error: Option<RemoteError>,
}

impl<R: TableRow> LoadedTable<R> {
    pub fn new(table: DataTable<R>) -> Self {
        Self {
            table,
            generation: 0,
            loading: false,
            last_error: None,
        }
    }

    pub fn table(&self) -> &DataTable<R> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut DataTable<R> {
        &mut self.table
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&RemoteError> {
        self.last_error.as_ref()
    }

    /// Start a fetch. Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        FetchTicket(self.generation)
    }

    /// Make every outstanding ticket stale without starting a new fetch.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Apply a fetch result. Returns false when the ticket was stale and the
    /// result was discarded. Errors leave the current rows in place.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<R>, RemoteError>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!("Discarding stale fetch result (ticket {})", ticket.0);
            return false;
        }
        self.loading = false;
        match result {
            Ok(rows) => {
                self.table.set_rows(rows);
                self.last_error = None;
            }
            Err(error) => {
                tracing::error!("Error fetching rows: {}", error);
                self.last_error = Some(error);
            }
        }
        true
    }

    /// Drop all rows, e.g. when nothing is selected to load from.
    pub fn clear(&mut self) {
        self.invalidate();
        self.table.set_rows(Vec::new());
        self.last_error = None;
    }
}
