use uuid::Uuid;

use super::{FetchTicket, LoadedTable};
use crate::client::{Backend, RemoteError};
use crate::models::User;
use crate::session::Session;
use crate::table::{Column, DataTable, TableRow};

impl TableRow for User {
    fn row_id(&self) -> String {
        self.id.to_string()
    }
}

/// Admin users table. Filtering matches on email.
pub fn user_columns() -> Vec<Column<User>> {
    vec![
        Column::new("avatar", "Avatar", |u: &User| u.avatar_or_default().to_string()),
        Column::new("name", "Name", |u: &User| u.name.clone()),
        Column::new("email", "Email", |u: &User| u.email.to_lowercase()).sortable(),
        Column::new("role", "Role", |u: &User| u.role.clone()),
        Column::new("status", "Status", |u: &User| u.status.as_str().to_string()),
    ]
}

/// Members of the selected organization.
pub struct UsersPage {
    organization: Option<Uuid>,
    members: LoadedTable<User>,
}

impl UsersPage {
    pub fn new() -> Self {
        Self {
            organization: None,
            members: LoadedTable::new(DataTable::new(user_columns(), "email")),
        }
    }

    pub fn organization(&self) -> Option<Uuid> {
        self.organization
    }

    /// Returns whether the selection changed. A change drops the current rows
    /// and makes in-flight fetches stale.
    pub fn select_organization(&mut self, organization: Option<Uuid>) -> bool {
        if self.organization == organization {
            return false;
        }
        self.organization = organization;
        self.members.clear();
        true
    }

    pub fn sync_session(&mut self, session: &Session) -> bool {
        self.select_organization(session.organization_id())
    }

    /// Nothing to fetch until an organization is selected.
    pub fn begin_refresh(&mut self) -> Option<(FetchTicket, Uuid)> {
        let organization = self.organization?;
        Some((self.members.begin_fetch(), organization))
    }

    pub fn complete_refresh(&mut self, ticket: FetchTicket, result: Result<Vec<User>, RemoteError>) -> bool {
        self.members.complete_fetch(ticket, result)
    }

    pub async fn refresh<B: Backend + ?Sized>(&mut self, backend: &B) -> bool {
        let Some((ticket, organization)) = self.begin_refresh() else {
            return false;
        };
        let result = backend.get_organization_members(organization).await;
        self.complete_refresh(ticket, result)
    }

    pub fn members(&self) -> &LoadedTable<User> {
        &self.members
    }

    pub fn table(&self) -> &DataTable<User> {
        self.members.table()
    }

    pub fn table_mut(&mut self) -> &mut DataTable<User> {
        self.members.table_mut()
    }
}

impl Default for UsersPage {
    fn default() -> Self {
        Self::new()
    }
}
