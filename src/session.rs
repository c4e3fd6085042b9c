//! Explicit user and organization context handed to controllers.

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedOrganization {
    pub id: Uuid,
    pub name: String,
}

/// Who is signed in and which organization they are looking at.
///
/// Either part may be missing: sign-in is handled elsewhere and the
/// organization picker starts out empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<SessionUser>,
    pub organization: Option<SelectedOrganization>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: Uuid, name: impl Into<String>) -> Self {
        self.user = Some(SessionUser {
            id,
            name: name.into(),
        });
        self
    }

    pub fn with_organization(mut self, id: Uuid, name: impl Into<String>) -> Self {
        self.organization = Some(SelectedOrganization {
            id,
            name: name.into(),
        });
        self
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|user| user.id)
    }

    pub fn organization_id(&self) -> Option<Uuid> {
        self.organization.as_ref().map(|org| org.id)
    }
}
