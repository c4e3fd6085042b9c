use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Avatar shown when a user has none on file.
pub const DEFAULT_AVATAR_URL: &str = "/default-avatar.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub role: String,
    pub status: UserStatus,
}

impl User {
    pub fn avatar_or_default(&self) -> &str {
        self.avatar_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_AVATAR_URL)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Row shape returned by the `get_organization_members` procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMember {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_avatar_url: Option<String>,
    pub status: UserStatus,
    pub role: String,
}

impl From<OrganizationMember> for User {
    fn from(member: OrganizationMember) -> Self {
        Self {
            id: member.user_id,
            name: member.user_name,
            email: member.user_email,
            avatar_url: member.user_avatar_url,
            role: member.role,
            status: member.status,
        }
    }
}

/// A user account as registered, before any organization membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}
