//! Remote access layer.
//!
//! [`Backend`] is the seam the page and dialog controllers talk through;
//! [`HttpBackend`] implements it against the datastore's HTTP API. Failures
//! are reported once and never retried.

mod http;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{CreateTaskInput, Message, SendMessageInput, Task, User};

pub use http::HttpBackend;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("invalid client configuration: {0}")]
    Configuration(String),
    #[error("request failed: {0}")]
    Transport(String),
    /// The backend answered with an error status; `message` is its own text.
    #[error("{message} (status {status})")]
    Backend { status: u16, message: String },
    #[error("response was malformed: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Members of an organization via the `get_organization_members` procedure.
    async fn get_organization_members(&self, org_id: Uuid) -> Result<Vec<User>, RemoteError>;

    async fn delete_project(&self, project_id: Uuid) -> Result<(), RemoteError>;

    async fn update_project_status(&self, project_id: Uuid, status: &str) -> Result<(), RemoteError>;

    /// The store assigns the id and creation time of the returned row.
    async fn create_task(&self, input: CreateTaskInput) -> Result<Task, RemoteError>;

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, RemoteError>;

    async fn send_message(&self, input: SendMessageInput) -> Result<Message, RemoteError>;

    async fn list_messages(&self, conversation_id: Uuid) -> Result<Vec<Message>, RemoteError>;
}
