use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{Backend, RemoteError};
use crate::config::ClientConfig;
use crate::models::{
    AddMemberInput, Conversation, CreateConversationInput, CreateOrganizationInput, CreateProjectInput,
    CreateTaskInput, CreateUserInput, Message, Organization, OrganizationMember, Project,
    SendMessageInput, Task, User, UserProfile,
};

#[derive(Clone)]
pub struct HttpBackend {
    config: ClientConfig,
    client: Client,
}

/// Error payload written by the API: `{"error": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self, RemoteError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|error| {
                RemoteError::Configuration(format!("failed to build HTTP client: {error}"))
            })?;

        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self, RemoteError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.config.api_url.trim_end_matches('/');
        let suffix = path.trim_start_matches('/');
        format!("{base}/{suffix}")
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|error| RemoteError::Transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| RemoteError::Transport(format!("reading response body: {error}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|payload| payload.error)
                .unwrap_or(body);
            return Err(RemoteError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    async fn request_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|error| RemoteError::Decode(error.to_string()))
    }

    async fn request_status_only(&self, request: RequestBuilder) -> Result<(), RemoteError> {
        self.send(request).await.map(|_| ())
    }

    // --- Administration (datastore setup, outside the `Backend` surface) ---

    pub async fn create_user(&self, input: &CreateUserInput) -> Result<UserProfile, RemoteError> {
        let request = self.client.post(self.endpoint("api/users")).json(input);
        self.request_json(request).await
    }

    pub async fn create_organization(&self, name: &str) -> Result<Organization, RemoteError> {
        let input = CreateOrganizationInput { name: name.to_string() };
        let request = self.client.post(self.endpoint("api/organizations")).json(&input);
        self.request_json(request).await
    }

    pub async fn add_member(&self, organization_id: Uuid, input: &AddMemberInput) -> Result<(), RemoteError> {
        let request = self
            .client
            .post(self.endpoint(&format!("api/organizations/{organization_id}/members")))
            .json(input);
        self.request_status_only(request).await
    }

    pub async fn create_project(&self, input: &CreateProjectInput) -> Result<Project, RemoteError> {
        let request = self.client.post(self.endpoint("api/projects")).json(input);
        self.request_json(request).await
    }

    pub async fn list_projects(&self, organization_id: Uuid) -> Result<Vec<Project>, RemoteError> {
        let request = self
            .client
            .get(self.endpoint(&format!("api/organizations/{organization_id}/projects")));
        self.request_json(request).await
    }

    pub async fn create_conversation(
        &self,
        input: &CreateConversationInput,
    ) -> Result<Conversation, RemoteError> {
        let request = self.client.post(self.endpoint("api/conversations")).json(input);
        self.request_json(request).await
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get_organization_members(&self, org_id: Uuid) -> Result<Vec<User>, RemoteError> {
        let request = self
            .client
            .post(self.endpoint("rpc/get_organization_members"))
            .json(&json!({ "org_id": org_id }));
        let members: Vec<OrganizationMember> = self.request_json(request).await?;
        Ok(members.into_iter().map(User::from).collect())
    }

    async fn delete_project(&self, project_id: Uuid) -> Result<(), RemoteError> {
        let request = self
            .client
            .delete(self.endpoint(&format!("api/projects/{project_id}")));
        self.request_status_only(request).await
    }

    async fn update_project_status(&self, project_id: Uuid, status: &str) -> Result<(), RemoteError> {
        let request = self
            .client
            .patch(self.endpoint(&format!("api/projects/{project_id}")))
            .json(&json!({ "status": status }));
        self.request_status_only(request).await
    }

    async fn create_task(&self, input: CreateTaskInput) -> Result<Task, RemoteError> {
        let request = self.client.post(self.endpoint("api/tasks")).json(&input);
        self.request_json(request).await
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, RemoteError> {
        let request = self
            .client
            .get(self.endpoint(&format!("api/projects/{project_id}/tasks")));
        self.request_json(request).await
    }

    async fn send_message(&self, input: SendMessageInput) -> Result<Message, RemoteError> {
        let request = self.client.post(self.endpoint("api/messages")).json(&input);
        self.request_json(request).await
    }

    async fn list_messages(&self, conversation_id: Uuid) -> Result<Vec<Message>, RemoteError> {
        let request = self
            .client
            .get(self.endpoint(&format!("api/conversations/{conversation_id}/messages")));
        self.request_json(request).await
    }
}
