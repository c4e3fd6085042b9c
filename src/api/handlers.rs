use anyhow::anyhow;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::ApiError;
use crate::db::Database;
use crate::models::*;

const PROJECT_ID_REQUIRED: &str = "Project ID is required";
const PROJECT_ID_AND_STATUS_REQUIRED: &str = "Project ID and status are required";

type Confirmation = (StatusCode, Json<Value>);

fn confirmation(message: &str) -> Confirmation {
    (StatusCode::OK, Json(json!({ "message": message })))
}

/// Empty or whitespace ids count as absent (400). An id that is present but
/// malformed is a datastore error (500), the way the store rejects it.
fn parse_id(raw: &str, missing: &str) -> Result<Uuid, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::BadRequest(missing.to_string()));
    }
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::Database(anyhow!("invalid input syntax for type uuid: \"{raw}\"")))
}

pub async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Default, Deserialize)]
struct MembersParams {
    org_id: Option<String>,
}

pub async fn get_organization_members(
    State(db): State<Database>,
    body: Bytes,
) -> Result<Json<Vec<OrganizationMember>>, ApiError> {
    let params: MembersParams = serde_json::from_slice(&body).unwrap_or_default();
    let org_id = parse_id(params.org_id.as_deref().unwrap_or(""), "org_id is required")?;

    let members = db.get_organization_members(org_id)?;
    tracing::debug!("Fetched {} members for organization {}", members.len(), org_id);
    Ok(Json(members))
}

// --- Accounts and organizations ---

pub async fn create_user(
    State(db): State<Database>,
    Json(input): Json<CreateUserInput>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let profile = UserProfile {
        id: db.create_user(input.clone())?,
        name: input.name,
        email: input.email,
        avatar_url: input.avatar_url,
    };
    tracing::info!("Registered user {} <{}>", profile.id, profile.email);
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn create_organization(
    State(db): State<Database>,
    Json(input): Json<CreateOrganizationInput>,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    let organization = db.create_organization(input)?;
    tracing::info!("Created organization {} ({})", organization.id, organization.name);
    Ok((StatusCode::CREATED, Json(organization)))
}

pub async fn add_member(
    State(db): State<Database>,
    Path(organization_id): Path<String>,
    Json(input): Json<AddMemberInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let organization_id = parse_id(&organization_id, "Organization ID is required")?;
    let user_id = input.user_id;
    db.add_member(organization_id, input)?;
    tracing::info!("Added user {} to organization {}", user_id, organization_id);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Member added successfully" })),
    ))
}

pub async fn list_projects(
    State(db): State<Database>,
    Path(organization_id): Path<String>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let organization_id = parse_id(&organization_id, "Organization ID is required")?;
    Ok(Json(db.list_projects(organization_id)?))
}

// --- Projects ---

pub async fn create_project(
    State(db): State<Database>,
    Json(input): Json<CreateProjectInput>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = db.create_project(input)?;
    tracing::info!("Created project {} in organization {}", project.id, project.organization_id);
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn delete_project_without_id() -> ApiError {
    ApiError::BadRequest(PROJECT_ID_REQUIRED.to_string())
}

pub async fn delete_project(
    State(db): State<Database>,
    Path(project_id): Path<String>,
) -> Result<Confirmation, ApiError> {
    let project_id = parse_id(&project_id, PROJECT_ID_REQUIRED)?;

    if !db.delete_project(project_id)? {
        tracing::warn!("Delete matched no project with id {}", project_id);
    }
    Ok(confirmation("Project deleted successfully"))
}

pub async fn update_project_without_id() -> ApiError {
    ApiError::BadRequest(PROJECT_ID_AND_STATUS_REQUIRED.to_string())
}

pub async fn update_project_status(
    State(db): State<Database>,
    Path(project_id): Path<String>,
    body: Bytes,
) -> Result<Confirmation, ApiError> {
    let input: UpdateProjectStatusInput = serde_json::from_slice(&body).unwrap_or_default();
    let status = input
        .status
        .map(|status| status.trim().to_string())
        .filter(|status| !status.is_empty())
        .ok_or_else(|| ApiError::BadRequest(PROJECT_ID_AND_STATUS_REQUIRED.to_string()))?;
    let project_id = parse_id(&project_id, PROJECT_ID_AND_STATUS_REQUIRED)?;

    if !db.update_project_status(project_id, &status)? {
        tracing::warn!("Status update matched no project with id {}", project_id);
    }
    Ok(confirmation("Project status updated successfully"))
}

pub async fn create_task(
    State(db): State<Database>,
    Json(input): Json<CreateTaskInput>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = db.create_task(input)?;
    tracing::info!("Created task {} in project {}", task.id, task.project_id);
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks(
    State(db): State<Database>,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let project_id = parse_id(&project_id, PROJECT_ID_REQUIRED)?;
    Ok(Json(db.list_tasks(project_id)?))
}

pub async fn create_conversation(
    State(db): State<Database>,
    Json(input): Json<CreateConversationInput>,
) -> Result<(StatusCode, Json<Conversation>), ApiError> {
    let conversation = db.create_conversation(input)?;
    tracing::info!("Created conversation {} ({})", conversation.id, conversation.name);
    Ok((StatusCode::CREATED, Json(conversation)))
}

pub async fn send_message(
    State(db): State<Database>,
    Json(input): Json<SendMessageInput>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let message = db.create_message(input)?;
    tracing::debug!(
        "Stored message {} in conversation {}",
        message.id,
        message.conversation_id
    );
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_messages(
    State(db): State<Database>,
    Path(conversation_id): Path<String>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let conversation_id = parse_id(&conversation_id, "Conversation ID is required")?;
    Ok(Json(db.list_messages(conversation_id)?))
}
