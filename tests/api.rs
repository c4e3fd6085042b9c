mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

use cloudcast::api::create_router;
use cloudcast::models::*;

fn server(seed: &common::Seed) -> TestServer {
    TestServer::new(create_router(seed.db.clone())).expect("Failed to start test server")
}

#[tokio::test]
async fn members_rpc_returns_denormalized_rows() {
    let seed = common::seed();
    let server = server(&seed);

    let response = server
        .post("/rpc/get_organization_members")
        .json(&json!({ "org_id": seed.org.id }))
        .await;

    response.assert_status_ok();
    let members: Vec<OrganizationMember> = response.json();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].user_name, "Alice");
    assert_eq!(members[1].user_avatar_url.as_deref(), Some("https://cdn.acme.test/bob.png"));
}

#[tokio::test]
async fn members_rpc_without_org_id_is_a_bad_request() {
    let seed = common::seed();
    let server = server(&seed);

    let response = server.post("/rpc/get_organization_members").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "org_id is required");
}

#[tokio::test]
async fn delete_project_confirms_and_removes_row() {
    let seed = common::seed();
    let server = server(&seed);

    let response = server
        .delete(&format!("/api/projects/{}", seed.project.id))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Project deleted successfully");
    assert!(seed.db.get_project(seed.project.id).unwrap().is_none());
}

#[tokio::test]
async fn delete_without_project_id_is_a_bad_request() {
    let seed = common::seed();
    let server = server(&seed);

    for path in ["/api/projects", "/api/projects/"] {
        let response = server.delete(path).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Project ID is required");
    }
}

#[tokio::test]
async fn patch_updates_project_status() {
    let seed = common::seed();
    let server = server(&seed);

    let response = server
        .patch(&format!("/api/projects/{}", seed.project.id))
        .json(&json!({ "status": "archived" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Project status updated successfully");
    assert_eq!(seed.db.get_project(seed.project.id).unwrap().unwrap().status, "archived");
}

#[tokio::test]
async fn patch_without_status_is_a_bad_request() {
    let seed = common::seed();
    let server = server(&seed);
    let path = format!("/api/projects/{}", seed.project.id);

    for body in [json!({}), json!({ "status": "" }), json!({ "status": null })] {
        let response = server.patch(&path).json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let payload: Value = response.json();
        assert_eq!(payload["error"], "Project ID and status are required");
    }

    let response = server.patch(&path).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.patch("/api/projects").json(&json!({ "status": "x" })).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(seed.db.get_project(seed.project.id).unwrap().unwrap().status, "active");
}

#[tokio::test]
async fn patch_of_unknown_project_still_confirms() {
    let seed = common::seed();
    let server = server(&seed);

    let response = server
        .patch(&format!("/api/projects/{}", Uuid::new_v4()))
        .json(&json!({ "status": "archived" }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn malformed_project_id_is_a_datastore_error() {
    let seed = common::seed();
    let server = server(&seed);

    let response = server.delete("/api/projects/not-a-uuid").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid input syntax for type uuid: \"not-a-uuid\"");

    let response = server
        .patch("/api/projects/not-a-uuid")
        .json(&json!({ "status": "archived" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(seed.db.get_project(seed.project.id).unwrap().unwrap().status, "active");
}

#[tokio::test]
async fn create_task_assigns_id_and_defaults_to_todo() {
    let seed = common::seed();
    let server = server(&seed);

    let response = server
        .post("/api/tasks")
        .json(&json!({
            "title": "Fix login",
            "label": "Bug",
            "priority": "High",
            "assignee_id": seed.bob,
            "organization_id": seed.org.id,
            "project_id": seed.project.id,
            "created_by": seed.alice,
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let task: Task = response.json();
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.label, TaskLabel::Bug);

    let listed: Vec<Task> = server
        .get(&format!("/api/projects/{}/tasks", seed.project.id))
        .await
        .json();
    assert_eq!(listed, vec![task]);
}

#[tokio::test]
async fn datastore_failure_maps_to_internal_error() {
    let seed = common::seed();
    let server = server(&seed);

    let response = server
        .post("/api/tasks")
        .json(&json!({
            "title": "Orphan",
            "label": "Feature",
            "priority": "Low",
            "assignee_id": Uuid::new_v4(),
            "organization_id": seed.org.id,
            "project_id": seed.project.id,
            "created_by": seed.alice,
        }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("FOREIGN KEY"));
}

#[tokio::test]
async fn messages_round_trip_with_sender_snapshot() {
    let seed = common::seed();
    let server = server(&seed);

    let response = server
        .post("/api/messages")
        .json(&json!({
            "conversation_id": seed.conversation.id,
            "sender_id": seed.bob,
            "content": "hi team",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: Message = response.json();

    let messages: Vec<Message> = server
        .get(&format!("/api/conversations/{}/messages", seed.conversation.id))
        .await
        .json();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, created.id);
    assert_eq!(messages[0].sender.as_ref().unwrap().name, "Bob");
}

#[tokio::test]
async fn fresh_datastore_can_be_populated_over_http() {
    let server = TestServer::new(create_router(cloudcast::Database::open_memory().unwrap())).unwrap();

    let response = server
        .post("/api/users")
        .json(&json!({ "name": "Dana", "email": "dana@new.test", "avatar_url": null }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let dana: UserProfile = response.json();
    assert_eq!(dana.email, "dana@new.test");

    let response = server.post("/api/organizations").json(&json!({ "name": "Newco" })).await;
    response.assert_status(StatusCode::CREATED);
    let org: Organization = response.json();

    let response = server
        .post(&format!("/api/organizations/{}/members", org.id))
        .json(&json!({ "user_id": dana.id }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Member added successfully");

    let members: Vec<OrganizationMember> = server
        .post("/rpc/get_organization_members")
        .json(&json!({ "org_id": org.id }))
        .await
        .json();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, dana.id);
    assert_eq!(members[0].role, "member");
    assert_eq!(members[0].status, UserStatus::Active);

    let response = server
        .post("/api/projects")
        .json(&json!({ "organization_id": org.id, "name": "Launch", "status": null }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let project: Project = response.json();
    assert_eq!(project.status, "active");

    let projects: Vec<Project> = server
        .get(&format!("/api/organizations/{}/projects", org.id))
        .await
        .json();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, project.id);

    let response = server
        .post("/api/conversations")
        .json(&json!({ "type": "dm", "name": "Dana" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let conversation: Conversation = response.json();
    assert_eq!(conversation.kind, ConversationType::Dm);

    let response = server
        .post("/api/messages")
        .json(&json!({
            "conversation_id": conversation.id,
            "sender_id": dana.id,
            "content": "first!",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn adding_member_to_unknown_organization_fails() {
    let seed = common::seed();
    let server = server(&seed);

    let response = server
        .post(&format!("/api/organizations/{}/members", Uuid::new_v4()))
        .json(&json!({ "user_id": seed.alice, "role": "admin", "status": "active" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("FOREIGN KEY"));
}
