//! HTTP API over the datastore.
//!
//! Mirrors the surface the dashboard was written against: one RPC for the
//! membership lookup, project delete/status routes, and row writes and
//! listings for tasks and messages. Account, organization, project and
//! conversation creation routes let a fresh datastore be populated.

mod error;
mod handlers;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;

pub use error::ApiError;

pub fn create_router(db: Database) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/rpc/get_organization_members",
            post(handlers::get_organization_members),
        )
        .route("/api/users", post(handlers::create_user))
        .route("/api/organizations", post(handlers::create_organization))
        .route(
            "/api/organizations/{organization_id}/members",
            post(handlers::add_member),
        )
        .route(
            "/api/organizations/{organization_id}/projects",
            get(handlers::list_projects),
        )
        .route(
            "/api/projects",
            post(handlers::create_project)
                .delete(handlers::delete_project_without_id)
                .patch(handlers::update_project_without_id),
        )
        .route(
            "/api/projects/",
            delete(handlers::delete_project_without_id).patch(handlers::update_project_without_id),
        )
        .route(
            "/api/projects/{project_id}",
            delete(handlers::delete_project).patch(handlers::update_project_status),
        )
        .route("/api/projects/{project_id}/tasks", get(handlers::list_tasks))
        .route("/api/tasks", post(handlers::create_task))
        .route(
            "/api/conversations/{conversation_id}/messages",
            get(handlers::list_messages),
        )
        .route("/api/conversations", post(handlers::create_conversation))
        .route("/api/messages", post(handlers::send_message))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(db)
}
