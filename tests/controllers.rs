mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use uuid::Uuid;

use cloudcast::chat::{ChatError, ChatInput};
use cloudcast::models::*;
use cloudcast::pages::{TaskBoard, UsersPage};
use cloudcast::session::Session;
use cloudcast::task_dialog::{AssigneeOption, DialogState, TaskCreateDialog, TaskDialogError};

use common::{server_error, FakeBackend};

fn signed_in() -> Session {
    Session::new()
        .with_user(Uuid::new_v4(), "Ann")
        .with_organization(Uuid::new_v4(), "Acme")
}

// --- Task creation dialog ---

fn filled_dialog(project: Option<Uuid>) -> TaskCreateDialog {
    let mut dialog = TaskCreateDialog::new(project, Vec::new());
    dialog.open();
    dialog.set_title("Fix login redirect");
    dialog.set_label(TaskLabel::Bug);
    dialog.set_priority(TaskPriority::High);
    dialog.set_assignee(Some(Uuid::new_v4()));
    dialog
}

#[tokio::test]
async fn successful_submit_refetches_resets_and_closes() {
    let backend = FakeBackend::new();
    let session = signed_in();
    let project = Uuid::new_v4();
    let mut dialog = filled_dialog(Some(project));
    let mut board = TaskBoard::new();
    board.select_project(Some(project));
    board.refresh(&backend).await;
    assert!(!board.needs_refresh());

    let task = dialog
        .submit(&session, &backend, || board.request_refresh())
        .await
        .unwrap();

    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.created_by, session.user_id().unwrap());
    assert_eq!(task.organization_id, session.organization_id().unwrap());
    assert_eq!(dialog.state(), DialogState::Closed);
    assert!(!dialog.has_unsaved_changes());
    assert!(board.needs_refresh());

    board.refresh(&backend).await;
    assert_eq!(board.table().rows(), &[task]);
}

#[tokio::test]
async fn missing_assignee_never_reaches_the_backend() {
    let backend = FakeBackend::new();
    let mut dialog = filled_dialog(Some(Uuid::new_v4()));
    dialog.set_assignee(None);
    let mut refetched = false;

    let error = dialog
        .submit(&signed_in(), &backend, || refetched = true)
        .await
        .unwrap_err();

    assert!(matches!(error, TaskDialogError::NoAssignee));
    assert_eq!(error.to_string(), "Please select an assignee!");
    assert!(backend.calls().is_empty());
    assert!(!refetched);
    assert_eq!(dialog.state(), DialogState::Open);
    assert_eq!(dialog.form().title, "Fix login redirect");
}

#[tokio::test]
async fn each_precondition_rejects_before_any_call() {
    let backend = FakeBackend::new();

    let mut dialog = filled_dialog(Some(Uuid::new_v4()));
    let no_org = Session::new().with_user(Uuid::new_v4(), "Ann");
    let error = dialog.submit(&no_org, &backend, || {}).await.unwrap_err();
    assert!(matches!(error, TaskDialogError::NoOrganization));

    let no_user = Session::new().with_organization(Uuid::new_v4(), "Acme");
    let error = dialog.submit(&no_user, &backend, || {}).await.unwrap_err();
    assert!(matches!(error, TaskDialogError::NoUser));

    let mut no_project = filled_dialog(None);
    let error = no_project.submit(&signed_in(), &backend, || {}).await.unwrap_err();
    assert!(matches!(error, TaskDialogError::NoProject));

    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn backend_failure_keeps_dialog_open_with_input() {
    let backend = FakeBackend::new();
    backend.fail_with(server_error("insert failed"));
    let mut dialog = filled_dialog(Some(Uuid::new_v4()));
    let before = dialog.form().clone();
    let mut refetched = false;

    let error = dialog
        .submit(&signed_in(), &backend, || refetched = true)
        .await
        .unwrap_err();

    assert!(error.is_remote());
    assert_eq!(error.to_string(), "Failed to create task.");
    assert_eq!(backend.call_count("create_task"), 1);
    assert!(!refetched);
    assert_eq!(dialog.state(), DialogState::Open);
    assert_eq!(dialog.form(), &before);

    backend.recover();
    dialog.submit(&signed_in(), &backend, || refetched = true).await.unwrap();
    assert!(refetched);
    assert_eq!(backend.call_count("create_task"), 2);
}

#[tokio::test]
async fn abandoned_submit_leaves_dialog_open() {
    let backend = FakeBackend::task_gated(Arc::new(Notify::new()));
    let session = signed_in();
    let mut dialog = filled_dialog(Some(Uuid::new_v4()));
    let before = dialog.form().clone();

    let outcome = tokio::time::timeout(
        Duration::from_millis(20),
        dialog.submit(&session, &backend, || {}),
    )
    .await;

    assert!(outcome.is_err());
    assert_eq!(backend.call_count("create_task"), 1);
    assert_eq!(dialog.state(), DialogState::Open);
    assert_eq!(dialog.form(), &before);
    assert!(dialog.can_submit());
    assert_eq!(dialog.request_close(), DialogState::ConfirmDiscard);
}

#[tokio::test]
async fn closed_dialog_does_not_submit() {
    let backend = FakeBackend::new();
    let mut dialog = TaskCreateDialog::new(Some(Uuid::new_v4()), Vec::new());

    let error = dialog.submit(&signed_in(), &backend, || {}).await.unwrap_err();

    assert!(matches!(error, TaskDialogError::NotOpen));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn assignee_options_come_from_fetched_members() {
    let backend = FakeBackend::with_members(vec![
        common::user("Ann", "ann@acme.test"),
        common::user("Ben", "ben@acme.test"),
    ]);
    let session = signed_in();
    let mut users = UsersPage::new();
    users.sync_session(&session);
    users.refresh(&backend).await;

    let options: Vec<AssigneeOption> = users.table().rows().iter().map(AssigneeOption::from).collect();
    let dialog = TaskCreateDialog::new(Some(Uuid::new_v4()), options);

    let names: Vec<&str> = dialog.assignees().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Ben"]);
    assert_eq!(dialog.assignees()[0].avatar, DEFAULT_AVATAR_URL);
}

// --- Chat input ---

#[tokio::test]
async fn whitespace_draft_is_a_no_op() {
    let backend = FakeBackend::new();
    let input = ChatInput::new(Uuid::new_v4());
    input.set_draft("   \n\t");

    let error = input.send(&signed_in(), &backend).await.unwrap_err();

    assert!(matches!(error, ChatError::EmptyDraft));
    assert!(backend.calls().is_empty());
    assert_eq!(input.draft(), "   \n\t");
    assert!(!input.is_sending());
}

#[tokio::test]
async fn send_without_user_is_rejected() {
    let backend = FakeBackend::new();
    let input = ChatInput::new(Uuid::new_v4());
    input.set_draft("hello");

    let error = input.send(&Session::new(), &backend).await.unwrap_err();

    assert!(matches!(error, ChatError::NoUser));
    assert!(backend.calls().is_empty());
    assert_eq!(input.draft(), "hello");
    assert!(!input.is_sending());
}

#[tokio::test]
async fn successful_send_clears_the_draft() {
    let backend = FakeBackend::new();
    let session = signed_in();
    let conversation = Uuid::new_v4();
    let input = ChatInput::new(conversation);
    input.set_draft("hello team");

    let message = input.send(&session, &backend).await.unwrap();

    assert_eq!(message.content, "hello team");
    assert_eq!(message.conversation_id, conversation);
    assert_eq!(message.sender_id, session.user_id().unwrap());
    assert!(input.draft().is_empty());
    assert!(!input.is_sending());
}

#[tokio::test]
async fn failed_send_keeps_the_draft_and_releases_the_guard() {
    let backend = FakeBackend::new();
    backend.fail_with(server_error("offline"));
    let input = ChatInput::new(Uuid::new_v4());
    input.set_draft("retry me");

    let error = input.send(&signed_in(), &backend).await.unwrap_err();

    assert!(matches!(error, ChatError::Remote(_)));
    assert_eq!(input.draft(), "retry me");
    assert!(!input.is_sending());

    backend.recover();
    input.send(&signed_in(), &backend).await.unwrap();
    assert_eq!(backend.call_count("send_message"), 2);
}

#[tokio::test]
async fn rapid_double_send_issues_one_call() {
    let gate = Arc::new(Notify::new());
    let backend = FakeBackend::gated(gate.clone());
    let session = signed_in();
    let input = ChatInput::new(Uuid::new_v4());
    input.set_draft("only once");

    let (first, second, ()) = tokio::join!(
        input.send(&session, &backend),
        input.send(&session, &backend),
        async {
            tokio::task::yield_now().await;
            gate.notify_one();
        }
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(ChatError::InFlight)))
            .count(),
        1
    );
    assert_eq!(backend.call_count("send_message"), 1);
    assert!(!input.is_sending());

    input.set_draft("second message");
    gate.notify_one();
    input.send(&session, &backend).await.unwrap();
    assert_eq!(backend.call_count("send_message"), 2);
}

// --- Pages ---

#[tokio::test]
async fn users_page_waits_for_an_organization() {
    let backend = FakeBackend::with_members(vec![common::user("Ann", "ann@acme.test")]);
    let mut users = UsersPage::new();

    assert!(!users.refresh(&backend).await);
    assert!(backend.calls().is_empty());

    users.select_organization(Some(Uuid::new_v4()));
    assert!(users.refresh(&backend).await);
    assert_eq!(users.table().rows().len(), 1);
}

#[tokio::test]
async fn late_members_for_previous_organization_are_dropped() {
    let mut users = UsersPage::new();
    users.select_organization(Some(Uuid::new_v4()));
    let (stale, _) = users.begin_refresh().unwrap();

    users.select_organization(Some(Uuid::new_v4()));
    let (current, _) = users.begin_refresh().unwrap();

    assert!(users.complete_refresh(current, Ok(vec![common::user("New", "new@acme.test")])));
    assert!(!users.complete_refresh(stale, Ok(vec![common::user("Old", "old@acme.test")])));
    assert_eq!(users.table().rows()[0].name, "New");
}

#[tokio::test]
async fn fetch_failure_keeps_previous_members() {
    let backend = FakeBackend::with_members(vec![common::user("Ann", "ann@acme.test")]);
    let mut users = UsersPage::new();
    users.select_organization(Some(Uuid::new_v4()));
    users.refresh(&backend).await;

    backend.fail_with(server_error("rpc failed"));
    users.refresh(&backend).await;

    assert_eq!(users.table().rows().len(), 1);
    assert!(users.members().last_error().is_some());
    assert!(!users.members().is_loading());
}

#[tokio::test]
async fn switching_project_clears_the_board() {
    let backend = FakeBackend::new();
    let session = signed_in();
    let project = Uuid::new_v4();
    let mut dialog = filled_dialog(Some(project));
    dialog.submit(&session, &backend, || {}).await.unwrap();

    let mut board = TaskBoard::new();
    board.select_project(Some(project));
    board.refresh(&backend).await;
    assert_eq!(board.table().rows().len(), 1);

    assert!(board.select_project(Some(Uuid::new_v4())));
    assert!(board.table().rows().is_empty());
    assert!(board.needs_refresh());
    assert!(!board.select_project(board.project()));
}
