#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;
use uuid::Uuid;

use cloudcast::client::{Backend, RemoteError};
use cloudcast::models::*;
use cloudcast::Database;

pub struct Seed {
    pub db: Database,
    pub org: Organization,
    pub alice: Uuid,
    pub bob: Uuid,
    pub project: Project,
    pub conversation: Conversation,
}

pub fn seed() -> Seed {
    let db = Database::open_memory().expect("Failed to create test database");
    let org = db
        .create_organization(CreateOrganizationInput { name: "Acme".into() })
        .unwrap();
    let alice = db
        .create_user(CreateUserInput {
            name: "Alice".into(),
            email: "alice@acme.test".into(),
            avatar_url: None,
        })
        .unwrap();
    let bob = db
        .create_user(CreateUserInput {
            name: "Bob".into(),
            email: "bob@acme.test".into(),
            avatar_url: Some("https://cdn.acme.test/bob.png".into()),
        })
        .unwrap();
    for (user_id, role) in [(alice, "admin"), (bob, "member")] {
        db.add_member(
            org.id,
            AddMemberInput {
                user_id,
                role: role.into(),
                status: UserStatus::Active,
            },
        )
        .unwrap();
    }
    let project = db
        .create_project(CreateProjectInput {
            organization_id: org.id,
            name: "Website".into(),
            status: None,
        })
        .unwrap();
    let conversation = db
        .create_conversation(CreateConversationInput {
            kind: ConversationType::Group,
            name: "general".into(),
            avatar: String::new(),
        })
        .unwrap();

    Seed {
        db,
        org,
        alice,
        bob,
        project,
        conversation,
    }
}

pub fn user(name: &str, email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.into(),
        email: email.into(),
        avatar_url: None,
        role: "member".into(),
        status: UserStatus::Active,
    }
}

/// In-memory backend that records every call.
#[derive(Default)]
pub struct FakeBackend {
    pub members: Mutex<Vec<User>>,
    pub tasks: Mutex<Vec<Task>>,
    pub calls: Mutex<Vec<&'static str>>,
    pub sent: Mutex<Vec<SendMessageInput>>,
    /// When set, every call fails with this error.
    pub failure: Mutex<Option<RemoteError>>,
    /// When set, `send_message` waits for a notification before answering.
    pub send_gate: Option<Arc<Notify>>,
    /// When set, `create_task` waits for a notification before answering.
    pub task_gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            send_gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn task_gated(gate: Arc<Notify>) -> Self {
        Self {
            task_gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn with_members(members: Vec<User>) -> Self {
        let backend = Self::default();
        *backend.members.lock().unwrap() = members;
        backend
    }

    pub fn fail_with(&self, error: RemoteError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    fn record(&self, name: &'static str) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(name);
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

pub fn server_error(message: &str) -> RemoteError {
    RemoteError::Backend {
        status: 500,
        message: message.into(),
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn get_organization_members(&self, _org_id: Uuid) -> Result<Vec<User>, RemoteError> {
        self.record("get_organization_members")?;
        Ok(self.members.lock().unwrap().clone())
    }

    async fn delete_project(&self, _project_id: Uuid) -> Result<(), RemoteError> {
        self.record("delete_project")
    }

    async fn update_project_status(&self, _project_id: Uuid, _status: &str) -> Result<(), RemoteError> {
        self.record("update_project_status")
    }

    async fn create_task(&self, input: CreateTaskInput) -> Result<Task, RemoteError> {
        self.record("create_task")?;
        if let Some(gate) = &self.task_gate {
            gate.notified().await;
        }
        let task = Task {
            id: Uuid::new_v4(),
            project_id: input.project_id,
            organization_id: input.organization_id,
            title: input.title,
            description: input.description,
            label: input.label,
            priority: input.priority,
            status: input.status,
            assignee_id: input.assignee_id,
            created_by: input.created_by,
            created_at: Utc::now(),
        };
        self.tasks.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, RemoteError> {
        self.record("list_tasks")?;
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|task| task.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn send_message(&self, input: SendMessageInput) -> Result<Message, RemoteError> {
        self.record("send_message")?;
        if let Some(gate) = &self.send_gate {
            gate.notified().await;
        }
        self.sent.lock().unwrap().push(input.clone());
        Ok(Message {
            id: Uuid::new_v4(),
            sender_id: input.sender_id,
            content: input.content,
            created_at: Utc::now(),
            conversation_id: input.conversation_id,
            sender: None,
        })
    }

    async fn list_messages(&self, _conversation_id: Uuid) -> Result<Vec<Message>, RemoteError> {
        self.record("list_messages")?;
        Ok(Vec::new())
    }
}
