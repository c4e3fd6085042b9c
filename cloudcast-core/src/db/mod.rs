//! SQLite-backed datastore.
//!
//! A single connection is shared behind a mutex; every public operation takes
//! the lock for its own duration, so concurrent writers are serialized and the
//! last write wins.

mod schema;

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("opening database at {}", path.display()))?;
        Self::from_connection(conn)
    }

    /// Open the database in the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "cloudcast")
            .ok_or_else(|| anyhow!("could not determine data directory"))?;
        let path = dirs.data_dir().join("cloudcast.db");
        tracing::debug!("Opening database at {}", path.display());
        Self::open(path)
    }

    pub fn open_memory() -> Result<Self> {
        let db = Self::from_connection(Connection::open_in_memory()?)?;
        db.migrate()?;
        Ok(db)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute_batch(schema::SCHEMA)?;
            Ok(())
        })
    }

    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))?;
        f(&conn)
    }

    // --- Users and organizations ---

    pub fn create_user(&self, input: CreateUserInput) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO users (id, name, email, avatar_url, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    id.to_string(),
                    input.name,
                    input.email,
                    input.avatar_url,
                    Utc::now().to_rfc3339()
                ],
            )?;
            Ok(id)
        })
    }

    pub fn create_organization(&self, input: CreateOrganizationInput) -> Result<Organization> {
        let organization = Organization {
            id: Uuid::new_v4(),
            name: input.name,
            created_at: Utc::now(),
        };
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO organizations (id, name, created_at) VALUES (?1, ?2, ?3)",
                params![
                    organization.id.to_string(),
                    organization.name,
                    organization.created_at.to_rfc3339()
                ],
            )?;
            Ok(())
        })?;
        Ok(organization)
    }

    pub fn add_member(&self, organization_id: Uuid, input: AddMemberInput) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO organization_members (organization_id, user_id, role, status, joined_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    organization_id.to_string(),
                    input.user_id.to_string(),
                    input.role,
                    input.status.as_str(),
                    Utc::now().to_rfc3339()
                ],
            )?;
            Ok(())
        })
    }

    /// Denormalized member rows for an organization, in join order.
    pub fn get_organization_members(&self, organization_id: Uuid) -> Result<Vec<OrganizationMember>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT u.id, u.name, u.email, u.avatar_url, m.status, m.role
                 FROM organization_members m
                 JOIN users u ON u.id = m.user_id
                 WHERE m.organization_id = ?1
                 ORDER BY m.joined_at, m.rowid",
            )?;
            let members = stmt
                .query_map(params![organization_id.to_string()], |row| {
                    Ok(OrganizationMember {
                        user_id: uuid_column(row, 0)?,
                        user_name: row.get(1)?,
                        user_email: row.get(2)?,
                        user_avatar_url: row.get(3)?,
                        status: enum_column(row, 4, UserStatus::from_str)?,
                        role: row.get(5)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(members)
        })
    }

    // --- Projects ---

    pub fn create_project(&self, input: CreateProjectInput) -> Result<Project> {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            organization_id: input.organization_id,
            name: input.name,
            status: input.status.unwrap_or_else(|| "active".to_string()),
            created_at: now,
            updated_at: now,
        };
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO projects (id, organization_id, name, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    project.id.to_string(),
                    project.organization_id.to_string(),
                    project.name,
                    project.status,
                    project.created_at.to_rfc3339(),
                    project.updated_at.to_rfc3339()
                ],
            )?;
            Ok(())
        })?;
        Ok(project)
    }

    pub fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        self.with_connection(|conn| {
            let project = conn
                .query_row(
                    "SELECT id, organization_id, name, status, created_at, updated_at
                     FROM projects WHERE id = ?1",
                    params![id.to_string()],
                    project_from_row,
                )
                .optional()?;
            Ok(project)
        })
    }

    pub fn list_projects(&self, organization_id: Uuid) -> Result<Vec<Project>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, organization_id, name, status, created_at, updated_at
                 FROM projects WHERE organization_id = ?1
                 ORDER BY created_at, rowid",
            )?;
            let projects = stmt
                .query_map(params![organization_id.to_string()], project_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(projects)
        })
    }

    /// Returns whether a row was deleted.
    pub fn delete_project(&self, id: Uuid) -> Result<bool> {
        self.with_connection(|conn| {
            let affected = conn.execute("DELETE FROM projects WHERE id = ?1", params![id.to_string()])?;
            Ok(affected > 0)
        })
    }

    /// Returns whether a row was updated.
    pub fn update_project_status(&self, id: Uuid, status: &str) -> Result<bool> {
        self.with_connection(|conn| {
            let affected = conn.execute(
                "UPDATE projects SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status, Utc::now().to_rfc3339(), id.to_string()],
            )?;
            Ok(affected > 0)
        })
    }

    // --- Tasks ---

    pub fn create_task(&self, input: CreateTaskInput) -> Result<Task> {
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
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO tasks (id, project_id, organization_id, title, description, label, priority,
                                    status, assignee_id, created_by, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    task.id.to_string(),
                    task.project_id.to_string(),
                    task.organization_id.to_string(),
                    task.title,
                    task.description,
                    task.label.as_str(),
                    task.priority.as_str(),
                    task.status.as_str(),
                    task.assignee_id.to_string(),
                    task.created_by.to_string(),
                    task.created_at.to_rfc3339()
                ],
            )?;
            Ok(())
        })?;
        Ok(task)
    }

    pub fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, project_id, organization_id, title, description, label, priority, status,
                        assignee_id, created_by, created_at
                 FROM tasks WHERE project_id = ?1
                 ORDER BY created_at, rowid",
            )?;
            let tasks = stmt
                .query_map(params![project_id.to_string()], |row| {
                    Ok(Task {
                        id: uuid_column(row, 0)?,
                        project_id: uuid_column(row, 1)?,
                        organization_id: uuid_column(row, 2)?,
                        title: row.get(3)?,
                        description: row.get(4)?,
                        label: enum_column(row, 5, TaskLabel::from_str)?,
                        priority: enum_column(row, 6, TaskPriority::from_str)?,
                        status: enum_column(row, 7, TaskStatus::from_str)?,
                        assignee_id: uuid_column(row, 8)?,
                        created_by: uuid_column(row, 9)?,
                        created_at: time_column(row, 10)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    // --- Conversations and messages ---

    pub fn create_conversation(&self, input: CreateConversationInput) -> Result<Conversation> {
        let conversation = Conversation {
            id: Uuid::new_v4(),
            kind: input.kind,
            name: input.name,
            avatar: input.avatar,
        };
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO conversations (id, type, name, avatar, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    conversation.id.to_string(),
                    conversation.kind.as_str(),
                    conversation.name,
                    conversation.avatar,
                    Utc::now().to_rfc3339()
                ],
            )?;
            Ok(())
        })?;
        Ok(conversation)
    }

    pub fn create_message(&self, input: SendMessageInput) -> Result<Message> {
        let message = Message {
            id: Uuid::new_v4(),
            sender_id: input.sender_id,
            content: input.content,
            created_at: Utc::now(),
            conversation_id: input.conversation_id,
            sender: None,
        };
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO messages (id, conversation_id, sender_id, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    message.id.to_string(),
                    message.conversation_id.to_string(),
                    message.sender_id.to_string(),
                    message.content,
                    message.created_at.to_rfc3339()
                ],
            )?;
            Ok(())
        })?;
        Ok(message)
    }

    /// Messages oldest first, each with a snapshot of its sender.
    pub fn list_messages(&self, conversation_id: Uuid) -> Result<Vec<Message>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.sender_id, m.content, m.created_at, m.conversation_id,
                        u.id, u.name, u.avatar_url
                 FROM messages m
                 LEFT JOIN users u ON u.id = m.sender_id
                 WHERE m.conversation_id = ?1
                 ORDER BY m.created_at, m.rowid",
            )?;
            let messages = stmt
                .query_map(params![conversation_id.to_string()], |row| {
                    let sender = match row.get::<_, Option<String>>(5)? {
                        Some(_) => Some(MessageSender {
                            id: uuid_column(row, 5)?,
                            name: row.get(6)?,
                            avatar_url: row.get(7)?,
                        }),
                        None => None,
                    };
                    Ok(Message {
                        id: uuid_column(row, 0)?,
                        sender_id: uuid_column(row, 1)?,
                        content: row.get(2)?,
                        created_at: time_column(row, 3)?,
                        conversation_id: uuid_column(row, 4)?,
                        sender,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(messages)
        })
    }
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: uuid_column(row, 0)?,
        organization_id: uuid_column(row, 1)?,
        name: row.get(2)?,
        status: row.get(3)?,
        created_at: time_column(row, 4)?,
        updated_at: time_column(row, 5)?,
    })
}

fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn time_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Closed enums stored as text; anything outside the set is an integrity error.
fn enum_column<T>(row: &Row<'_>, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unexpected value {raw:?}").into(),
        )
    })
}
