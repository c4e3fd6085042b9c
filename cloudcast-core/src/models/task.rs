use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub description: String,
    pub label: TaskLabel,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assignee_id: Uuid,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TaskLabel {
    #[default]
    Feature,
    Bug,
    Improvement,
}

impl TaskLabel {
    pub const ALL: [Self; 3] = [Self::Feature, Self::Bug, Self::Improvement];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feature => "Feature",
            Self::Bug => "Bug",
            Self::Improvement => "Improvement",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Feature" => Some(Self::Feature),
            "Bug" => Some(Self::Bug),
            "Improvement" => Some(Self::Improvement),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TaskPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl TaskPriority {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "High" => Some(Self::High),
            "Medium" => Some(Self::Medium),
            "Low" => Some(Self::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
    Backlog,
    Canceled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
            Self::Backlog => "Backlog",
            Self::Canceled => "Canceled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Todo" => Some(Self::Todo),
            "In Progress" => Some(Self::InProgress),
            "Done" => Some(Self::Done),
            "Backlog" => Some(Self::Backlog),
            "Canceled" => Some(Self::Canceled),
            _ => None,
        }
    }
}

/// Task write. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub project_id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub label: TaskLabel,
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    pub assignee_id: Uuid,
    pub created_by: Uuid,
}
