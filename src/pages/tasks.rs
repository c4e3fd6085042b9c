use uuid::Uuid;

use super::{FetchTicket, LoadedTable};
use crate::client::{Backend, RemoteError};
use crate::models::Task;
use crate::table::{Column, DataTable, TableRow};

impl TableRow for Task {
    fn row_id(&self) -> String {
        self.id.to_string()
    }
}

/// Task board columns. Filtering matches on title.
pub fn task_columns() -> Vec<Column<Task>> {
    vec![
        Column::new("title", "Title", |t: &Task| t.title.clone())
            .sortable()
            .always_visible(),
        Column::new("label", "Label", |t: &Task| t.label.as_str().to_string()),
        Column::new("priority", "Priority", |t: &Task| t.priority.as_str().to_string())
            .sort_by(|a: &Task, b: &Task| a.priority.cmp(&b.priority)),
        Column::new("status", "Status", |t: &Task| t.status.as_str().to_string()).sortable(),
        Column::new("assignee", "Assignee", |t: &Task| t.assignee_id.to_string()),
        Column::new("created_at", "Created", |t: &Task| {
            t.created_at.format("%Y-%m-%d %H:%M").to_string()
        })
        .sort_by(|a: &Task, b: &Task| a.created_at.cmp(&b.created_at)),
    ]
}

/// Tasks of one project.
pub struct TaskBoard {
    project: Option<Uuid>,
    tasks: LoadedTable<Task>,
    stale: bool,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self {
            project: None,
            tasks: LoadedTable::new(DataTable::new(task_columns(), "title")),
            stale: false,
        }
    }

    pub fn project(&self) -> Option<Uuid> {
        self.project
    }

    pub fn select_project(&mut self, project: Option<Uuid>) -> bool {
        if self.project == project {
            return false;
        }
        self.project = project;
        self.tasks.clear();
        self.stale = project.is_some();
        true
    }

    /// Mark the board for a refetch, e.g. after a task was created.
    pub fn request_refresh(&mut self) {
        self.stale = true;
    }

    pub fn needs_refresh(&self) -> bool {
        self.stale
    }

    pub fn begin_refresh(&mut self) -> Option<(FetchTicket, Uuid)> {
        let project = self.project?;
        self.stale = false;
        Some((self.tasks.begin_fetch(), project))
    }

    pub fn complete_refresh(&mut self, ticket: FetchTicket, result: Result<Vec<Task>, RemoteError>) -> bool {
        self.tasks.complete_fetch(ticket, result)
    }

    pub async fn refresh<B: Backend + ?Sized>(&mut self, backend: &B) -> bool {
        let Some((ticket, project)) = self.begin_refresh() else {
            return false;
        };
        let result = backend.list_tasks(project).await;
        self.complete_refresh(ticket, result)
    }

    pub fn tasks(&self) -> &LoadedTable<Task> {
        &self.tasks
    }

    pub fn table(&self) -> &DataTable<Task> {
        self.tasks.table()
    }

    pub fn table_mut(&mut self) -> &mut DataTable<Task> {
        self.tasks.table_mut()
    }
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self::new()
    }
}
