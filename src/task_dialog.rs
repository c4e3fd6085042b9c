//! Task creation dialog.
//!
//! ```text
//! Closed --open--> Open --submit--> Submitting --ok--> Closed
//!                   |                    `--err--> Open (input kept)
//!                   `--close with edits--> ConfirmDiscard --discard--> Closed
//!                                                        `--cancel---> Open
//! ```

use uuid::Uuid;

use crate::client::{Backend, RemoteError};
use crate::models::{CreateTaskInput, Task, TaskLabel, TaskPriority, TaskStatus, User};
use crate::session::Session;

pub const TASK_CREATED_NOTICE: &str = "Task created successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Open,
    /// Close was requested with unsaved edits; waiting for discard or cancel.
    ConfirmDiscard,
    Submitting,
}

#[derive(Debug, thiserror::Error)]
pub enum TaskDialogError {
    #[error("No organization selected!")]
    NoOrganization,
    #[error("User not found!")]
    NoUser,
    #[error("Please select an assignee!")]
    NoAssignee,
    #[error("No project selected!")]
    NoProject,
    #[error("The task dialog is not open")]
    NotOpen,
    #[error("Failed to create task.")]
    Remote(#[source] RemoteError),
}

impl TaskDialogError {
    /// Whether the request reached the backend.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// An entry of the assignee picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssigneeOption {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}

impl From<&User> for AssigneeOption {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            avatar: user.avatar_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub label: TaskLabel,
    pub priority: TaskPriority,
    pub assignee: Option<Uuid>,
}

impl TaskForm {
    pub fn has_unsaved_changes(&self) -> bool {
        !self.title.is_empty() || self.assignee.is_some()
    }
}

/// Puts a dialog left in `Submitting` back to `Open` when dropped, so a
/// submit future that is cancelled mid-request leaves the dialog usable.
struct PendingSubmit<'a>(&'a mut DialogState);

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        if *self.0 == DialogState::Submitting {
            *self.0 = DialogState::Open;
        }
    }
}

pub struct TaskCreateDialog {
    state: DialogState,
    form: TaskForm,
    project_id: Option<Uuid>,
    assignees: Vec<AssigneeOption>,
}

impl TaskCreateDialog {
    pub fn new(project_id: Option<Uuid>, assignees: Vec<AssigneeOption>) -> Self {
        Self {
            state: DialogState::Closed,
            form: TaskForm::default(),
            project_id,
            assignees,
        }
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != DialogState::Closed
    }

    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    pub fn assignees(&self) -> &[AssigneeOption] {
        &self.assignees
    }

    pub fn set_assignees(&mut self, assignees: Vec<AssigneeOption>) {
        self.assignees = assignees;
    }

    pub fn set_project(&mut self, project_id: Option<Uuid>) {
        self.project_id = project_id;
    }

    pub fn open(&mut self) {
        if self.state == DialogState::Closed {
            self.state = DialogState::Open;
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    pub fn set_label(&mut self, label: TaskLabel) {
        self.form.label = label;
    }

    pub fn set_priority(&mut self, priority: TaskPriority) {
        self.form.priority = priority;
    }

    pub fn set_assignee(&mut self, assignee: Option<Uuid>) {
        self.form.assignee = assignee;
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.form.has_unsaved_changes()
    }

    /// Mirrors the enabled state of the Create button.
    pub fn can_submit(&self) -> bool {
        self.state == DialogState::Open
            && !self.form.title.trim().is_empty()
            && self.form.assignee.is_some()
    }

    /// Close if nothing was entered, otherwise ask for confirmation first.
    pub fn request_close(&mut self) -> DialogState {
        if self.state == DialogState::Open {
            if self.has_unsaved_changes() {
                self.state = DialogState::ConfirmDiscard;
            } else {
                self.reset();
            }
        }
        self.state
    }

    pub fn confirm_discard(&mut self) {
        if self.state == DialogState::ConfirmDiscard {
            self.reset();
        }
    }

    pub fn cancel_discard(&mut self) {
        if self.state == DialogState::ConfirmDiscard {
            self.state = DialogState::Open;
        }
    }

    fn reset(&mut self) {
        self.form = TaskForm::default();
        self.state = DialogState::Closed;
    }

    /// Checks every precondition in order; nothing goes over the wire unless
    /// all of them hold.
    fn validate(&self, session: &Session) -> Result<CreateTaskInput, TaskDialogError> {
        let organization_id = session
            .organization_id()
            .ok_or(TaskDialogError::NoOrganization)?;
        let created_by = session.user_id().ok_or(TaskDialogError::NoUser)?;
        let assignee_id = self.form.assignee.ok_or(TaskDialogError::NoAssignee)?;
        let project_id = self.project_id.ok_or(TaskDialogError::NoProject)?;

        Ok(CreateTaskInput {
            project_id,
            organization_id,
            title: self.form.title.clone(),
            description: String::new(),
            label: self.form.label,
            priority: self.form.priority,
            status: TaskStatus::Todo,
            assignee_id,
            created_by,
        })
    }

    /// Create the task. On success `refetch` runs, the form resets and the
    /// dialog closes; on failure the dialog stays open with the input intact.
    pub async fn submit<B, F>(
        &mut self,
        session: &Session,
        backend: &B,
        refetch: F,
    ) -> Result<Task, TaskDialogError>
    where
        B: Backend + ?Sized,
        F: FnOnce(),
    {
        if self.state != DialogState::Open {
            return Err(TaskDialogError::NotOpen);
        }
        let input = match self.validate(session) {
            Ok(input) => input,
            Err(error) => {
                tracing::warn!("Task creation rejected: {}", error);
                return Err(error);
            }
        };

        self.state = DialogState::Submitting;
        let result = {
            let _pending = PendingSubmit(&mut self.state);
            backend.create_task(input).await
        };
        match result {
            Ok(task) => {
                tracing::info!("Created task {} ({})", task.id, task.title);
                refetch();
                self.reset();
                Ok(task)
            }
            Err(error) => {
                tracing::error!("Error creating task: {}", error);
                Err(TaskDialogError::Remote(error))
            }
        }
    }
}
