//! Form and list state as plain values with pure transition functions.
//!
//! A view keeps one of these in a signal, sends it actions with `reduce`, and
//! starts the network call when the state reaches [`FormPhase::Submitting`].

use chrono::NaiveDate;

use crate::auth::Registration;
use crate::error::FieldErrors;
use crate::task::{DATE_FORMAT, Page, Task, TaskDraft, TaskPriority, TaskStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
    Succeeded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub errors: FieldErrors,
    pub phase: FormPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    SetEmail(String),
    SetPassword(String),
    Submit,
    Succeeded,
    Failed(FieldErrors),
}

impl LoginForm {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn reduce(self, action: LoginAction) -> Self {
        match action {
            LoginAction::SetEmail(email) => Self {
                email,
                errors: without_field(self.errors, "email"),
                ..self
            },
            LoginAction::SetPassword(password) => Self {
                password,
                errors: without_field(self.errors, "password"),
                ..self
            },
            LoginAction::Submit => {
                let mut errors = FieldErrors::new();
                if self.email.trim().is_empty() {
                    errors.add("email", "Email is required.");
                }
                if self.password.is_empty() {
                    errors.add("password", "Password is required.");
                }
                Self {
                    phase: phase_after(&errors),
                    errors,
                    ..self
                }
            }
            LoginAction::Succeeded => Self {
                password: String::new(),
                errors: FieldErrors::new(),
                phase: FormPhase::Succeeded,
                ..self
            },
            LoginAction::Failed(errors) => Self {
                password: String::new(),
                errors,
                phase: FormPhase::Editing,
                ..self
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub registration: Registration,
    pub errors: FieldErrors,
    pub phase: FormPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterAction {
    SetEmail(String),
    SetUsername(String),
    SetPassword(String),
    SetPasswordConfirmation(String),
    Submit,
    Succeeded,
    Failed(FieldErrors),
}

impl RegisterForm {
    #[must_use]
    pub fn reduce(self, action: RegisterAction) -> Self {
        let Self {
            mut registration,
            errors,
            phase,
        } = self;
        let (registration, errors, phase) = match action {
            RegisterAction::SetEmail(email) => {
                registration.email = email;
                (registration, without_field(errors, "email"), phase)
            }
            RegisterAction::SetUsername(username) => {
                registration.username = username;
                (registration, without_field(errors, "username"), phase)
            }
            RegisterAction::SetPassword(password) => {
                registration.password = password;
                (registration, without_field(errors, "password"), phase)
            }
            RegisterAction::SetPasswordConfirmation(password2) => {
                registration.password2 = password2;
                (registration, without_field(errors, "password2"), phase)
            }
            RegisterAction::Submit => match registration.validate() {
                Ok(()) => (registration, FieldErrors::new(), FormPhase::Submitting),
                Err(errors) => (registration, errors, FormPhase::Editing),
            },
            RegisterAction::Succeeded => (
                Registration {
                    password: String::new(),
                    password2: String::new(),
                    ..registration
                },
                FieldErrors::new(),
                FormPhase::Succeeded,
            ),
            RegisterAction::Failed(errors) => (registration, errors, FormPhase::Editing),
        };
        Self {
            registration,
            errors,
            phase,
        }
    }
}

/// Raw input of the create/edit task form. Dates stay strings until submit
/// so half-typed values survive re-renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    /// Id of the task being edited, `None` when creating.
    pub editing: Option<u64>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: String,
    pub due_date: String,
    pub errors: FieldErrors,
    pub phase: FormPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFormAction {
    Load(Task),
    SetTitle(String),
    SetDescription(String),
    SetStatus(TaskStatus),
    SetPriority(TaskPriority),
    SetCategory(String),
    SetDueDate(String),
    Submit,
    Succeeded(Task),
    Failed(FieldErrors),
    Reset,
}

impl TaskForm {
    pub fn for_task(task: &Task) -> Self {
        Self::default().reduce(TaskFormAction::Load(task.clone()))
    }

    #[must_use]
    pub fn reduce(self, action: TaskFormAction) -> Self {
        match action {
            TaskFormAction::Load(task) => Self::loaded(task, FormPhase::Editing),
            TaskFormAction::Succeeded(task) => Self::loaded(task, FormPhase::Succeeded),
            TaskFormAction::SetTitle(title) => Self {
                title,
                errors: without_field(self.errors, "title"),
                ..self
            },
            TaskFormAction::SetDescription(description) => Self {
                description,
                errors: without_field(self.errors, "description"),
                ..self
            },
            TaskFormAction::SetStatus(status) => Self {
                status,
                errors: without_field(self.errors, "status"),
                ..self
            },
            TaskFormAction::SetPriority(priority) => Self {
                priority,
                errors: without_field(self.errors, "priority"),
                ..self
            },
            TaskFormAction::SetCategory(category) => Self {
                category,
                errors: without_field(self.errors, "category"),
                ..self
            },
            TaskFormAction::SetDueDate(due_date) => Self {
                due_date,
                errors: without_field(self.errors, "due_date"),
                ..self
            },
            TaskFormAction::Submit => {
                let errors = self.draft().err().unwrap_or_default();
                Self {
                    phase: phase_after(&errors),
                    errors,
                    ..self
                }
            }
            TaskFormAction::Failed(errors) => Self {
                errors,
                phase: FormPhase::Editing,
                ..self
            },
            TaskFormAction::Reset => match self.editing {
                Some(id) => Self {
                    editing: Some(id),
                    ..Self::default()
                },
                None => Self::default(),
            },
        }
    }

    fn loaded(task: Task, phase: FormPhase) -> Self {
        Self {
            editing: Some(task.id),
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            category: task.category,
            due_date: task
                .due_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            errors: FieldErrors::new(),
            phase,
        }
    }

    /// The request body for this form, or the problems preventing one.
    pub fn draft(&self) -> Result<TaskDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let due_date = match self.due_date.trim() {
            "" => None,
            raw => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add("due_date", "Enter a valid date (YYYY-MM-DD).");
                    None
                }
            },
        };
        let draft = TaskDraft {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            category: self.category.trim().to_string(),
            due_date,
        };
        if let Err(title_errors) = draft.validate() {
            for (field, messages) in title_errors.fields {
                for message in messages {
                    errors.add(field.clone(), message);
                }
            }
        }
        if errors.is_empty() { Ok(draft) } else { Err(errors) }
    }
}

/// Rows shown on the task list page plus the delete confirmation flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskList {
    pub tasks: Vec<Task>,
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    /// Task whose delete confirmation dialog is open.
    pub confirming: Option<u64>,
    /// Task whose delete request is in flight.
    pub deleting: Option<u64>,
    pub error: Option<String>,
}

impl Default for TaskList {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            count: 0,
            page: 1,
            page_size: crate::config::DEFAULT_PAGE_SIZE,
            confirming: None,
            deleting: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListAction {
    Loaded { page: u32, page_size: u32, data: Page<Task> },
    LoadFailed(String),
    RequestDelete(u64),
    CancelDelete,
    ConfirmDelete,
    Deleted(u64),
    DeleteFailed(String),
}

impl TaskList {
    #[must_use]
    pub fn reduce(self, action: TaskListAction) -> Self {
        match action {
            TaskListAction::Loaded {
                page,
                page_size,
                data,
            } => Self {
                tasks: data.results,
                count: data.count,
                page,
                page_size,
                error: None,
                ..self
            },
            TaskListAction::LoadFailed(message) => Self {
                error: Some(message),
                ..self
            },
            TaskListAction::RequestDelete(id) if self.deleting.is_none() => Self {
                confirming: Some(id),
                ..self
            },
            TaskListAction::RequestDelete(_) => self,
            TaskListAction::CancelDelete => Self {
                confirming: None,
                ..self
            },
            TaskListAction::ConfirmDelete => Self {
                deleting: self.confirming.or(self.deleting),
                confirming: None,
                error: None,
                ..self
            },
            TaskListAction::Deleted(id) => {
                let before = self.tasks.len();
                let tasks: Vec<Task> = self.tasks.into_iter().filter(|task| task.id != id).collect();
                let removed = (before - tasks.len()) as u64;
                let page = if tasks.is_empty() && self.page > 1 {
                    self.page - 1
                } else {
                    self.page
                };
                Self {
                    tasks,
                    count: self.count.saturating_sub(removed.max(1)),
                    page,
                    deleting: None,
                    ..self
                }
            }
            TaskListAction::DeleteFailed(message) => Self {
                deleting: None,
                error: Some(message),
                ..self
            },
        }
    }

    pub fn total_pages(&self) -> u32 {
        let page_size = u64::from(self.page_size.max(1));
        u32::try_from(self.count.div_ceil(page_size).max(1)).unwrap_or(u32::MAX)
    }

    pub fn confirming_task(&self) -> Option<&Task> {
        let id = self.confirming?;
        self.tasks.iter().find(|task| task.id == id)
    }
}

fn without_field(mut errors: FieldErrors, field: &str) -> FieldErrors {
    errors.clear_field(field);
    errors
}

/// `Submitting` when local checks passed, otherwise back to `Editing`.
fn phase_after(errors: &FieldErrors) -> FormPhase {
    if errors.is_empty() {
        FormPhase::Submitting
    } else {
        FormPhase::Editing
    }
}
