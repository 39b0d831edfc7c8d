//! Client-side core for Taskboard: session state, the authenticated HTTP
//! transport, task access and the form/list state used by the front ends.
pub mod auth;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod forms;
pub mod refresh;
pub mod session;
pub mod task;
pub mod tasks;

pub use auth::{AuthService, Registration};
pub use client::{ApiClient, ApiRequest, ApiResponse, AuthPolicy, CookieSource};
pub use config::ClientConfig;
pub use credential::Credential;
pub use error::{ApiError, FieldErrors};
pub use forms::{
    FormPhase, LoginAction, LoginForm, RegisterAction, RegisterForm, TaskForm, TaskFormAction,
    TaskList, TaskListAction,
};
pub use refresh::RefreshState;
pub use session::{Destination, Session, SessionEvent, SessionStore, SignOutReason, User};
pub use task::{Page, Task, TaskDraft, TaskPriority, TaskQuery, TaskStatistics, TaskStatus, TaskSummary};
pub use tasks::TaskRepository;
