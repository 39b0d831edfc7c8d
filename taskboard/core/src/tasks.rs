use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::task::{Page, Task, TaskDraft, TaskQuery, TaskStatistics, TaskSummary};

pub const TASKS_PATH: &str = "/api/tasks/";
pub const SUMMARY_PATH: &str = "/api/tasks/summary/";
pub const STATISTICS_PATH: &str = "/api/tasks/statistics/";

fn task_path(id: u64) -> String {
    format!("{TASKS_PATH}{id}/")
}

/// Task CRUD against the API. Every call is authenticated.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    client: ApiClient,
}

impl TaskRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// One page of tasks; `page` starts at 1.
    pub async fn list(&self, page: u32, page_size: u32) -> Result<Page<Task>, ApiError> {
        self.query(&TaskQuery::page(page, page_size)).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn query(&self, query: &TaskQuery) -> Result<Page<Task>, ApiError> {
        self.client
            .send(ApiRequest::get(TASKS_PATH).query(query.to_pairs()))
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: u64) -> Result<Task, ApiError> {
        self.client.send(ApiRequest::get(task_path(id))).await
    }

    /// Creates a task. A blank title is rejected before any request is made.
    #[tracing::instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        draft.validate().map_err(ApiError::InvalidInput)?;
        self.client
            .send(ApiRequest::post(TASKS_PATH).json(draft)?)
            .await
    }

    /// Replaces the writable fields of task `id`.
    #[tracing::instrument(skip(self, draft))]
    pub async fn update(&self, id: u64, draft: &TaskDraft) -> Result<Task, ApiError> {
        draft.validate().map_err(ApiError::InvalidInput)?;
        self.client
            .send(ApiRequest::put(task_path(id)).json(draft)?)
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.client.send_empty(ApiRequest::delete(task_path(id))).await
    }

    pub async fn summary(&self) -> Result<TaskSummary, ApiError> {
        self.client.send(ApiRequest::get(SUMMARY_PATH)).await
    }

    pub async fn statistics(&self) -> Result<TaskStatistics, ApiError> {
        self.client.send(ApiRequest::get(STATISTICS_PATH)).await
    }
}
