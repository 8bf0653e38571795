//! HTTP implementation of [`TaskSource`] for the Todoist REST API
//!
//! Every request is a bearer-authenticated `GET` under the configured base URL.
//! Response bodies are read as text and decoded with `serde_json`, so a
//! malformed payload surfaces as [`ApiError::Decode`] rather than as a
//! transport error.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use tdreport::api::{TaskQuery, TodoistClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TodoistClient::new(
//!         "https://api.todoist.com/rest/v2",
//!         "0123456789abcdef",
//!         Duration::from_secs(30),
//!     )?;
//!     let tasks = client.get_active_tasks(&TaskQuery::default()).await?;
//!     println!("{} active tasks", tasks.len());
//!     Ok(())
//! }
//! ```

use crate::api::source::TaskSource;
use crate::api::types::{
    ApiError, Comment, CommentTarget, Id, Label, Project, Task, TaskQuery,
};
use futures::future::BoxFuture;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Client for the Todoist REST API
pub struct TodoistClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl TodoistClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, ApiError> {
        if token.trim().is_empty() {
            return Err(ApiError::Authentication(
                "an API token is required".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tdreport/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            token: token.trim().to_string(),
        })
    }

    /// Parse the base URL and make sure its path ends with `/` so relative
    /// joins append to it instead of replacing the last segment.
    fn normalize_base_url(base_url: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(base_url)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of an endpoint path such as `/projects`
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Authentication(format!(
                "{} rejected the token ({})",
                path, status
            )));
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!("{} returned {} bytes", path, body.len());
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            context: path.to_string(),
            source,
        })
    }

    /// All user projects
    pub async fn get_all_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_json("/projects", &[]).await
    }

    pub async fn get_project(&self, id: &Id) -> Result<Project, ApiError> {
        self.get_json(&format!("/projects/{}", id), &[]).await
    }

    /// All personal labels
    pub async fn get_all_labels(&self) -> Result<Vec<Label>, ApiError> {
        self.get_json("/labels", &[]).await
    }

    pub async fn get_label(&self, id: &Id) -> Result<Label, ApiError> {
        self.get_json(&format!("/labels/{}", id), &[]).await
    }

    /// Names of labels shared with the user through collaboration
    pub async fn get_shared_labels(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("/labels/shared", &[]).await
    }

    pub async fn get_active_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, ApiError> {
        self.get_json("/tasks", &query.to_query_pairs()).await
    }

    pub async fn get_active_task(&self, id: &Id) -> Result<Task, ApiError> {
        self.get_json(&format!("/tasks/{}", id), &[]).await
    }

    pub async fn get_comments(&self, target: &CommentTarget) -> Result<Vec<Comment>, ApiError> {
        let query = match target {
            CommentTarget::Task(id) => [("task_id", id.to_string())],
            CommentTarget::Project(id) => [("project_id", id.to_string())],
        };
        self.get_json("/comments", &query).await
    }
}

impl TaskSource for TodoistClient {
    fn fetch_projects(&self) -> BoxFuture<'_, Result<Vec<Project>, ApiError>> {
        Box::pin(self.get_all_projects())
    }

    fn fetch_labels(&self) -> BoxFuture<'_, Result<Vec<Label>, ApiError>> {
        Box::pin(self.get_all_labels())
    }

    fn fetch_tasks<'a>(
        &'a self,
        query: &'a TaskQuery,
    ) -> BoxFuture<'a, Result<Vec<Task>, ApiError>> {
        Box::pin(self.get_active_tasks(query))
    }

    fn source_name(&self) -> &'static str {
        "todoist"
    }
}
