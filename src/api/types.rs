use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque identity of a project, label, task or comment.
///
/// Older API versions sent 64-bit integers, current ones send strings. Both
/// deserialize into the same value so catalogs never care which version
/// produced the snapshot. The empty id doubles as the root sentinel for
/// top-level projects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The parent key shared by all top-level projects
    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for Id {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => Id::from(n),
            RawId::Text(s) => Id::from(s),
        }
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawId::deserialize(deserializer).map(Id::from)
    }
}

/// Deserialize a reference that may be absent: `null`, `""` and `0` all mean "none".
fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<Id>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(RawId::Number(0)) => None,
        Some(raw) => Some(Id::from(raw)).filter(|id| !id.is_root()),
    })
}

fn default_priority() -> u8 {
    1
}

/// Color key as sent by the service: a symbolic name (`"berry_red"`) or a
/// legacy numeric id in the 30..=49 range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorKey {
    Legacy(u32),
    Named(String),
}

impl Default for ColorKey {
    fn default() -> Self {
        ColorKey::Named(String::new())
    }
}

impl From<&str> for ColorKey {
    fn from(value: &str) -> Self {
        ColorKey::Named(value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Id,
    pub name: String,
    /// Ascending display rank among siblings
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub color: ColorKey,
    #[serde(
        default,
        alias = "parent",
        deserialize_with = "deserialize_optional_id"
    )]
    pub parent_id: Option<Id>,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_inbox_project: bool,
    #[serde(default)]
    pub url: Option<String>,
}

impl Project {
    /// Key of the child list this project belongs to
    pub fn parent_key(&self) -> Id {
        self.parent_id.clone().unwrap_or_else(Id::root)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub color: ColorKey,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Due information attached to a task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Due {
    /// Calendar date (`YYYY-MM-DD`) in the user's timezone
    pub date: Option<String>,
    /// Human-readable due text, e.g. "every monday"
    pub string: Option<String>,
    /// Exact due time, only present for tasks with a time of day
    pub datetime: Option<DateTime<Utc>>,
    pub timezone: Option<String>,
    #[serde(alias = "recurring")]
    pub is_recurring: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Id,
    pub project_id: Id,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub section_id: Option<Id>,
    #[serde(
        default,
        alias = "parent",
        deserialize_with = "deserialize_optional_id"
    )]
    pub parent_id: Option<Id>,
    pub content: String,
    #[serde(default)]
    pub description: String,
    /// Raw priority, 1 (normal) through 4 (urgent)
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub label_ids: Vec<Id>,
    #[serde(default)]
    pub due: Option<Due>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default, alias = "created")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn has_label(&self, label_id: &Id) -> bool {
        self.label_ids.contains(label_id)
    }

    /// Due calendar date, treating an empty string as absent
    pub fn due_date(&self) -> Option<&str> {
        self.due
            .as_ref()
            .and_then(|due| due.date.as_deref())
            .filter(|date| !date.is_empty())
    }

    /// Human-readable due text, empty when the task has none
    pub fn due_text(&self) -> &str {
        self.due
            .as_ref()
            .and_then(|due| due.string.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub file_url: Option<String>,
    pub resource_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Id,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub task_id: Option<Id>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub project_id: Option<Id>,
    #[serde(default, alias = "posted")]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

/// What a comment listing is attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentTarget {
    Task(Id),
    Project(Id),
}

/// Parameters forwarded to the task endpoint.
///
/// `filter` is a service-side filter expression; it is passed through as is
/// and never evaluated locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub project_id: Option<Id>,
    pub label: Option<String>,
    pub filter: Option<String>,
    pub ids: Vec<Id>,
}

impl TaskQuery {
    pub fn is_empty(&self) -> bool {
        self.project_id.is_none()
            && self.label.is_none()
            && self.filter.is_none()
            && self.ids.is_empty()
    }

    /// Query string pairs in the form the REST endpoint expects
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(project_id) = &self.project_id {
            pairs.push(("project_id", project_id.to_string()));
        }
        if let Some(label) = &self.label {
            pairs.push(("label", label.clone()));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.clone()));
        }
        if !self.ids.is_empty() {
            let ids: Vec<&str> = self.ids.iter().map(Id::as_str).collect();
            pairs.push(("ids", ids.join(",")));
        }
        pairs
    }
}

/// Errors produced while talking to a task source
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported request: {0}")]
    Unsupported(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_accepts_numbers_and_strings() {
        let from_number: Id = serde_json::from_str("2203306141").unwrap();
        let from_text: Id = serde_json::from_str("\"2203306141\"").unwrap();
        assert_eq!(from_number, from_text);
        assert_eq!(from_number.as_str(), "2203306141");
    }

    #[test]
    fn test_parent_zero_and_null_mean_root() {
        let legacy: Project =
            serde_json::from_str(r#"{"id": 1, "name": "Inbox", "parent": 0, "order": 0, "color": 47}"#)
                .unwrap();
        assert_eq!(legacy.parent_id, None);
        assert_eq!(legacy.color, ColorKey::Legacy(47));

        let current: Project = serde_json::from_str(
            r#"{"id": "2", "name": "Work", "parent_id": null, "order": 1, "color": "red"}"#,
        )
        .unwrap();
        assert_eq!(current.parent_id, None);
        assert!(current.parent_key().is_root());

        let child: Project =
            serde_json::from_str(r#"{"id": "3", "name": "Ops", "parent_id": "2"}"#).unwrap();
        assert_eq!(child.parent_key(), Id::from("2"));
    }

    #[test]
    fn test_task_defaults() {
        let task: Task =
            serde_json::from_str(r#"{"id": "7", "project_id": "2", "content": "Write report"}"#)
                .unwrap();
        assert_eq!(task.priority, 1);
        assert!(task.label_ids.is_empty());
        assert_eq!(task.due, None);
        assert_eq!(task.due_date(), None);
        assert_eq!(task.due_text(), "");
    }

    #[test]
    fn test_task_due_null_and_empty_date() {
        let task: Task = serde_json::from_str(
            r#"{"id": "7", "project_id": "2", "content": "x", "due": null}"#,
        )
        .unwrap();
        assert!(task.due.is_none());

        let task: Task = serde_json::from_str(
            r#"{"id": "7", "project_id": "2", "content": "x", "due": {"date": "", "string": "someday"}}"#,
        )
        .unwrap();
        assert_eq!(task.due_date(), None);
        assert_eq!(task.due_text(), "someday");
    }

    #[test]
    fn test_task_query_pairs() {
        let query = TaskQuery {
            project_id: Some(Id::from("42")),
            label: Some("errand".to_string()),
            filter: Some("today | overdue".to_string()),
            ids: vec![Id::from("1"), Id::from("2")],
        };
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("project_id", "42".to_string()),
                ("label", "errand".to_string()),
                ("filter", "today | overdue".to_string()),
                ("ids", "1,2".to_string()),
            ]
        );
        assert!(TaskQuery::default().is_empty());
        assert!(TaskQuery::default().to_query_pairs().is_empty());
    }
}
