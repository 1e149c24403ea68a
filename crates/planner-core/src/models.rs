//! Core data models for smart-planner.
//!
//! These types are shared across all smart-planner crates: the to-do records
//! produced by extraction, their persisted form, and the account types used by
//! the authentication endpoints.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::defaults;

// =============================================================================
// TODO TYPES
// =============================================================================

/// Importance of a to-do item.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TodoValidationError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(TodoValidationError::InvalidPriority(s.to_string())),
        }
    }
}

/// Reasons a to-do element is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("invalid priority '{0}': expected low, medium or high")]
    InvalidPriority(String),
}

/// A single structured to-do item.
///
/// `title` is always present and non-blank. Every other field is independently
/// optional; `None` is written as JSON `null` on the wire. The literal string
/// `"null"` is ordinary data and is preserved as such.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct TodoItem {
    pub title: String,
    pub description: Option<String>,
    /// ISO date (`YYYY-MM-DD`) as produced by the model.
    pub due_date: Option<String>,
    /// 24-hour `HH:MM`.
    pub due_time: Option<String>,
    pub location: Option<String>,
    pub priority: Priority,
    /// `true` once the item is completed.
    pub status: bool,
}

impl TodoItem {
    /// Create an incomplete, medium-priority item with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            due_time: None,
            location: None,
            priority: Priority::default(),
            status: false,
        }
    }
}

/// Loosely-typed inbound shape of a to-do element.
///
/// Older clients send `event_date`/`event_time`; those fill in `due_date`/
/// `due_time` only when the canonical key is missing. Unknown fields are
/// ignored. Convert with `TodoItem::try_from` to apply validation and defaults.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct RawTodoItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub due_time: Option<String>,
    /// Deprecated spelling of `due_date`.
    #[serde(default)]
    pub event_date: Option<String>,
    /// Deprecated spelling of `due_time`.
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<bool>,
}

impl TryFrom<RawTodoItem> for TodoItem {
    type Error = TodoValidationError;

    fn try_from(raw: RawTodoItem) -> Result<Self, Self::Error> {
        let title = raw.title.ok_or(TodoValidationError::MissingTitle)?;
        if title.trim().is_empty() {
            return Err(TodoValidationError::EmptyTitle);
        }

        let priority = match raw.priority {
            Some(p) => p.parse()?,
            None => Priority::default(),
        };

        Ok(TodoItem {
            title,
            description: raw.description,
            due_date: raw.due_date.or(raw.event_date),
            due_time: raw.due_time.or(raw.event_time),
            location: raw.location,
            priority,
            status: raw.status.unwrap_or(false),
        })
    }
}

impl<'de> Deserialize<'de> for TodoItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawTodoItem::deserialize(deserializer)?;
        TodoItem::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Outcome of one extraction request.
///
/// Immutable once built; `todo_count` always equals `todos.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ExtractionResult {
    original_message: String,
    todos: Vec<TodoItem>,
    todo_count: usize,
}

impl ExtractionResult {
    pub fn new(original_message: impl Into<String>, todos: Vec<TodoItem>) -> Self {
        let todo_count = todos.len();
        Self {
            original_message: original_message.into(),
            todos,
            todo_count,
        }
    }

    pub fn original_message(&self) -> &str {
        &self.original_message
    }

    /// Items in the order the model returned them.
    pub fn todos(&self) -> &[TodoItem] {
        &self.todos
    }

    pub fn todo_count(&self) -> usize {
        self.todo_count
    }

    pub fn into_todos(self) -> Vec<TodoItem> {
        self.todos
    }
}

impl<'de> Deserialize<'de> for ExtractionResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // The count on the wire is derived data; recompute it.
        #[derive(Deserialize)]
        struct Wire {
            original_message: String,
            #[serde(default)]
            todos: Vec<TodoItem>,
        }

        let wire = Wire::deserialize(deserializer)?;
        Ok(ExtractionResult::new(wire.original_message, wire.todos))
    }
}

/// A to-do item saved for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StoredTodo {
    pub id: Uuid,
    pub user_id: Uuid,
    /// 0-based index within the saved batch.
    pub position: i32,
    #[serde(flatten)]
    pub item: TodoItem,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// AUTH TYPES
// =============================================================================

/// A registered account. The password hash never leaves the database layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check a username against the allowed length and character set
    /// (`[A-Za-z0-9_.-]`).
    pub fn validate_username(username: &str) -> Result<(), String> {
        let len = username.chars().count();
        if !(defaults::USERNAME_MIN_LEN..=defaults::USERNAME_MAX_LEN).contains(&len) {
            return Err(format!(
                "username must be between {} and {} characters",
                defaults::USERNAME_MIN_LEN,
                defaults::USERNAME_MAX_LEN
            ));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(
                "username may only contain letters, digits, '_', '.' and '-'".to_string(),
            );
        }
        Ok(())
    }
}

/// Credentials submitted to the register and token endpoints.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A freshly issued access token. The plaintext is only available here.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `"Bearer"`.
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
}

impl TokenResponse {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// Stored metadata for an issued access token.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccessToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

/// The authenticated identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPrincipal {
    User { user_id: Uuid, username: String },
    Anonymous,
}

impl AuthPrincipal {
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AuthPrincipal::Anonymous)
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AuthPrincipal::User { user_id, .. } => Some(*user_id),
            AuthPrincipal::Anonymous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_priority_parse_case_insensitive() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" Low ".parse::<Priority>().unwrap(), Priority::Low);
        assert_eq!("medium".parse::<Priority>().unwrap(), Priority::Medium);
        assert!(matches!(
            "urgent".parse::<Priority>(),
            Err(TodoValidationError::InvalidPriority(p)) if p == "urgent"
        ));
    }

    #[test]
    fn test_priority_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Priority::High).unwrap(), json!("high"));
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_todo_item_defaults() {
        let item: TodoItem = serde_json::from_value(json!({"title": "Buy milk"})).unwrap();
        assert_eq!(item, TodoItem::new("Buy milk"));
    }

    #[test]
    fn test_todo_item_nulls_are_absent() {
        let item: TodoItem = serde_json::from_value(json!({
            "title": "Dentist",
            "description": null,
            "due_date": null,
            "due_time": null,
            "location": null,
            "priority": null,
            "status": null
        }))
        .unwrap();
        assert_eq!(item, TodoItem::new("Dentist"));
    }

    #[test]
    fn test_todo_item_null_string_is_data() {
        let item: TodoItem =
            serde_json::from_value(json!({"title": "x", "due_date": "null"})).unwrap();
        assert_eq!(item.due_date.as_deref(), Some("null"));

        let wire = serde_json::to_value(&item).unwrap();
        assert_eq!(wire["due_date"], json!("null"));
    }

    #[test]
    fn test_todo_item_missing_title_rejected() {
        let err = serde_json::from_value::<TodoItem>(json!({"description": "no title"}))
            .unwrap_err();
        assert!(err.to_string().contains("title is required"));
    }

    #[test]
    fn test_todo_item_blank_title_rejected() {
        let raw = RawTodoItem {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            TodoItem::try_from(raw).unwrap_err(),
            TodoValidationError::EmptyTitle
        );
    }

    #[test]
    fn test_todo_item_aliases() {
        let item: TodoItem = serde_json::from_value(json!({
            "title": "Standup",
            "event_date": "2026-03-02",
            "event_time": "09:30"
        }))
        .unwrap();
        assert_eq!(item.due_date.as_deref(), Some("2026-03-02"));
        assert_eq!(item.due_time.as_deref(), Some("09:30"));

        let wire = serde_json::to_value(&item).unwrap();
        assert_eq!(wire["due_date"], json!("2026-03-02"));
        assert!(wire.get("event_date").is_none());
    }

    #[test]
    fn test_canonical_key_wins_over_legacy_and_extra_keys() {
        let item: TodoItem = serde_json::from_value(json!({
            "title": "Dentist",
            "due_date": "2026-10-19",
            "date": "Monday",
            "event_date": "2026-10-20",
            "due_time": "10:00",
            "time": "morning"
        }))
        .unwrap();
        assert_eq!(item.due_date.as_deref(), Some("2026-10-19"));
        assert_eq!(item.due_time.as_deref(), Some("10:00"));
    }

    #[test]
    fn test_date_and_time_keys_are_not_aliases() {
        let item: TodoItem =
            serde_json::from_value(json!({"title": "x", "date": "Monday", "time": "noon"}))
                .unwrap();
        assert!(item.due_date.is_none());
        assert!(item.due_time.is_none());
    }

    #[test]
    fn test_todo_item_ignores_unknown_fields() {
        let item: TodoItem =
            serde_json::from_value(json!({"title": "x", "category": "errands"})).unwrap();
        assert_eq!(item.title, "x");
    }

    #[test]
    fn test_todo_item_serializes_none_as_null() {
        let wire = serde_json::to_value(TodoItem::new("x")).unwrap();
        assert_eq!(
            wire,
            json!({
                "title": "x",
                "description": null,
                "due_date": null,
                "due_time": null,
                "location": null,
                "priority": "medium",
                "status": false
            })
        );
    }

    #[test]
    fn test_extraction_result_count_is_derived() {
        let result = ExtractionResult::new("msg", vec![TodoItem::new("a"), TodoItem::new("b")]);
        assert_eq!(result.todo_count(), 2);
        assert_eq!(result.original_message(), "msg");

        let wire = serde_json::to_value(&result).unwrap();
        assert_eq!(wire["todo_count"], json!(2));
    }

    #[test]
    fn test_extraction_result_wire_round_trip() {
        let mut item = TodoItem::new("Call mom");
        item.due_date = Some("2026-10-19".to_string());
        item.priority = Priority::High;
        let result = ExtractionResult::new("call mom tomorrow", vec![item, TodoItem::new("x")]);

        let wire = serde_json::to_string(&result).unwrap();
        let back: ExtractionResult = serde_json::from_str(&wire).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_extraction_result_ignores_wire_count() {
        let back: ExtractionResult = serde_json::from_value(json!({
            "original_message": "m",
            "todos": [{"title": "a"}],
            "todo_count": 7
        }))
        .unwrap();
        assert_eq!(back.todo_count(), 1);
    }

    #[test]
    fn test_stored_todo_flattens_item() {
        let stored = StoredTodo {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            position: 0,
            item: TodoItem::new("x"),
            created_at: Utc::now(),
        };
        let wire = serde_json::to_value(&stored).unwrap();
        assert_eq!(wire["title"], json!("x"));
        assert_eq!(wire["position"], json!(0));
    }

    #[test]
    fn test_validate_username() {
        assert!(User::validate_username("alice").is_ok());
        assert!(User::validate_username("a.b-c_1").is_ok());
        assert!(User::validate_username("ab").is_err());
        assert!(User::validate_username(&"a".repeat(65)).is_err());
        assert!(User::validate_username("bad name").is_err());
        assert!(User::validate_username("émile").is_err());
    }

    #[test]
    fn test_auth_principal() {
        let id = Uuid::nil();
        let user = AuthPrincipal::User {
            user_id: id,
            username: "alice".to_string(),
        };
        assert!(user.is_authenticated());
        assert_eq!(user.user_id(), Some(id));
        assert!(!AuthPrincipal::Anonymous.is_authenticated());
        assert_eq!(AuthPrincipal::Anonymous.user_id(), None);
    }

    #[test]
    fn test_token_response_bearer() {
        let t = TokenResponse::bearer("sp_at_x".to_string(), 3600);
        assert_eq!(t.token_type, "Bearer");
        assert_eq!(t.expires_in, 3600);
    }
}
