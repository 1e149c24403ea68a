//! Model-output extraction and validation.
//!
//! Turns the free-form text a model returns into a validated list of
//! [`TodoItem`]s:
//!
//! 1. Boundary scan: the candidate runs from the first `{` to the last `}`.
//! 2. Fence stripping: a leading ```` ```json ```` / ```` ``` ```` and a
//!    trailing ```` ``` ```` are removed.
//! 3. Strict JSON parse.
//! 4. Shape validation of the `todos` array, all-or-nothing.
//!
//! Known limitation: stray braces in prose around the JSON widen the
//! candidate and usually turn into a parse failure.
//!
//! Everything here is pure and synchronous.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use planner_core::{ExtractionResult, RawTodoItem, TodoItem};

/// Why model output could not be turned into to-do items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// No `{ ... }` span exists in the output.
    #[error("no JSON object found in model output")]
    NoJsonObject,

    /// A span was found but is not valid JSON or does not have the
    /// expected shape. `candidate` is the cleaned text that was parsed.
    #[error("malformed model output: {reason}")]
    Parse { reason: String, candidate: String },
}

impl ExtractionError {
    /// The cleaned candidate text, for parse failures.
    pub fn candidate(&self) -> Option<&str> {
        match self {
            ExtractionError::NoJsonObject => None,
            ExtractionError::Parse { candidate, .. } => Some(candidate),
        }
    }
}

impl From<ExtractionError> for planner_core::Error {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::NoJsonObject => planner_core::Error::Extraction(e.to_string()),
            ExtractionError::Parse { reason, candidate } => {
                planner_core::Error::Parse { reason, candidate }
            }
        }
    }
}

/// Return the span from the first `{` to the last `}` inclusive.
pub fn locate_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Trim whitespace and remove one Markdown code-fence opener and closer.
pub fn strip_code_fences(candidate: &str) -> &str {
    let trimmed = candidate.trim();
    let unopened = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    unopened.strip_suffix("```").unwrap_or(unopened).trim()
}

/// Extract the to-do items embedded in raw model output.
pub fn extract_todos(raw: &str) -> Result<Vec<TodoItem>, ExtractionError> {
    let candidate = locate_json_object(raw).ok_or_else(|| {
        debug!(
            subsystem = "extraction",
            op = "extract_todos",
            response_len = raw.len(),
            "No JSON object in model output"
        );
        ExtractionError::NoJsonObject
    })?;
    let cleaned = strip_code_fences(candidate);

    let value: Value =
        serde_json::from_str(cleaned).map_err(|e| parse_failure(e.to_string(), cleaned))?;
    let todos = validate_shape(value).map_err(|reason| parse_failure(reason, cleaned))?;

    debug!(
        subsystem = "extraction",
        op = "extract_todos",
        response_len = raw.len(),
        candidate_len = cleaned.len(),
        todo_count = todos.len(),
        "Extracted todos from model output"
    );
    Ok(todos)
}

/// Extract to-do items and wrap them with the message that produced them.
pub fn extract(message: &str, raw: &str) -> Result<ExtractionResult, ExtractionError> {
    let todos = extract_todos(raw)?;
    Ok(ExtractionResult::new(message, todos))
}

fn parse_failure(reason: String, candidate: &str) -> ExtractionError {
    warn!(
        subsystem = "extraction",
        op = "extract_todos",
        reason = %reason,
        candidate = %candidate,
        "Rejected model output"
    );
    ExtractionError::Parse {
        reason,
        candidate: candidate.to_string(),
    }
}

fn validate_shape(value: Value) -> Result<Vec<TodoItem>, String> {
    let mut object = match value {
        Value::Object(object) => object,
        other => return Err(format!("expected a JSON object, found {}", kind(&other))),
    };

    let elements = match object.remove("todos") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(elements)) => elements,
        Some(other) => {
            return Err(format!(
                "\"todos\" must be an array, found {}",
                kind(&other)
            ))
        }
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            validate_element(element).map_err(|reason| format!("todos[{index}]: {reason}"))
        })
        .collect()
}

fn validate_element(element: Value) -> Result<TodoItem, String> {
    // serde would otherwise accept a JSON array positionally.
    if !element.is_object() {
        return Err(format!("expected an object, found {}", kind(&element)));
    }
    let raw: RawTodoItem = serde_json::from_value(element).map_err(|e| e.to_string())?;
    TodoItem::try_from(raw).map_err(|e| e.to_string())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
