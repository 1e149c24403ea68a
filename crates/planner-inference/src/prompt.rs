//! Extraction prompt template.

use chrono::NaiveDate;

/// System message sent alongside every extraction prompt.
pub const SYSTEM_PROMPT: &str =
    "You are a scheduling assistant that turns notes into to-do items. You answer with JSON only.";

/// Render the extraction prompt for `message`, resolving relative dates
/// against `today`.
///
/// The message is substituted verbatim in a single pass, so braces or
/// placeholder-like text inside it are never re-interpreted.
pub fn build_prompt(message: &str, today: NaiveDate) -> String {
    let today = today.format("%Y-%m-%d");
    format!(
        r#"Extract every to-do item from the user's message below.

Today's date is {today}. Resolve relative dates such as "tomorrow" or
"next Monday" against today's date.

Respond with a single JSON object and nothing else, in exactly this shape:
{{
  "todos": [
    {{
      "title": "short imperative summary (required)",
      "description": "extra detail, or null",
      "due_date": "YYYY-MM-DD, or null",
      "due_time": "HH:MM in 24-hour time, or null",
      "location": "place, or null",
      "priority": "low" | "medium" | "high",
      "status": false
    }}
  ]
}}

Rules:
- Create one item per distinct task, in the order they appear in the message.
- Use JSON null (not the string "null") for anything the message does not say.
- Use "medium" priority unless the message signals urgency or lack of it.
- "status" is always false for new items.
- If the message contains no tasks, respond with {{"todos": []}}.

Example
Today's date: 2024-05-20
Message: Finish the report at the office by 10am tomorrow, team meeting at 3pm, and buy groceries in the evening.
Response:
{{
  "todos": [
    {{"title": "Finish the report", "description": null, "due_date": "2024-05-21", "due_time": "10:00", "location": "office", "priority": "high", "status": false}},
    {{"title": "Team meeting", "description": null, "due_date": "2024-05-21", "due_time": "15:00", "location": null, "priority": "medium", "status": false}},
    {{"title": "Buy groceries", "description": null, "due_date": "2024-05-21", "due_time": "18:00", "location": null, "priority": "low", "status": false}}
  ]
}}

Message: {message}
Response:
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_prompt_contains_message_and_date() {
        let prompt = build_prompt("call the dentist tomorrow", today());
        assert!(prompt.contains("Message: call the dentist tomorrow\n"));
        assert!(prompt.contains("Today's date is 2026-10-18."));
    }

    #[test]
    fn test_prompt_embeds_braces_verbatim() {
        let message = r#"fix {today} and {message} and {"todos": []} and }}{{"#;
        let prompt = build_prompt(message, today());
        assert!(prompt.contains(message));
        // The real date is still substituted exactly once in its slot.
        assert_eq!(prompt.matches("Today's date is 2026-10-18.").count(), 1);
    }

    #[test]
    fn test_prompt_empty_message() {
        let prompt = build_prompt("", today());
        assert!(prompt.ends_with("Message: \nResponse:\n"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_prompt("x", today()), build_prompt("x", today()));
    }

    #[test]
    fn test_prompt_renders_literal_json_example() {
        let prompt = build_prompt("x", today());
        assert!(prompt.contains(r#"{"todos": []}"#));
        assert!(prompt.contains(r#""title": "Team meeting""#));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_prompt_worked_example_is_extractable() {
        // The example response in the template must itself pass extraction.
        let prompt = build_prompt("x", today());
        let start = prompt.find("Response:\n").unwrap() + "Response:\n".len();
        let end = prompt.rfind("\n\nMessage:").unwrap();
        let todos = crate::extract_todos(&prompt[start..end]).unwrap();
        assert_eq!(todos.len(), 3);
        assert_eq!(todos[1].due_time.as_deref(), Some("15:00"));
    }
}
