//! Form Parsing
//!
//! Decodes `application/x-www-form-urlencoded` bodies and validates the
//! task and reorder forms. Validation failures carry the submitted value
//! so it can be shown back for correction.

use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::domain::TaskDraft;

pub const TITLE_MAX_CHARS: usize = 200;

const REQUIRED: &str = "This field is required.";

/// A rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FormError {
    pub field: String,
    pub message: String,
    /// Raw value as submitted, if any
    pub submitted: Option<String>,
}

impl FormError {
    fn new(field: &str, message: impl Into<String>, submitted: Option<&str>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            submitted: submitted.map(str::to_string),
        }
    }
}

/// Decoded form fields in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    /// Parse a urlencoded body; `+` decodes to a space
    pub fn parse(body: &str) -> Self {
        let fields = body
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(name), decode(value))
            })
            .collect();
        Self { fields }
    }

    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// First value submitted for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// The reorder payload: task ids in their desired order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionForm {
    pub ids: Vec<u32>,
}

impl PositionForm {
    pub const FIELD: &'static str = "position";

    /// Accepts `"7,3,9"`; whitespace around ids is ignored, empty tokens
    /// and non-numeric tokens are rejected
    pub fn parse(form: &FormData) -> Result<Self, FormError> {
        let raw = form.get(Self::FIELD);
        let value = raw.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(FormError::new(Self::FIELD, REQUIRED, raw));
        }

        let ids = value
            .split(',')
            .map(|token| token.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| {
                FormError::new(
                    Self::FIELD,
                    "Enter a comma-separated list of task ids.",
                    raw,
                )
            })?;

        Ok(Self { ids })
    }
}

/// Title, description and completion flag of a task
pub struct TaskForm;

impl TaskForm {
    pub fn parse(form: &FormData) -> Result<TaskDraft, FormError> {
        let raw_title = form.get("title");
        let title = raw_title.map(str::trim).unwrap_or_default();
        if title.is_empty() {
            return Err(FormError::new("title", REQUIRED, raw_title));
        }
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(FormError::new(
                "title",
                format!("Ensure this value has at most {} characters.", TITLE_MAX_CHARS),
                raw_title,
            ));
        }

        Ok(TaskDraft {
            title: title.to_string(),
            description: form.get("description").map(str::trim).unwrap_or_default().to_string(),
            complete: checkbox(form.get("complete")),
        })
    }
}

/// Checkbox semantics: absent, empty or "false" (any case) is unchecked
fn checkbox(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(v) => !(v.is_empty() || v.eq_ignore_ascii_case("false")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_data_decodes() {
        let form = FormData::parse("position=7%2C3%2C9&title=Buy+milk&empty=&flag");
        assert_eq!(form.get("position"), Some("7,3,9"));
        assert_eq!(form.get("title"), Some("Buy milk"));
        assert_eq!(form.get("empty"), Some(""));
        assert_eq!(form.get("flag"), Some(""));
        assert_eq!(form.get("missing"), None);
    }

    #[test]
    fn test_form_data_first_value_wins() {
        let form = FormData::parse("a=1&a=2");
        assert_eq!(form.get("a"), Some("1"));
    }

    #[test]
    fn test_position_parses_ids() {
        let form = FormData::from_pairs([("position", "3,1,2")]);
        assert_eq!(PositionForm::parse(&form).unwrap().ids, vec![3, 1, 2]);

        let spaced = FormData::from_pairs([("position", " 3 , 1 ")]);
        assert_eq!(PositionForm::parse(&spaced).unwrap().ids, vec![3, 1]);
    }

    #[test]
    fn test_position_missing_or_empty() {
        let err = PositionForm::parse(&FormData::default()).unwrap_err();
        assert_eq!(err.field, "position");
        assert_eq!(err.submitted, None);

        let err = PositionForm::parse(&FormData::from_pairs([("position", "  ")])).unwrap_err();
        assert_eq!(err.message, REQUIRED);
    }

    #[test]
    fn test_position_rejects_malformed_tokens() {
        for bad in ["1,a,2", "1,,2", "1,2,", "-1", "1.5", "99999999999"] {
            let err = PositionForm::parse(&FormData::from_pairs([("position", bad)])).unwrap_err();
            assert_eq!(err.submitted.as_deref(), Some(bad), "input {bad}");
        }
    }

    #[test]
    fn test_task_form() {
        let form = FormData::from_pairs([
            ("title", " New task "),
            ("description", "New description"),
            ("complete", "on"),
        ]);
        let draft = TaskForm::parse(&form).unwrap();
        assert_eq!(draft.title, "New task");
        assert_eq!(draft.description, "New description");
        assert!(draft.complete);
    }

    #[test]
    fn test_task_form_checkbox_values() {
        assert!(!checkbox(None));
        assert!(!checkbox(Some("")));
        assert!(!checkbox(Some("False")));
        assert!(checkbox(Some("True")));
        assert!(checkbox(Some("1")));
    }

    #[test]
    fn test_task_form_title_rules() {
        let err = TaskForm::parse(&FormData::from_pairs([("title", "")])).unwrap_err();
        assert_eq!(err.field, "title");

        let long = "x".repeat(TITLE_MAX_CHARS + 1);
        let err = TaskForm::parse(&FormData::from_pairs([("title", long.as_str())])).unwrap_err();
        assert!(err.message.contains("200"));
    }
}
