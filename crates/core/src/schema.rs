//! Structural validation of the incoming question payload.
//!
//! Works on raw JSON rather than a serde derive so the failure messages stay
//! exactly what the response backend and its dashboards expect.

use serde_json::Value;

use crate::error::{SurveyError, SurveyResult};
use crate::types::{QuestionKind, QuestionSpec, SurveyPayload};

/// Message for a missing or non-array `questions` field. Also used when a
/// survey would otherwise start with zero questions.
pub const MISSING_QUESTIONS: &str = "Survey data must include questions";
pub const MISSING_TEXT: &str = "Survey questions must include a `text` field";
pub const MISSING_TYPE: &str = "Survey questions must include a `type` field";

/// Validates the payload's question list. All-or-nothing: the first
/// violation, in position order, aborts the whole survey. Pure check, no
/// side effects.
pub fn validate(payload: &Value) -> SurveyResult<Vec<QuestionSpec>> {
    let questions = match payload.get("questions").and_then(Value::as_array) {
        Some(items) => items,
        None => return Err(SurveyError::Schema(MISSING_QUESTIONS.to_string())),
    };

    let mut specs = Vec::with_capacity(questions.len());
    for raw in questions {
        specs.push(validate_question(raw)?);
    }
    Ok(specs)
}

fn validate_question(raw: &Value) -> SurveyResult<QuestionSpec> {
    let text = match raw.get("text").and_then(Value::as_str) {
        Some(text) => text,
        None => return Err(SurveyError::Schema(MISSING_TEXT.to_string())),
    };

    let kind_raw = match raw.get("type").and_then(Value::as_str) {
        Some(kind) => kind,
        None => return Err(SurveyError::Schema(MISSING_TYPE.to_string())),
    };

    let kind = match QuestionKind::parse(kind_raw) {
        Some(kind) => kind,
        None => {
            return Err(SurveyError::Schema(format!(
                "{} is not a valid survey question type",
                kind_raw
            )))
        }
    };

    Ok(QuestionSpec {
        text: text.to_string(),
        kind,
        values: option_labels(raw.get("values")),
        answer: None,
    })
}

// A non-array `values` is treated as absent; non-string members are dropped.
// An explicitly empty list is preserved as empty.
fn option_labels(raw: Option<&Value>) -> Option<Vec<String>> {
    let items = raw?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

/// Validates and extracts the full payload: the question list plus the
/// survey name (empty when absent, as historic payloads sometimes were).
pub fn parse_payload(payload: &Value) -> SurveyResult<SurveyPayload> {
    let questions = validate(payload)?;
    let survey = payload
        .get("survey")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(SurveyPayload { survey, questions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "survey": "nps",
            "questions": [
                {"text": "How likely are you to recommend us?", "type": "rating"},
                {"text": "Tell us why", "type": "open"},
            ]
        })
    }

    #[test]
    fn test_accepts_well_formed_payload() {
        let specs = validate(&sample_payload()).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].kind, QuestionKind::Rating);
        assert_eq!(specs[1].text, "Tell us why");
        assert!(specs.iter().all(|q| q.answer.is_none()));
    }

    #[test]
    fn test_rejects_missing_questions() {
        let err = validate(&json!({"survey": "nps"})).unwrap_err();
        assert_eq!(err.to_string(), "Survey data must include questions");
    }

    #[test]
    fn test_rejects_non_array_questions() {
        let err = validate(&json!({"questions": "later"})).unwrap_err();
        assert_eq!(err.to_string(), "Survey data must include questions");
    }

    #[test]
    fn test_rejects_question_without_text() {
        let err = validate(&json!({"questions": [{"type": "open"}]})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Survey questions must include a `text` field"
        );
    }

    #[test]
    fn test_rejects_question_without_type() {
        let err = validate(&json!({"questions": [{"text": "Rate us"}]})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Survey questions must include a `type` field"
        );
    }

    #[test]
    fn test_rejects_unknown_type_with_offending_name() {
        let err = validate(&json!({"questions": [{"text": "Pick", "type": "emoji"}]})).unwrap_err();
        assert_eq!(err.to_string(), "emoji is not a valid survey question type");
    }

    #[test]
    fn test_first_violation_wins_by_position() {
        let payload = json!({
            "questions": [
                {"text": "Fine", "type": "single"},
                {"type": "open"},
                {"text": "Pick", "type": "bogus"},
            ]
        });
        let err = validate(&payload).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Survey questions must include a `text` field"
        );
    }

    #[test]
    fn test_text_check_precedes_type_check_within_a_question() {
        let err = validate(&json!({"questions": [{"values": []}]})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Survey questions must include a `text` field"
        );
    }

    #[test]
    fn test_empty_question_list_passes_validation() {
        let specs = validate(&json!({"questions": []})).unwrap();
        assert!(specs.is_empty());
    }

    #[test]
    fn test_malformed_values_treated_as_absent() {
        let payload = json!({
            "questions": [{"text": "Rate", "type": "likert", "values": 7}]
        });
        let specs = validate(&payload).unwrap();
        assert_eq!(specs[0].values, None);

        let payload = json!({
            "questions": [{"text": "Rate", "type": "likert", "values": ["good", 3, "bad"]}]
        });
        let specs = validate(&payload).unwrap();
        assert_eq!(specs[0].values, Some(vec!["good".to_string(), "bad".to_string()]));
    }

    #[test]
    fn test_parse_payload_defaults_missing_name() {
        let parsed = parse_payload(&json!({"questions": []})).unwrap();
        assert_eq!(parsed.survey, "");

        let parsed = parse_payload(&sample_payload()).unwrap();
        assert_eq!(parsed.survey, "nps");
        assert_eq!(parsed.questions.len(), 2);
    }
}
