use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Five-point agreement scale applied when a likert/rating question carries
/// no explicit `values`.
pub const DEFAULT_SCALE: [&str; 5] = [
    "strongly agree",
    "agree",
    "neutral",
    "disagree",
    "strongly disagree",
];

/// The recognized question kinds. Closed set: validation and capture match
/// on it exhaustively, so adding a kind is a compile-time-visible change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Likert,
    Multiple,
    Open,
    Rating,
    Single,
}

impl QuestionKind {
    /// Parses the wire name of a kind. `None` for anything outside the set.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "likert" => Some(Self::Likert),
            "multiple" => Some(Self::Multiple),
            "open" => Some(Self::Open),
            "rating" => Some(Self::Rating),
            "single" => Some(Self::Single),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Likert => "likert",
            Self::Multiple => "multiple",
            Self::Open => "open",
            Self::Rating => "rating",
            Self::Single => "single",
        }
    }
}

/// One surveyed item. Identity is positional: a question's index is the
/// correlation key between its rendered slide and this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Option labels for likert/rating slides. Absent means the default
    /// agreement scale; an explicitly empty list stays empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    /// Written at most once, at the moment the question's slide is left.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl QuestionSpec {
    pub fn new(text: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            text: text.into(),
            kind,
            values: None,
            answer: None,
        }
    }

    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = Some(values);
        self
    }

    /// Effective option labels: the explicit `values` when present,
    /// otherwise the default agreement scale.
    pub fn scale(&self) -> Vec<String> {
        match &self.values {
            Some(values) => values.clone(),
            None => DEFAULT_SCALE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Accepted external input: the survey name plus its validated questions.
#[derive(Debug, Clone)]
pub struct SurveyPayload {
    pub survey: String,
    pub questions: Vec<QuestionSpec>,
}

/// Opaque handle to a rendered slide. Minted by the renderer; the engine
/// only stores it and hands it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlideHandle(u64);

impl SlideHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Runtime state for one survey presentation.
#[derive(Debug, Clone)]
pub struct SurveySession {
    /// Correlation id for logs; never serialized to the wire.
    pub id: Uuid,
    pub name: String,
    /// Mutated in place as answers arrive.
    pub questions: Vec<QuestionSpec>,
    /// Creation instant, milliseconds since the epoch.
    pub shown_at: i64,
    pub slides: Vec<SlideHandle>,
}

impl SurveySession {
    pub fn new(name: impl Into<String>, questions: Vec<QuestionSpec>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            questions,
            shown_at: Utc::now().timestamp_millis(),
            slides: Vec::new(),
        }
    }
}

/// A visitor interaction on the active slide, as delivered by the host's
/// input machinery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerEvent {
    pub index: usize,
    pub value: AnswerValue,
}

/// What the interaction carried: a selected option's display label, or the
/// current free-text content of an open slide (empty when skipped untouched).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    Selected(String),
    Text(String),
}

/// Wire shape of a completed survey, posted to the response endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionBody {
    pub survey: String,
    pub questions: Vec<QuestionSpec>,
    /// Millisecond timestamp wrapped in literal quotes, e.g. `"\"1693...\""`.
    /// The doubled quoting is what the response backend expects.
    #[serde(rename = "shownAt")]
    pub shown_at: String,
}

impl SubmissionBody {
    pub fn from_session(session: &SurveySession) -> Self {
        Self {
            survey: session.name.clone(),
            questions: session.questions.clone(),
            shown_at: format!("\"{}\"", session.shown_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_roundtrip() {
        for kind in [
            QuestionKind::Likert,
            QuestionKind::Multiple,
            QuestionKind::Open,
            QuestionKind::Rating,
            QuestionKind::Single,
        ] {
            assert_eq!(QuestionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(QuestionKind::parse("emoji"), None);
    }

    #[test]
    fn test_scale_defaults_to_agreement_labels() {
        let q = QuestionSpec::new("Rate us", QuestionKind::Rating);
        assert_eq!(q.scale(), DEFAULT_SCALE.to_vec());

        let custom = QuestionSpec::new("Stars", QuestionKind::Rating)
            .with_values(vec!["1".into(), "2".into(), "3".into()]);
        assert_eq!(custom.scale(), vec!["1", "2", "3"]);

        let empty = QuestionSpec::new("None", QuestionKind::Likert).with_values(Vec::new());
        assert!(empty.scale().is_empty());
    }

    #[test]
    fn test_question_serializes_without_absent_fields() {
        let q = QuestionSpec::new("Rate us", QuestionKind::Rating);
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json, serde_json::json!({"text": "Rate us", "type": "rating"}));

        let mut answered = QuestionSpec::new("Rate us", QuestionKind::Rating);
        answered.answer = Some("agree".into());
        let json = serde_json::to_value(&answered).unwrap();
        assert_eq!(json["answer"], "agree");
    }

    #[test]
    fn test_submission_body_quotes_timestamp() {
        let mut session = SurveySession::new("nps", Vec::new());
        session.shown_at = 1_693_000_000_000;

        let body = SubmissionBody::from_session(&session);
        assert_eq!(body.shown_at, "\"1693000000000\"");

        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""shownAt":"\"1693000000000\"""#));
    }
}
