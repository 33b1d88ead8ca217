use thiserror::Error;

pub type SurveyResult<T> = Result<T, SurveyError>;

/// Failures that abort survey construction before any slide is shown.
///
/// `Configuration` and `Schema` display their bare message: the validation
/// strings are an external contract and must survive `to_string()` verbatim.
#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Schema(String),

    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Renderer error: {0}")]
    Renderer(#[from] anyhow::Error),
}
