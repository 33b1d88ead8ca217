pub mod config;
pub mod error;
pub mod schema;
pub mod types;

pub use config::SurveyConfig;
pub use error::{SurveyError, SurveyResult};
