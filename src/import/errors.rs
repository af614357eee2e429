use thiserror::Error;

use super::preview::PreviewError;
use super::session::ImportStep;
use crate::api::ApiError;

/// Everything that can stop an import from moving forward.
///
/// None of these are fatal: the workflow is always left in a state the
/// user can recover from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("unsupported file type '{name}': only .csv files can be imported")]
    UnsupportedFileType { name: String },

    #[error("file is too large ({size} bytes, limit is {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("required field '{0}' is not mapped")]
    MissingRequiredField(&'static str),

    #[error("column {column} does not exist (file has {width} columns)")]
    ColumnOutOfRange { column: usize, width: usize },

    #[error("could not parse preview: {0}")]
    Preview(#[from] PreviewError),

    #[error("could not read file: {0}")]
    Read(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("another request is still in progress")]
    Busy,

    #[error("not available in the {actual} step (expected {expected})")]
    InvalidStep { expected: ImportStep, actual: ImportStep },

    #[error("no import in progress")]
    NoSession,

    #[error("the import was closed before the request finished")]
    SessionReset,
}

impl ImportError {
    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            ImportError::UnsupportedFileType { .. } => {
                "Please select a CSV file (.csv).".to_string()
            }
            ImportError::FileTooLarge { limit, .. } => format!(
                "File is too large. Maximum size is {} MB.",
                limit / (1024 * 1024)
            ),
            ImportError::MissingRequiredField(label) => {
                format!("Please map the required field: {}", label)
            }
            ImportError::Preview(e) => format!("Could not read the CSV file: {}.", e),
            ImportError::Read(e) => format!("Could not read the file: {}", e),
            ImportError::Api(e) => e.user_message(),
            other => {
                let text = other.to_string();
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => text,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            ImportError::MissingRequiredField("Name").user_message(),
            "Please map the required field: Name"
        );
        assert_eq!(
            ImportError::FileTooLarge { size: 11 * 1024 * 1024, limit: 10 * 1024 * 1024 }.user_message(),
            "File is too large. Maximum size is 10 MB."
        );
        assert_eq!(
            ImportError::Api(ApiError::Forbidden).user_message(),
            ApiError::Forbidden.user_message()
        );
        assert_eq!(ImportError::Busy.user_message(), "Another request is still in progress");
    }
}
