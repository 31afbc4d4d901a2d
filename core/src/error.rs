//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Wrapper for YAML configuration errors.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// Wrapper for invalid preprocessing patterns.
    #[display("Pattern Error: {_0}")]
    Pattern(regex::Error),

    /// A descriptor or documentation identifier that can never be rendered.
    #[from(ignore)]
    #[display("Invalid descriptor: {_0}")]
    InvalidDescriptor(String),

    /// A descriptor reached rendering without a description while descriptions are required.
    #[from(ignore)]
    #[display("Missing description for '{_0}'")]
    MissingDescription(String),

    /// The captured operation and its documentation disagree.
    #[from(ignore)]
    #[display("Snippet Error: {_0}")]
    Snippet(String),

    /// A test expectation on the captured response failed.
    #[from(ignore)]
    #[display("Expectation failed: {_0}")]
    Expectation(String),

    /// Invalid configuration value.
    #[from(ignore)]
    #[display("Config Error: {_0}")]
    Config(String),

    /// The exchange could not be captured from the application under test.
    #[from(ignore)]
    #[display("Capture Error: {_0}")]
    Capture(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        // String must land in General, never in one of the explicit variants
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_json_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let app_err: AppError = err.into();
        assert!(matches!(app_err, AppError::Json(_)));
    }

    #[test]
    fn test_descriptor_display() {
        let app_err = AppError::InvalidDescriptor("name must not be empty".into());
        assert_eq!(
            format!("{}", app_err),
            "Invalid descriptor: name must not be empty"
        );
        let app_err = AppError::MissingDescription("page".into());
        assert_eq!(format!("{}", app_err), "Missing description for 'page'");
    }
}
