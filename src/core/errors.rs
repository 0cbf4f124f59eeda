use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::core::types::FontName;

pub const NO_SELECTION_MESSAGE: &str = "No frame selected.";
pub const MULTIPLE_SELECTION_MESSAGE: &str = "Please select a single frame (for now).";
pub const NOT_A_SCENARIO_MESSAGE: &str = "Select a \"test scenario\" frame to export";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no frame selected")]
    NoSelection,
    #[error("{0} frames selected, expected exactly one")]
    MultipleSelection(usize),
    #[error("not a test scenario: {0}")]
    NotAScenario(String),
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("font load failed: {0}")]
    FontLoad(String),
    #[error("text read before font {0} was loaded")]
    FontNotLoaded(FontName),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AppError", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSelection => "NO_SELECTION",
            Self::MultipleSelection(_) => "MULTIPLE_SELECTION",
            Self::NotAScenario(_) => "NOT_A_SCENARIO",
            Self::MalformedDocument(_) => "MALFORMED_DOCUMENT",
            Self::FontLoad(_) => "FONT_LOAD",
            Self::FontNotLoaded(_) => "FONT_NOT_LOADED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Text shown to the user for selection and document-shape errors.
    ///
    /// Returns `None` for host and environment failures, which abort the
    /// invocation instead of being reported as a notification.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::NoSelection => Some(NO_SELECTION_MESSAGE),
            Self::MultipleSelection(_) => Some(MULTIPLE_SELECTION_MESSAGE),
            Self::NotAScenario(_) | Self::MalformedDocument(_) => Some(NOT_A_SCENARIO_MESSAGE),
            _ => None,
        }
    }

    pub fn is_user_facing(&self) -> bool {
        self.user_message().is_some()
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
