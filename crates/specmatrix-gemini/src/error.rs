//! Failure taxonomy of a generation request.

use thiserror::Error;

/// Errors from a single generation call.
///
/// Every variant maps to one user-visible message via
/// [`GenerationError::user_message`]; no partial result accompanies an error.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// No API key was supplied.
    #[error("API key is empty")]
    MissingApiKey,

    /// The request carried no source file.
    #[error("No source files in request")]
    NoSourceFiles,

    /// The HTTP request could not be sent or its body not read.
    #[error("Request to generation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Generation service error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Output hit the length limit. `partial` is set when some text came
    /// back but could not be parsed.
    #[error("Response truncated at output length limit (MAX_TOKENS)")]
    Truncated { partial: bool },

    /// Prompt or output was blocked by the safety filter.
    #[error("Response blocked by safety filter: {reason}")]
    ContentFiltered { reason: String },

    /// The service stopped without text for another reason.
    #[error("Generation declined: {0}")]
    Refused(String),

    /// No candidate text and no finish reason.
    #[error("Empty response from generation service")]
    EmptyResponse,

    /// Text came back but is not a matrix document.
    #[error("Malformed matrix JSON: {0}")]
    MalformedJson(String),
}

impl GenerationError {
    /// Message shown to the user in place of a result.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingApiKey => {
                "Please set an API key first (specmatrix key set <KEY>).".to_string()
            }
            Self::NoSourceFiles => "Please select at least one matrix source file.".to_string(),
            Self::Transport(e) => format!("Could not reach the generation service: {e}"),
            Self::Api { status, body } => {
                format!("The generation service returned an error ({status}): {body}")
            }
            Self::Truncated { partial: false } => {
                "The content is too long (MAX_TOKENS). Split the input files or ask for less detail."
                    .to_string()
            }
            Self::Truncated { partial: true } => {
                "The result was cut off because it is too long (MAX_TOKENS). Use fewer documents or split the content."
                    .to_string()
            }
            Self::ContentFiltered { .. } => {
                "The content was blocked by the safety filter. Please check the documents.".to_string()
            }
            Self::Refused(reason) => {
                format!("The model declined to generate content. Reason: {reason}. Please check the documents.")
            }
            Self::EmptyResponse => {
                "The model returned no result (empty response). Please try again later.".to_string()
            }
            Self::MalformedJson(_) => {
                "The returned data is not in the expected JSON format. Please try again.".to_string()
            }
        }
    }
}

/// Type alias for [`Result<T, GenerationError>`].
pub type Result<T> = std::result::Result<T, GenerationError>;
