//! Turning a raw service response into a matrix or a classified error.

use crate::error::{GenerationError, Result};
use crate::wire::GenerateContentResponse;
use specmatrix_core::MatrixData;
use tracing::{debug, warn};

const FINISH_STOP: &str = "STOP";
const FINISH_MAX_TOKENS: &str = "MAX_TOKENS";

/// Finish reasons reported when the safety filter stopped generation.
const FILTER_REASONS: [&str; 5] = [
    "SAFETY",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
    "IMAGE_SAFETY",
];

/// Strip a surrounding Markdown code fence, if any.
///
/// ```
/// use specmatrix_gemini::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"rows\":[]}\n```"), "{\"rows\":[]}");
/// assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
/// ```
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    let text = text.trim();

    if text.starts_with("```") {
        // Drop the opening line, e.g. "```json"
        let body = text.find('\n').map_or("", |start| &text[start + 1..]);
        let body = body.trim_end();
        let body = body.strip_suffix("```").unwrap_or(body);
        return body.trim().to_string();
    }

    text.to_string()
}

/// Concatenated answer text of the first candidate, reasoning parts excluded.
fn candidate_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter(|part| part.thought != Some(true))
                .filter_map(|part| part.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Classify a response and parse its matrix.
///
/// # Errors
///
/// - [`GenerationError::ContentFiltered`] when the prompt was blocked or the
///   candidate stopped for a safety reason
/// - [`GenerationError::Truncated`] when the output hit the length limit
/// - [`GenerationError::Refused`] for any other non-normal stop without text
/// - [`GenerationError::EmptyResponse`] when there is neither text nor reason
/// - [`GenerationError::MalformedJson`] when the text is not a matrix
pub fn interpret_response(response: &GenerateContentResponse) -> Result<MatrixData> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.clone())
    {
        warn!(%reason, "prompt blocked");
        return Err(GenerationError::ContentFiltered { reason });
    }

    let finish_reason = response
        .candidates
        .first()
        .and_then(|candidate| candidate.finish_reason.as_deref());
    let text = candidate_text(response);

    if let Some(reason) = finish_reason {
        if FILTER_REASONS.contains(&reason) {
            warn!(%reason, "candidate blocked");
            return Err(GenerationError::ContentFiltered {
                reason: reason.to_string(),
            });
        }
    }

    if text.trim().is_empty() {
        return Err(match finish_reason {
            Some(FINISH_MAX_TOKENS) => GenerationError::Truncated { partial: false },
            Some(reason) if reason != FINISH_STOP => GenerationError::Refused(reason.to_string()),
            _ => GenerationError::EmptyResponse,
        });
    }

    let json = strip_code_fences(&text);
    debug!(bytes = json.len(), ?finish_reason, "parsing matrix JSON");

    serde_json::from_str::<MatrixData>(&json).map_err(|e| {
        if finish_reason == Some(FINISH_MAX_TOKENS) {
            GenerationError::Truncated { partial: true }
        } else {
            warn!(error = %e, "response is not a matrix");
            GenerationError::MalformedJson(e.to_string())
        }
    })
}

/// Classify an error body from a non-success HTTP status.
pub(crate) fn classify_api_error(status: u16, body: String) -> GenerationError {
    if body.contains("SAFETY") || body.contains("blocked") {
        return GenerationError::ContentFiltered {
            reason: format!("HTTP {status}"),
        };
    }
    GenerationError::Api { status, body }
}
