//! # specmatrix-gemini
//!
//! Gemini client that turns exam-matrix documents (PDFs, photos) into a
//! [`specmatrix_core::MatrixData`].
//!
//! One request carries every selected file as inline data, a prompt built
//! from the requested question distribution and a structured-output schema.
//! The response is either a parsed matrix or exactly one
//! [`GenerationError`].
//!
//! ## Example
//!
//! ```no_run
//! use specmatrix_gemini::{GeminiClient, GenerationRequest, MatrixGenerator, ModelType};
//! use specmatrix_core::{SourceFile, SourceKind};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new(std::env::var("GEMINI_API_KEY")?);
//! let source = SourceFile::load("matrix.pdf", SourceKind::MatrixSource)?;
//!
//! let request = GenerationRequest {
//!     model: ModelType::Flash,
//!     files: vec![source.payload()?],
//!     ..Default::default()
//! };
//!
//! match client.generate(&request).await {
//!     Ok(outcome) => println!("{} rows in {}ms", outcome.data.rows.len(), outcome.latency_ms),
//!     Err(e) => eprintln!("{}", e.user_message()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Models
//!
//! | Model | Identifier |
//! |-------|------------|
//! | Flash | `gemini-2.5-flash` |
//! | Pro | `gemini-3-pro-preview` |

pub mod client;
pub mod error;
pub mod model;
pub mod prompt;
pub mod response;
pub mod schema;
pub mod wire;

pub use client::{
    GeminiClient, GenerationOutcome, GenerationRequest, MatrixGenerator, DEFAULT_BASE_URL,
};
pub use error::{GenerationError, Result};
pub use model::ModelType;
pub use prompt::build_prompt;
pub use response::{interpret_response, strip_code_fences};
pub use schema::response_schema;
