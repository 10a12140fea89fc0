//! Dooze Core Library
//!
//! Sends a short video to a generative model with a style-specific
//! instruction, rotating through API keys on failure, and interprets the
//! returned text as a timeline, an editable prompt breakdown, or raw text.

pub mod client;
pub mod credentials;
pub mod editor;
pub mod error;
pub mod format;
pub mod history;
pub mod interpreter;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod style;
pub mod types;
pub mod video;

// Re-export commonly used items at crate root
pub use client::{
    Cooldown, GeminiTransport, GenerateRequest, InferenceClient, RetryPolicy, TokioCooldown,
    Transport,
};
pub use credentials::{CredentialPool, CredentialSource};
pub use editor::ResultView;
pub use error::{AnalysisError, AttemptError, EncodingError, HistoryError};
pub use format::{format_history, format_result_readable, format_timestamp};
pub use history::{HISTORY_CAPACITY, HistoryStore, get_history_path};
pub use interpreter::parse;
pub use provider::ModelConfig;
pub use session::{AnalysisStatus, Session, SessionError};
pub use style::StyleProfile;
pub use types::{
    Breakdown, BreakdownField, HistoryItem, ParsedResult, PresentationMode, TimelineEntry,
};
pub use video::{MAX_VIDEO_BYTES, VideoPayload};
