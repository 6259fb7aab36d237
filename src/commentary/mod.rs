//! Race commentary from a text-generation service
//!
//! Purely cosmetic. Every request degrades to a fixed line on failure, so
//! callers always get text back and the simulation never sees an error.

pub mod gemini;
pub mod prompt;

use log::warn;
use thiserror::Error;

use crate::sim::{GameEvent, GameStats};
use crate::theme::TrackTheme;

#[cfg(target_arch = "wasm32")]
pub use gemini::GeminiCommentator;

/// Shown when a live comment comes back empty
pub const LIVE_EMPTY_FALLBACK: &str = "Pedal to the metal!";
/// Shown when a live comment request fails
pub const LIVE_ERROR_FALLBACK: &str = "Keep driving!";
/// Shown when the post-race analysis comes back empty
pub const ANALYSIS_EMPTY_FALLBACK: &str = "Solid run! You handled those corners like a pro.";
/// Shown when the post-race analysis request fails
pub const ANALYSIS_ERROR_FALLBACK: &str =
    "Tough break! Get back in the driver's seat and try again.";
/// Game-over panel text while the analysis is in flight
pub const ANALYSIS_PENDING: &str = "Analyzing your driving data...";

/// Commentary errors
#[derive(Debug, Error)]
pub enum CommentaryError {
    #[error("No API key configured")]
    MissingCredential,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Empty response")]
    EmptyResponse,
}

/// A source of race commentary
#[allow(async_fn_in_trait)]
pub trait Commentator {
    /// One short line reacting to `event`
    async fn live_comment(
        &self,
        stats: &GameStats,
        theme: &TrackTheme,
        event: GameEvent,
    ) -> Result<String, CommentaryError>;

    /// A couple of sentences summing up a finished run
    async fn post_race_analysis(
        &self,
        stats: &GameStats,
        theme: &TrackTheme,
    ) -> Result<String, CommentaryError>;
}

/// Live comment with fallbacks applied. Single attempt, never fails.
pub async fn request_live_comment<C: Commentator>(
    commentator: &C,
    stats: &GameStats,
    theme: &TrackTheme,
    event: GameEvent,
) -> String {
    let result = commentator.live_comment(stats, theme, event).await;
    with_fallback(result, LIVE_EMPTY_FALLBACK, LIVE_ERROR_FALLBACK, "Live commentary")
}

/// Post-race analysis with fallbacks applied. Single attempt, never fails.
pub async fn request_post_race_analysis<C: Commentator>(
    commentator: &C,
    stats: &GameStats,
    theme: &TrackTheme,
) -> String {
    let result = commentator.post_race_analysis(stats, theme).await;
    with_fallback(
        result,
        ANALYSIS_EMPTY_FALLBACK,
        ANALYSIS_ERROR_FALLBACK,
        "Post-race analysis",
    )
}

fn with_fallback(
    result: Result<String, CommentaryError>,
    empty: &str,
    failed: &str,
    what: &str,
) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) | Err(CommentaryError::EmptyResponse) => empty.to_string(),
        Err(e) => {
            warn!("{what} failed, using fallback: {e}");
            failed.to_string()
        }
    }
}

/// Returns the same canned lines every time
#[derive(Debug, Clone, Default)]
pub struct FixedCommentator {
    pub live: String,
    pub analysis: String,
}

impl FixedCommentator {
    pub fn new(live: impl Into<String>, analysis: impl Into<String>) -> Self {
        Self {
            live: live.into(),
            analysis: analysis.into(),
        }
    }
}

impl Commentator for FixedCommentator {
    async fn live_comment(
        &self,
        _stats: &GameStats,
        _theme: &TrackTheme,
        _event: GameEvent,
    ) -> Result<String, CommentaryError> {
        Ok(self.live.clone())
    }

    async fn post_race_analysis(
        &self,
        _stats: &GameStats,
        _theme: &TrackTheme,
    ) -> Result<String, CommentaryError> {
        Ok(self.analysis.clone())
    }
}
