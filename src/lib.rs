//! # Refit
//!
//! Reflows dialogue in game event scripts so it fits the message window.
//!
//! Scripts store a message as several text-line commands, one per display
//! line, wrapped by hand for the original language. Translated text has a
//! different length, so the old breaks land in the wrong places: lines
//! overflow the window or end half empty. Refit puts each message back
//! together and wraps it again, measuring rendered pixel width rather than
//! counting characters when a font is available.
//!
//! ## Architecture
//!
//! ```text
//! Command list (JSON)
//!       ↓
//!   [detect]   group contiguous text lines into message windows
//!       ↓
//!   [merge]    trim and join a window into one paragraph
//!       ↓
//!   [text]     wrap by pixel width (measure) or by character count
//!       ↓
//!   [post]     reattach orphaned closing quotes, pad continuations
//!       ↓
//!   [engine]   splice the new lines over the window
//! ```

pub mod config;
pub mod detect;
pub mod document;
pub mod engine;
pub mod error;
pub mod measure;
pub mod merge;
pub mod model;
pub mod post;
pub mod text;

pub use config::{MeasureConfig, ReflowConfig, ReflowMode};
pub use engine::{ReflowEngine, ReflowReport};
pub use error::ReflowError;
pub use model::Command;

use detect::PatternBoundary;

/// Reflow a single command list in place.
///
/// The configuration is validated and any configured font is opened before
/// the list is touched; a failure leaves `commands` unchanged.
pub fn reflow_commands(
    commands: &mut Vec<Command>,
    config: &ReflowConfig,
) -> Result<ReflowReport, ReflowError> {
    config.validate()?;
    let boundary = PatternBoundary::from_config(config)?;
    let measure = measure::open(config.measure.as_ref())?;
    let engine = ReflowEngine::new(config, &boundary, measure.as_deref());
    Ok(engine.reflow(commands))
}

/// Reflow a game data document given as JSON text.
///
/// Returns the rewritten JSON, or `None` when nothing needed to change.
pub fn reflow_json(
    json: &str,
    config: &ReflowConfig,
) -> Result<(Option<String>, ReflowReport), ReflowError> {
    config.validate()?;
    let boundary = PatternBoundary::from_config(config)?;
    let measure = measure::open(config.measure.as_ref())?;
    let engine = ReflowEngine::new(config, &boundary, measure.as_deref());
    document::reflow_json(json, &engine)
}
