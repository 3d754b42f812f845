//! Preview state machine
//!
//! The preview path fetches articles asynchronously and shows intermediate
//! states. The shell feeds [`PreviewEvent`]s into [`transition`] and renders
//! whatever state it is in with [`render_preview`].

use crate::article::Article;
use crate::config::RenderConfig;
use crate::render::{render_grid, render_notice, NoticeKind};
use crate::sanitize::escape_text;
use serde::Serialize;

/// Text shown while the request is outstanding
pub const LOADING_MESSAGE: &str = "Loading articles...";

/// Current state of a preview
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviewState {
    #[default]
    Idle,
    Loading,
    Success(Vec<Article>),
    Empty,
    Error(String),
}

/// Inputs that move a preview between states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewEvent {
    /// The preview was mounted and a request was issued
    Mount,
    /// The request completed with a decoded list
    Loaded(Vec<Article>),
    /// The request failed
    Failed(String),
}

impl PreviewState {
    /// Stable lowercase name, used in logs and event payloads
    pub fn name(&self) -> &'static str {
        match self {
            PreviewState::Idle => "idle",
            PreviewState::Loading => "loading",
            PreviewState::Success(_) => "success",
            PreviewState::Empty => "empty",
            PreviewState::Error(_) => "error",
        }
    }

    /// True once the request has completed either way
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            PreviewState::Success(_) | PreviewState::Empty | PreviewState::Error(_)
        )
    }
}

/// Apply an event to a state
///
/// `Mount` (re)starts loading from any state. Completion events are only
/// accepted while loading; anything else leaves the state unchanged.
pub fn transition(state: PreviewState, event: PreviewEvent) -> PreviewState {
    match (state, event) {
        (_, PreviewEvent::Mount) => PreviewState::Loading,
        (PreviewState::Loading, PreviewEvent::Loaded(articles)) if articles.is_empty() => {
            PreviewState::Empty
        }
        (PreviewState::Loading, PreviewEvent::Loaded(articles)) => PreviewState::Success(articles),
        (PreviewState::Loading, PreviewEvent::Failed(message)) => PreviewState::Error(message),
        (state, _) => state,
    }
}

/// Render a preview state inside the block wrapper
pub fn render_preview(state: &PreviewState, config: &RenderConfig) -> String {
    let inner = match state {
        PreviewState::Idle => String::new(),
        PreviewState::Loading => format!(
            "<div class=\"devcards-loading\"><span class=\"devcards-spinner\"></span><p>{}</p></div>",
            escape_text(LOADING_MESSAGE)
        ),
        PreviewState::Success(articles) => render_grid(articles, config),
        PreviewState::Empty => render_grid(&[], config),
        PreviewState::Error(message) => render_notice(
            NoticeKind::Error,
            &format!("Failed to fetch articles: {message}"),
        ),
    };

    format!(
        "<div class=\"devcards devcards-columns-{}\">{inner}</div>",
        config.columns
    )
}

/// Serializable snapshot of a preview state and its markup
#[derive(Debug, Clone, Serialize)]
pub struct PreviewFrame {
    pub state: &'static str,
    pub html: String,
}

impl PreviewFrame {
    pub fn new(state: &PreviewState, config: &RenderConfig) -> Self {
        Self {
            state: state.name(),
            html: render_preview(state, config),
        }
    }
}
