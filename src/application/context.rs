//! # Chat Context
//!
//! Everything one chat session needs, passed explicitly to the loop and the
//! cycle: the tool session, the completion provider, the transcript and the
//! model to ask.

use std::sync::Arc;

use crate::application::transcript::Transcript;
use crate::domain::config::AppConfig;
use crate::domain::traits::{CompletionProvider, ToolSession};

pub const DEFAULT_HISTORY_WINDOW: usize = 20;

pub struct ChatContext {
    pub session: Arc<dyn ToolSession>,
    pub provider: Arc<dyn CompletionProvider>,
    pub transcript: Transcript,
    pub model: String,
    /// Maximum number of messages per completion request
    pub history_window: usize,
}

impl ChatContext {
    pub fn new(
        session: Arc<dyn ToolSession>,
        provider: Arc<dyn CompletionProvider>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            session,
            provider,
            transcript: Transcript::new(),
            model: model.into(),
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    /// Build a context from the `agent` and `chat` configuration sections.
    pub fn from_config(
        session: Arc<dyn ToolSession>,
        provider: Arc<dyn CompletionProvider>,
        config: &AppConfig,
    ) -> Self {
        let transcript = match &config.chat.system_prompt {
            Some(prompt) => Transcript::with_system_prompt(prompt.clone()),
            None => Transcript::new(),
        }
        .pin_system(config.chat.pin_system_prompt);

        Self::new(session, provider, config.agent.model.clone())
            .with_transcript(transcript)
            .with_history_window(config.chat.history_window)
    }

    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = transcript;
        self
    }

    pub fn with_history_window(mut self, history_window: usize) -> Self {
        self.history_window = history_window;
        self
    }
}
