//! Test doubles shared by unit tests across modules.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{ChatMessage, LanguageModel, LlmError};

/// A `LanguageModel` that replays queued responses and records every request.
/// An exhausted queue answers with a 503, like an unreachable model server.
#[derive(Default)]
pub struct ScriptedLlm {
    completions: Mutex<VecDeque<Option<String>>>,
    chats: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<String>>,
    conversations: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn complete_with(self, text: &str) -> Self {
        push(&self.completions, Some(text.to_string()));
        self
    }

    pub fn complete_fails(self) -> Self {
        push(&self.completions, None);
        self
    }

    pub fn chat_with(self, text: &str) -> Self {
        push(&self.chats, Some(text.to_string()));
        self
    }

    pub fn chat_fails(self) -> Self {
        push(&self.chats, None);
        self
    }

    /// Prompts received by `complete`, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Message histories received by `chat`, in call order.
    pub fn conversations(&self) -> Vec<Vec<ChatMessage>> {
        self.conversations.lock().unwrap().clone()
    }
}

fn push(queue: &Mutex<VecDeque<Option<String>>>, item: Option<String>) {
    queue.lock().unwrap().push_back(item);
}

fn next(queue: &Mutex<VecDeque<Option<String>>>) -> Result<String, LlmError> {
    match queue.lock().unwrap().pop_front() {
        Some(Some(text)) => Ok(text),
        _ => Err(LlmError::Api {
            status: 503,
            message: "no scripted response".to_string(),
        }),
    }
}

#[async_trait]
impl LanguageModel for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        next(&self.completions)
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatMessage, LlmError> {
        self.conversations.lock().unwrap().push(messages.to_vec());
        next(&self.chats).map(ChatMessage::assistant)
    }
}
