//! Token-bounded rolling chat history for one session.

use std::collections::VecDeque;

use crate::llm_client::ChatMessage;

/// Role name, delimiters and formatting per message.
const MESSAGE_OVERHEAD_TOKENS: usize = 4;

/// ~4 characters per token, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    text.len().div_ceil(4)
}

fn message_tokens(message: &ChatMessage) -> usize {
    MESSAGE_OVERHEAD_TOKENS + estimate_tokens(&message.content)
}

/// Oldest messages are dropped once the window exceeds `token_limit`.
/// The newest message is always kept, even if it alone is over the limit.
#[derive(Debug, Clone)]
pub struct ChatMemory {
    messages: VecDeque<ChatMessage>,
    token_limit: usize,
    tokens: usize,
}

impl ChatMemory {
    pub fn new(token_limit: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            token_limit,
            tokens: 0,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.tokens += message_tokens(&message);
        self.messages.push_back(message);
        while self.tokens > self.token_limit && self.messages.len() > 1 {
            if let Some(dropped) = self.messages.pop_front() {
                self.tokens -= message_tokens(&dropped);
            }
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[cfg(test)]
    pub fn token_count(&self) -> usize {
        self.tokens
    }
}
