//! Scripted `ChatBackend` for tests: replays queued replies and records every message sent.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatBackend, FinishReason, LlmError, ModelReply};

#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<ModelReply, LlmError>>>,
    sent: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, reply: Result<ModelReply, LlmError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.with_reply(Ok(ModelReply {
            text: Some(text.to_string()),
            finish_reason: FinishReason::Stop,
        }))
    }

    pub fn with_recitation(self) -> Self {
        self.with_reply(Ok(ModelReply {
            text: None,
            finish_reason: FinishReason::Recitation,
        }))
    }

    pub fn sent_messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send_message(&self, message: &str) -> Result<ModelReply, LlmError> {
        self.sent.lock().unwrap().push(message.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}
