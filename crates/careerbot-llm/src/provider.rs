use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use careerbot_types::models::{Message, Role};

use crate::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl From<Role> for ChatRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => ChatRole::User,
            Role::Assistant => ChatRole::Assistant,
        }
    }
}

/// One entry of the sequence sent upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

impl From<Message> for ChatTurn {
    fn from(message: Message) -> Self {
        Self {
            role: message.role.into(),
            content: message.content,
        }
    }
}

/// A black-box text completion endpoint.
///
/// Implementations must be safe to share across concurrent requests.
/// `Ok(None)` means the provider answered without any text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<Option<String>, LlmError>;

    fn model(&self) -> &str;
}
