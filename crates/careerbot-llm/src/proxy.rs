use std::sync::Arc;

use tracing::{debug, error};

use careerbot_types::models::Message;

use crate::policy::SYSTEM_POLICY;
use crate::{ChatTurn, CompletionProvider, LlmError};

/// Stateless front of the completion provider. Never retries; the caller
/// decides what to do with a failure.
#[derive(Clone)]
pub struct ChatProxy {
    provider: Arc<dyn CompletionProvider>,
}

impl ChatProxy {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Prepend the policy to `history` and return the provider's top
    /// answer, or an empty string when it produced none.
    pub async fn answer(&self, history: Vec<Message>) -> Result<String, LlmError> {
        let turns = with_policy(history);
        debug!(
            "Forwarding {} turns to {}",
            turns.len(),
            self.provider.model()
        );

        match self.provider.complete(&turns).await {
            Ok(text) => Ok(text.unwrap_or_default()),
            Err(e) => {
                error!("Completion request to {} failed: {}", self.provider.model(), e);
                Err(e)
            }
        }
    }
}

/// Exactly one system turn, followed by the history in order.
pub fn with_policy(history: Vec<Message>) -> Vec<ChatTurn> {
    std::iter::once(ChatTurn::system(SYSTEM_POLICY))
        .chain(history.into_iter().map(ChatTurn::from))
        .collect()
}
