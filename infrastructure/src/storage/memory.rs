//! In-memory conversation store

use async_trait::async_trait;
use roundtable_application::{ConversationStore, StoreError, StoredMessage};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Conversation {
    messages: Vec<StoredMessage>,
    summary: Option<String>,
}

/// Map-backed store; conversations live for the process lifetime.
#[derive(Default)]
pub struct InMemoryConversationStore {
    conversations: Mutex<HashMap<String, Conversation>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append_message(
        &self,
        conversation_id: &str,
        message: StoredMessage,
    ) -> Result<(), StoreError> {
        let mut conversations = self.conversations.lock().expect("store lock poisoned");
        conversations
            .entry(conversation_id.to_string())
            .or_default()
            .messages
            .push(message);
        Ok(())
    }

    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        let conversations = self.conversations.lock().expect("store lock poisoned");
        Ok(conversations
            .get(conversation_id)
            .map(|c| c.messages.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn message_count(&self, conversation_id: &str) -> Result<usize, StoreError> {
        let conversations = self.conversations.lock().expect("store lock poisoned");
        Ok(conversations
            .get(conversation_id)
            .map(|c| c.messages.len())
            .unwrap_or(0))
    }

    async fn messages_before_recent(
        &self,
        conversation_id: &str,
        keep_recent: usize,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        let conversations = self.conversations.lock().expect("store lock poisoned");
        Ok(conversations
            .get(conversation_id)
            .map(|c| {
                let cutoff = c.messages.len().saturating_sub(keep_recent);
                c.messages[..cutoff].to_vec()
            })
            .unwrap_or_default())
    }

    async fn summary(&self, conversation_id: &str) -> Result<Option<String>, StoreError> {
        let conversations = self.conversations.lock().expect("store lock poisoned");
        Ok(conversations
            .get(conversation_id)
            .and_then(|c| c.summary.clone()))
    }

    async fn store_summary(&self, conversation_id: &str, summary: &str) -> Result<(), StoreError> {
        let mut conversations = self.conversations.lock().expect("store lock poisoned");
        conversations
            .entry(conversation_id.to_string())
            .or_default()
            .summary = Some(summary.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_and_ordering() {
        let store = InMemoryConversationStore::new();
        for n in 0..5 {
            store
                .append_message("conv", StoredMessage::user(format!("message {n}")))
                .await
                .unwrap();
        }

        assert_eq!(store.message_count("conv").await.unwrap(), 5);

        let recent = store.recent_messages("conv", 2).await.unwrap();
        assert_eq!(recent[0].content, "message 4");
        assert_eq!(recent[1].content, "message 3");

        let older = store.messages_before_recent("conv", 2).await.unwrap();
        assert_eq!(older.len(), 3);
        assert_eq!(older[0].content, "message 0");
    }

    #[tokio::test]
    async fn test_missing_conversation_reads_as_empty() {
        let store = InMemoryConversationStore::new();
        assert_eq!(store.message_count("nope").await.unwrap(), 0);
        assert!(store.recent_messages("nope", 10).await.unwrap().is_empty());
        assert!(store.summary("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_summary_is_replaced() {
        let store = InMemoryConversationStore::new();
        store.store_summary("conv", "first").await.unwrap();
        store.store_summary("conv", "second").await.unwrap();
        assert_eq!(
            store.summary("conv").await.unwrap(),
            Some("second".to_string())
        );
    }
}
