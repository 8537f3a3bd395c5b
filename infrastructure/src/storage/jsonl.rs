//! JSONL conversation store
//!
//! One directory per store, two files per conversation: a `.jsonl` file
//! with one serialized message per line (append-only) and a `.summary.txt`
//! file holding the current rolling summary. Malformed lines are skipped
//! with a warning rather than failing the read.

use async_trait::async_trait;
use roundtable_application::{ConversationStore, StoreError, StoredMessage};
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct JsonlConversationStore {
    dir: PathBuf,
}

impl JsonlConversationStore {
    /// Store rooted at `dir`; the directory is created if missing.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            StoreError::Io(format!("could not create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Conversation ids become file names; anything outside a safe
    /// character set is replaced so ids cannot escape the directory.
    fn sanitize(conversation_id: &str) -> String {
        conversation_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn messages_path(&self, conversation_id: &str) -> PathBuf {
        self.dir
            .join(format!("{}.jsonl", Self::sanitize(conversation_id)))
    }

    fn summary_path(&self, conversation_id: &str) -> PathBuf {
        self.dir
            .join(format!("{}.summary.txt", Self::sanitize(conversation_id)))
    }

    async fn read_all(&self, conversation_id: &str) -> Result<Vec<StoredMessage>, StoreError> {
        let path = self.messages_path(conversation_id);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "could not read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let mut messages = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredMessage>(line) {
                Ok(message) => messages.push(message),
                Err(e) => warn!("Skipping malformed line in {}: {}", path.display(), e),
            }
        }
        Ok(messages)
    }
}

#[async_trait]
impl ConversationStore for JsonlConversationStore {
    async fn append_message(
        &self,
        conversation_id: &str,
        message: StoredMessage,
    ) -> Result<(), StoreError> {
        let path = self.messages_path(conversation_id);
        let mut line = serde_json::to_string(&message)
            .map_err(|e| StoreError::Io(format!("could not serialize message: {e}")))?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| StoreError::Io(format!("could not open {}: {}", path.display(), e)))?;

        use tokio::io::AsyncWriteExt;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StoreError::Io(format!("could not append to {}: {}", path.display(), e)))
    }

    async fn recent_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        let mut messages = self.read_all(conversation_id).await?;
        messages.reverse();
        messages.truncate(limit);
        Ok(messages)
    }

    async fn message_count(&self, conversation_id: &str) -> Result<usize, StoreError> {
        Ok(self.read_all(conversation_id).await?.len())
    }

    async fn messages_before_recent(
        &self,
        conversation_id: &str,
        keep_recent: usize,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        let mut messages = self.read_all(conversation_id).await?;
        let cutoff = messages.len().saturating_sub(keep_recent);
        messages.truncate(cutoff);
        Ok(messages)
    }

    async fn summary(&self, conversation_id: &str) -> Result<Option<String>, StoreError> {
        let path = self.summary_path(conversation_id);
        match tokio::fs::read_to_string(&path).await {
            Ok(summary) if summary.trim().is_empty() => Ok(None),
            Ok(summary) => Ok(Some(summary)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(format!(
                "could not read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn store_summary(&self, conversation_id: &str, summary: &str) -> Result<(), StoreError> {
        let path = self.summary_path(conversation_id);
        tokio::fs::write(&path, summary)
            .await
            .map_err(|e| StoreError::Io(format!("could not write {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_read_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlConversationStore::new(dir.path()).unwrap();

        store
            .append_message("conv", StoredMessage::user("question"))
            .await
            .unwrap();
        store
            .append_message("conv", StoredMessage::agent("mentor", "answer"))
            .await
            .unwrap();

        assert_eq!(store.message_count("conv").await.unwrap(), 2);

        let recent = store.recent_messages("conv", 10).await.unwrap();
        assert_eq!(recent[0].content, "answer");
        assert_eq!(recent[0].agent_id.as_deref(), Some("mentor"));
        assert_eq!(recent[1].content, "question");
    }

    #[tokio::test]
    async fn test_messages_before_recent_keeps_tail_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlConversationStore::new(dir.path()).unwrap();
        for n in 0..8 {
            store
                .append_message("conv", StoredMessage::user(format!("message {n}")))
                .await
                .unwrap();
        }

        let older = store.messages_before_recent("conv", 6).await.unwrap();
        assert_eq!(older.len(), 2);
        assert_eq!(older[0].content, "message 0");
        assert_eq!(older[1].content, "message 1");
    }

    #[tokio::test]
    async fn test_malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlConversationStore::new(dir.path()).unwrap();
        store
            .append_message("conv", StoredMessage::user("good"))
            .await
            .unwrap();

        let path = store.messages_path("conv");
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("not json at all\n");
        std::fs::write(&path, content).unwrap();

        store
            .append_message("conv", StoredMessage::user("also good"))
            .await
            .unwrap();

        let recent = store.recent_messages("conv", 10).await.unwrap();
        assert_eq!(recent.len(), 2);
    }

    #[tokio::test]
    async fn test_summary_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlConversationStore::new(dir.path()).unwrap();

        assert!(store.summary("conv").await.unwrap().is_none());
        store.store_summary("conv", "what happened so far").await.unwrap();
        assert_eq!(
            store.summary("conv").await.unwrap(),
            Some("what happened so far".to_string())
        );
    }

    #[tokio::test]
    async fn test_conversation_id_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlConversationStore::new(dir.path()).unwrap();

        store
            .append_message("../escape/attempt", StoredMessage::user("hi"))
            .await
            .unwrap();

        // The file lands inside the store directory.
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["___escape_attempt.jsonl"]);
    }
}
