use super::repositories::CheckpointStore;
use ta_common::error::TaResult;

const CURSOR_SUFFIX: &str = "cursor";

/// Resume position for one configured input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollCheckpoint {
    pub input_identity: String,
    pub cursor: Option<String>,
}

impl PollCheckpoint {
    /// Key under which the cursor of `input_identity` is stored.
    pub fn key_for(input_identity: &str) -> String {
        format!("{input_identity}_{CURSOR_SUFFIX}")
    }

    pub fn key(&self) -> String {
        Self::key_for(&self.input_identity)
    }

    /// Read the checkpoint for an input; an absent key means "start fresh".
    pub async fn load<S>(store: &S, input_identity: &str) -> TaResult<Self>
    where
        S: CheckpointStore + ?Sized,
    {
        let cursor = store.get(&Self::key_for(input_identity)).await?;
        Ok(Self {
            input_identity: input_identity.to_owned(),
            cursor,
        })
    }

    /// Persist `cursor` and adopt it as the current position.
    pub async fn advance<S>(&mut self, store: &S, cursor: &str) -> TaResult<()>
    where
        S: CheckpointStore + ?Sized,
    {
        store.set(&self.key(), cursor).await?;
        self.cursor = Some(cursor.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use ta_common::error::TaError;

    #[derive(Default)]
    struct MemoryStore {
        values: Mutex<HashMap<String, String>>,
        fail_writes: bool,
    }

    #[async_trait]
    impl CheckpointStore for MemoryStore {
        async fn get(&self, key: &str) -> TaResult<Option<String>> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> TaResult<()> {
            if self.fail_writes {
                return Err(TaError::Storage("disk full".to_owned()));
            }
            self.values
                .lock()
                .unwrap()
                .insert(key.to_owned(), value.to_owned());
            Ok(())
        }
    }

    #[test]
    fn key_uses_cursor_suffix() {
        assert_eq!(PollCheckpoint::key_for("team_audit"), "team_audit_cursor");
    }

    #[tokio::test]
    async fn load_absent_starts_fresh() {
        let store = MemoryStore::default();
        let cp = PollCheckpoint::load(&store, "team_audit").await.unwrap();
        assert_eq!(cp.input_identity, "team_audit");
        assert!(cp.cursor.is_none());
    }

    #[tokio::test]
    async fn advance_persists_under_key() {
        let store = MemoryStore::default();
        let mut cp = PollCheckpoint::load(&store, "team_audit").await.unwrap();
        cp.advance(&store, "AAEC1").await.unwrap();

        assert_eq!(cp.cursor.as_deref(), Some("AAEC1"));
        let reloaded = PollCheckpoint::load(&store, "team_audit").await.unwrap();
        assert_eq!(reloaded.cursor.as_deref(), Some("AAEC1"));
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_cursor() {
        let store = MemoryStore {
            fail_writes: true,
            ..Default::default()
        };
        let mut cp = PollCheckpoint {
            input_identity: "team_audit".to_owned(),
            cursor: Some("OLD".to_owned()),
        };
        assert!(cp.advance(&store, "NEW").await.is_err());
        assert_eq!(cp.cursor.as_deref(), Some("OLD"));
    }
}
