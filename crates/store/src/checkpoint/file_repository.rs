use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::checkpoint::repositories::CheckpointStore;
use ta_common::error::{TaError, TaResult};

const TMP_SUFFIX: &str = "_new";

/// Bytes kept as-is in checkpoint file names: `[A-Za-z0-9._-]`.
const KEY_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-').remove(b'.');

/// Checkpoint store keeping one JSON-encoded value per file under the
/// checkpoint directory handed to the input by the host.
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    dir: PathBuf,
}

impl FileCheckpointStore {
    /// Open the store, creating the directory if it does not exist yet.
    pub async fn open(dir: impl Into<PathBuf>) -> TaResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|e| {
            TaError::Storage(format!(
                "cannot create checkpoint dir {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn stable_path(&self, key: &str) -> PathBuf {
        self.dir.join(encode_key(key))
    }

    fn tmp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{TMP_SUFFIX}", encode_key(key)))
    }
}

#[async_trait]
impl CheckpointStore for FileCheckpointStore {
    async fn get(&self, key: &str) -> TaResult<Option<String>> {
        // Only the stable file counts; a leftover tmp file is an unfinished write.
        let path = self.stable_path(key);
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice::<Option<String>>(&raw).map_err(|e| {
            TaError::Storage(format!("corrupt checkpoint {}: {e}", path.display()))
        })
    }

    async fn set(&self, key: &str, value: &str) -> TaResult<()> {
        let payload = serde_json::to_vec(value)
            .map_err(|e| TaError::Internal(format!("encode checkpoint: {e}")))?;

        // Write the new value to a tmp file and flush it fully to disk, then
        // rename over the stable file so readers never see a torn value.
        let tmp_path = self.tmp_path(key);
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&payload).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, self.stable_path(key)).await?;
        tracing::debug!(key, "checkpoint updated");
        Ok(())
    }
}

/// Percent-encode everything outside `[A-Za-z0-9._-]` so any key maps to a
/// single file name inside the checkpoint directory.
fn encode_key(key: &str) -> String {
    let out = utf8_percent_encode(key, KEY_SET).to_string();
    if out.chars().all(|c| c == '.') {
        // "." and ".." are not usable file names
        return out.replace('.', "%2E");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn encode_key_passes_safe_names() {
        assert_eq!(encode_key("team_audit_cursor"), "team_audit_cursor");
    }

    #[test]
    fn encode_key_escapes_separators() {
        assert_eq!(encode_key("a/b c"), "a%2Fb%20c");
        assert_eq!(encode_key(".."), "%2E%2E");
    }

    #[test]
    fn encode_key_escapes_non_ascii_per_utf8_byte() {
        assert_eq!(encode_key("équipe.v1-cursor"), "%C3%A9quipe.v1-cursor");
        assert_eq!(encode_key(""), "");
    }

    #[tokio::test]
    async fn get_unknown_key_is_none() {
        let dir = tempdir().unwrap();
        let store = FileCheckpointStore::open(dir.path()).await.unwrap();
        assert_eq!(store.get("missing_cursor").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_roundtrips_across_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = FileCheckpointStore::open(dir.path()).await.unwrap();
            store.set("team_audit_cursor", "AAEC1").await.unwrap();
            store.set("team_audit_cursor", "AAEC2").await.unwrap();
        }

        let reopened = FileCheckpointStore::open(dir.path()).await.unwrap();
        assert_eq!(
            reopened.get("team_audit_cursor").await.unwrap().as_deref(),
            Some("AAEC2")
        );
        assert!(!dir.path().join("team_audit_cursor_new").exists());
    }

    #[tokio::test]
    async fn value_is_stored_json_encoded() {
        let dir = tempdir().unwrap();
        let store = FileCheckpointStore::open(dir.path()).await.unwrap();
        store.set("k", "C\"1").await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("k")).unwrap();
        assert_eq!(raw, r#""C\"1""#);
    }

    #[tokio::test]
    async fn leftover_tmp_file_is_ignored() {
        let dir = tempdir().unwrap();
        let store = FileCheckpointStore::open(dir.path()).await.unwrap();
        store.set("k_cursor", "GOOD").await.unwrap();
        std::fs::write(dir.path().join("k_cursor_new"), b"\"PART").unwrap();

        assert_eq!(store.get("k_cursor").await.unwrap().as_deref(), Some("GOOD"));
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let store = FileCheckpointStore::open(dir.path()).await.unwrap();
        std::fs::write(dir.path().join("k_cursor"), b"{not json").unwrap();

        assert!(matches!(
            store.get("k_cursor").await,
            Err(TaError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn open_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("modinputs").join("dropbox");
        let store = FileCheckpointStore::open(&nested).await.unwrap();
        assert!(store.dir().is_dir());
    }
}
