use async_trait::async_trait;

use ta_common::error::TaResult;

#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Last value written under `key`, or `None` if nothing was ever stored.
    async fn get(&self, key: &str) -> TaResult<Option<String>>;

    /// Durably replace the value under `key`. A later `get` must observe it
    /// even if the process dies right after this returns.
    async fn set(&self, key: &str, value: &str) -> TaResult<()>;
}
