use async_trait::async_trait;

use crate::account::models::AccountCredential;
use ta_common::error::TaResult;

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Resolve a configured account to its credential.
    ///
    /// Returns `NotFound` for an unknown account; any other error means the
    /// backing configuration could not be read.
    async fn resolve(&self, account_name: &str) -> TaResult<AccountCredential>;
}
