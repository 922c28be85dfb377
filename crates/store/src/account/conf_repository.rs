use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::account::models::{AccountCredential, AccountStanza};
use crate::account::repositories::CredentialProvider;
use ta_common::error::{TaError, TaResult};

/// Credential provider backed by the add-on's account conf file
/// (`[<account name>]` tables).
#[derive(Debug, Clone)]
pub struct ConfCredentialProvider {
    path: PathBuf,
}

impl ConfCredentialProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> TaResult<BTreeMap<String, AccountStanza>> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            TaError::Config(format!(
                "cannot read account conf {}: {e}",
                self.path.display()
            ))
        })?;

        toml::from_str(&raw).map_err(|e| {
            TaError::Config(format!(
                "invalid account conf {}: {e}",
                self.path.display()
            ))
        })
    }
}

#[async_trait]
impl CredentialProvider for ConfCredentialProvider {
    async fn resolve(&self, account_name: &str) -> TaResult<AccountCredential> {
        let mut accounts = self.load().await?;
        let stanza = accounts
            .remove(account_name)
            .ok_or_else(|| TaError::NotFound(format!("account {account_name}")))?;

        let credential = stanza.into_credential()?;
        tracing::info!(account = account_name, "Fetched configured account details.");
        Ok(credential)
    }
}
