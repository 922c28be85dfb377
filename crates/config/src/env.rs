use std::env;
use std::path::PathBuf;

use ta_common::error::{TaError, TaResult};

/// Process-wide identity and file locations shared by every input binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub conf_name: String,
    pub conf_dir: PathBuf,
    pub checkpoint_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present, then reads the vars.
    pub fn from_env() -> TaResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        let app_name = get_var_or("TA_APP_NAME", "TA_Dropbox");
        if app_name.trim().is_empty() {
            return Err(TaError::Config("TA_APP_NAME must not be empty".to_owned()));
        }

        Ok(Self {
            app_name,
            conf_name: get_var_or("TA_CONF_NAME", "ta_dropbox"),
            conf_dir: PathBuf::from(get_var_or("TA_CONF_DIR", "local")),
            checkpoint_dir: env::var("TA_CHECKPOINT_DIR").ok().map(PathBuf::from),
        })
    }

    /// Directory holding one checkpoint file per key. Required to run an input.
    pub fn require_checkpoint_dir(&self) -> TaResult<PathBuf> {
        self.checkpoint_dir
            .clone()
            .ok_or_else(|| TaError::Config("TA_CHECKPOINT_DIR is required but not set".to_owned()))
    }

    pub fn account_conf_path(&self) -> PathBuf {
        self.conf_dir.join(format!("{}_account.toml", self.conf_name))
    }

    pub fn settings_conf_path(&self) -> PathBuf {
        self.conf_dir.join(format!("{}_settings.toml", self.conf_name))
    }

    /// Logger name used for every input of this add-on.
    pub fn logger_name(&self) -> String {
        format!("{}_input", self.app_name)
    }
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
