mod dropbox;
mod input;

use std::process::ExitCode;

use crate::dropbox::client::DropboxClientConfig;
use crate::input::DropboxInput;

/// Serializes tests that touch process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let input = DropboxInput::new(DropboxClientConfig::from_env());
    ta_modinput::main_with(input).await
}
