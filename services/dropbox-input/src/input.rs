use async_trait::async_trait;

use ta_common::error::{TaError, TaResult};
use ta_config::AppConfig;
use ta_modinput::{
    validate_interval, Argument, EventSink, InputDefinition, InputParameters, ModularInput,
    Scheme, SchemeDescriptor,
};
use ta_store::account::conf_repository::ConfCredentialProvider;
use ta_store::account::repositories::CredentialProvider;
use ta_store::checkpoint::file_repository::FileCheckpointStore;
use ta_store::checkpoint::repositories::CheckpointStore;

use crate::dropbox::client::{parse_start_date, DropboxClient, DropboxClientConfig};
use crate::dropbox::sync::{DropboxPoller, PollError, PollResult, PollSettings};

/// The `dropbox` modular input.
pub struct DropboxInput {
    client_config: DropboxClientConfig,
}

impl DropboxInput {
    pub fn new(client_config: DropboxClientConfig) -> Self {
        Self { client_config }
    }
}

impl SchemeDescriptor for DropboxInput {
    fn scheme(&self) -> Scheme {
        Scheme::new("Dropbox")
            .add_argument(Argument::new("name", true).titled("Name", "Name"))
            .add_argument(Argument::new("interval", true))
            .add_argument(Argument::new("start_time", false))
            .add_argument(Argument::new("category", false))
            .add_argument(Argument::new("account", true))
    }

    fn validate_input(&self, parameters: &InputParameters) -> TaResult<()> {
        validate_interval(parameters)?;
        if let Some(start_time) = parameters.get("start_time") {
            parse_start_date(start_time).map_err(|e| TaError::Validation(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ModularInput for DropboxInput {
    type Error = PollError;

    async fn stream_events(
        &self,
        app: &AppConfig,
        definition: &InputDefinition,
        sink: &mut dyn EventSink,
    ) -> Result<(), PollError> {
        let credentials = ConfCredentialProvider::new(app.account_conf_path());
        let checkpoint_dir = app.require_checkpoint_dir().map_err(PollError::Config)?;
        let checkpoints = FileCheckpointStore::open(checkpoint_dir)
            .await
            .map_err(PollError::Checkpoint)?;
        let client = DropboxClient::new(self.client_config.clone())
            .map_err(|e| PollError::Config(TaError::Internal(e.to_string())))?;

        let result = poll_stanza(client, &credentials, checkpoints, sink, definition).await?;
        tracing::info!(
            source = %result.source,
            pages = result.pages,
            emitted = result.emitted,
            "team log poll completed"
        );
        tracing::debug!(cursor = ?result.cursor, "checkpoint after poll");
        Ok(())
    }
}

/// Resolve the stanza's account and run one poll cycle against it.
pub async fn poll_stanza<P, C, E>(
    client: DropboxClient,
    credentials: &P,
    checkpoints: C,
    sink: E,
    definition: &InputDefinition,
) -> Result<PollResult, PollError>
where
    P: CredentialProvider + ?Sized,
    C: CheckpointStore,
    E: EventSink,
{
    let params = &definition.parameters;
    let account_name = params.require("account").map_err(PollError::Config)?;

    let account = match credentials.resolve(account_name).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(account = account_name, error = %e, "Failed to fetch account details from configuration.");
            return Err(PollError::Credential(e));
        }
    };

    let settings = PollSettings {
        input_name: definition.stanza.name.clone(),
        start_time: params.get("start_time").map(str::to_string),
        category: params.get("category").map(str::to_string),
    };

    let mut poller = DropboxPoller::new(client, checkpoints, sink);
    poller.poll(&settings, &account.token).await
}
