use async_trait::async_trait;

use ta_common::error::{TaError, TaResult};
use ta_config::AppConfig;
use ta_modinput::{
    validate_interval, Argument, EventSink, InputDefinition, InputParameters, ModularInput,
    Scheme, SchemeDescriptor,
};
use ta_store::account::conf_repository::ConfCredentialProvider;
use ta_store::account::models::AccountCredential;
use ta_store::account::repositories::CredentialProvider;
use ta_store::checkpoint::file_repository::FileCheckpointStore;
use ta_store::checkpoint::models::PollCheckpoint;

/// Template input: resolves its account and checkpoint, collects nothing.
pub struct ExampleInput;

impl SchemeDescriptor for ExampleInput {
    fn scheme(&self) -> Scheme {
        Scheme::new("Example Input")
            .add_argument(Argument::new("name", true).titled("Name", "Name"))
            .add_argument(Argument::new("interval", true))
            .add_argument(Argument::new("account", true))
    }

    fn validate_input(&self, parameters: &InputParameters) -> TaResult<()> {
        validate_interval(parameters).map(|_| ())
    }
}

#[async_trait]
impl ModularInput for ExampleInput {
    type Error = TaError;

    async fn stream_events(
        &self,
        app: &AppConfig,
        definition: &InputDefinition,
        _sink: &mut dyn EventSink,
    ) -> TaResult<()> {
        let credentials = ConfCredentialProvider::new(app.account_conf_path());
        let checkpoints = FileCheckpointStore::open(app.require_checkpoint_dir()?).await?;

        let (_account, checkpoint) = prepare(&credentials, &checkpoints, definition).await?;
        tracing::debug!(
            input = %checkpoint.input_identity,
            resume = checkpoint.cursor.is_some(),
            "example input ready, nothing to collect"
        );
        Ok(())
    }
}

/// Resolve everything a real collector would need before its first request.
pub async fn prepare<P>(
    credentials: &P,
    checkpoints: &FileCheckpointStore,
    definition: &InputDefinition,
) -> TaResult<(AccountCredential, PollCheckpoint)>
where
    P: CredentialProvider + ?Sized,
{
    let account_name = definition.parameters.require("account")?;
    let account = credentials.resolve(account_name).await.map_err(|e| {
        tracing::error!(account = account_name, error = %e, "Failed to fetch account details from configuration.");
        e
    })?;
    let checkpoint = PollCheckpoint::load(checkpoints, &definition.stanza.name).await?;
    Ok((account, checkpoint))
}
