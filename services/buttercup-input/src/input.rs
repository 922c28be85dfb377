use async_trait::async_trait;

use ta_common::error::{TaError, TaResult};
use ta_config::AppConfig;
use ta_modinput::{
    validate_interval, Argument, EventSink, InputDefinition, InputParameters, ModularInput,
    Scheme, SchemeDescriptor,
};

const IP_ADDR: &str = "ipAddr";

/// Template input keyed by a target address; collects nothing.
pub struct ButtercupInput;

impl SchemeDescriptor for ButtercupInput {
    fn scheme(&self) -> Scheme {
        Scheme::new("Buttercup")
            .add_argument(Argument::new("name", true).titled("Name", "Name"))
            .add_argument(Argument::new("interval", true))
            .add_argument(Argument::new(IP_ADDR, true))
    }

    fn validate_input(&self, parameters: &InputParameters) -> TaResult<()> {
        validate_interval(parameters).map(|_| ())
    }
}

#[async_trait]
impl ModularInput for ButtercupInput {
    type Error = TaError;

    async fn stream_events(
        &self,
        _app: &AppConfig,
        definition: &InputDefinition,
        _sink: &mut dyn EventSink,
    ) -> TaResult<()> {
        let ip_addr = definition.parameters.require(IP_ADDR)?;
        tracing::debug!(ip_addr, "buttercup input ready, nothing to collect");
        Ok(())
    }
}
