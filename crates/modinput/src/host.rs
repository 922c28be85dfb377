use std::io::Write;
use std::process::ExitCode;

use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use tracing::Instrument;

use crate::definition::{InputDefinition, InputParameters, StanzaName};
use crate::scheme::SchemeDescriptor;
use crate::sink::{EventSink, XmlEventWriter};
use crate::xml;
use ta_config::{init_tracing, resolve_log_level, to_filter_directive, AppConfig};

/// An input the host can describe, validate and run.
#[async_trait]
pub trait ModularInput: SchemeDescriptor + Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run one invocation for `definition`, writing every event to `sink`.
    async fn stream_events(
        &self,
        app: &AppConfig,
        definition: &InputDefinition,
        sink: &mut dyn EventSink,
    ) -> Result<(), Self::Error>;
}

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the input scheme as XML.
    Scheme,
    /// Validate stanza parameters without running the input.
    Validate(StanzaArgs),
    /// Run one invocation of a stanza, streaming events to stdout.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
pub struct StanzaArgs {
    /// Polling interval in seconds.
    #[arg(long, env = "TA_INTERVAL")]
    pub interval: String,

    /// Configured account to authenticate with.
    #[arg(long, env = "TA_ACCOUNT")]
    pub account: Option<String>,

    /// First day to collect, `YYYY-MM-DD`.
    #[arg(long, env = "TA_START_TIME")]
    pub start_time: Option<String>,

    /// Optional event category filter.
    #[arg(long, env = "TA_CATEGORY")]
    pub category: Option<String>,

    /// Any other stanza parameter as `KEY=VALUE`; may be repeated.
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub extra: Vec<(String, String)>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

impl StanzaArgs {
    pub fn parameters(&self) -> InputParameters {
        let mut params = InputParameters::new()
            .with("interval", Some(self.interval.as_str()))
            .with("account", self.account.as_deref())
            .with("start_time", self.start_time.as_deref())
            .with("category", self.category.as_deref());
        for (key, value) in &self.extra {
            params = params.with(key, Some(value.as_str()));
        }
        params
    }
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Full stanza, e.g. `dropbox://team_audit`.
    #[arg(long, env = "TA_STANZA")]
    pub stanza: String,

    #[command(flatten)]
    pub params: StanzaArgs,
}

/// Entry point shared by the input binaries.
pub async fn main_with<I: ModularInput>(input: I) -> ExitCode {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    execute(&input, cli.command, &mut stdout).await
}

pub async fn execute<I, W>(input: &I, command: Command, stdout: &mut W) -> ExitCode
where
    I: ModularInput,
    W: Write + Send,
{
    match command {
        Command::Scheme => write_or_fail(stdout, &input.scheme().to_xml()),
        Command::Validate(args) => match input.validate_input(&args.parameters()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                let message = format!(
                    "<error><message>{}</message></error>",
                    xml::text(&e.to_string())
                );
                let _ = write_or_fail(stdout, &message);
                ExitCode::FAILURE
            }
        },
        Command::Run(args) => run_stanza(input, args, stdout).await,
    }
}

fn write_or_fail<W: Write>(stdout: &mut W, text: &str) -> ExitCode {
    match writeln!(stdout, "{text}").and_then(|()| stdout.flush()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run_stanza<I, W>(input: &I, args: RunArgs, stdout: &mut W) -> ExitCode
where
    I: ModularInput,
    W: Write + Send,
{
    let app = match AppConfig::from_env() {
        Ok(app) => app,
        Err(e) => {
            init_tracing("info");
            tracing::error!(error = %e, "failed to load add-on configuration");
            return ExitCode::FAILURE;
        }
    };

    let (level, level_error) = resolve_log_level(&app.settings_conf_path());
    init_tracing(to_filter_directive(&level));
    if let Some(e) = level_error {
        tracing::error!(
            error = %e,
            "Failed to fetch the log details from the configuration taking INFO as default level."
        );
    }

    let stanza = match StanzaName::parse(&args.stanza) {
        Ok(stanza) => stanza,
        Err(e) => {
            tracing::error!(error = %e, "invalid stanza");
            return ExitCode::FAILURE;
        }
    };
    let definition = InputDefinition {
        stanza,
        parameters: args.params.parameters(),
    };

    let span = tracing::info_span!(
        "modinput",
        logger = %app.logger_name(),
        stanza = %definition.stanza
    );

    async {
        if let Err(e) = input.validate_input(&definition.parameters) {
            tracing::error!(error = %e, "stanza failed validation");
            return ExitCode::FAILURE;
        }

        tracing::debug!("Modular input invoked.");

        let mut sink = XmlEventWriter::new(&mut *stdout);
        let outcome = input.stream_events(&app, &definition, &mut sink).await;
        let closed = sink.close().await;

        if let Err(e) = outcome {
            tracing::error!(error = %e, "modular input failed");
            return ExitCode::FAILURE;
        }
        if let Err(e) = closed {
            tracing::error!(error = %e, "failed to close event stream");
            return ExitCode::FAILURE;
        }

        tracing::debug!("Modular input completed");
        ExitCode::SUCCESS
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::{validate_interval, Argument, Scheme};
    use ta_common::error::{TaError, TaResult};

    struct NoopInput;

    impl SchemeDescriptor for NoopInput {
        fn scheme(&self) -> Scheme {
            Scheme::new("Noop").add_argument(Argument::new("interval", true))
        }

        fn validate_input(&self, parameters: &InputParameters) -> TaResult<()> {
            validate_interval(parameters).map(|_| ())
        }
    }

    #[async_trait]
    impl ModularInput for NoopInput {
        type Error = TaError;

        async fn stream_events(
            &self,
            _app: &AppConfig,
            _definition: &InputDefinition,
            _sink: &mut dyn EventSink,
        ) -> Result<(), TaError> {
            Ok(())
        }
    }

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(args).expect("valid args").command
    }

    #[test]
    fn parses_run_arguments() {
        let command = parse(&[
            "input",
            "run",
            "--stanza",
            "dropbox://team_audit",
            "--interval",
            "300",
            "--account",
            "audit",
            "--start-time",
            "2024-01-15",
        ]);
        let Command::Run(args) = command else {
            panic!("expected run subcommand");
        };
        assert_eq!(args.stanza, "dropbox://team_audit");
        let params = args.params.parameters();
        assert_eq!(params.get("interval"), Some("300"));
        assert_eq!(params.get("start_time"), Some("2024-01-15"));
        assert_eq!(params.get("category"), None);
    }

    #[test]
    fn extra_params_are_passed_through() {
        let Command::Validate(args) = parse(&[
            "input",
            "validate",
            "--interval",
            "60",
            "--param",
            "ipAddr=10.0.0.7",
            "--param",
            "note=a=b",
        ]) else {
            panic!("expected validate subcommand");
        };
        let params = args.parameters();
        assert_eq!(params.get("ipAddr"), Some("10.0.0.7"));
        assert_eq!(params.get("note"), Some("a=b"));
    }

    #[test]
    fn extra_param_without_separator_is_rejected() {
        let result = Cli::try_parse_from(["input", "validate", "--interval", "60", "--param", "ipAddr"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn scheme_prints_xml() {
        let mut out = Vec::new();
        let code = execute(&NoopInput, Command::Scheme, &mut out).await;
        assert_eq!(code, ExitCode::SUCCESS);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("<scheme><title>Noop</title>"));
    }

    #[tokio::test]
    async fn validate_reports_error_xml() {
        let mut out = Vec::new();
        let command = parse(&["input", "validate", "--interval", "29"]);
        let code = execute(&NoopInput, command, &mut out).await;
        assert_eq!(code, ExitCode::FAILURE);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("<error><message>validation error: Interval must be at least 30 seconds</message></error>"));
    }

    #[tokio::test]
    async fn validate_accepts_minimum_interval() {
        let mut out = Vec::new();
        let command = parse(&["input", "validate", "--interval", "30"]);
        assert_eq!(execute(&NoopInput, command, &mut out).await, ExitCode::SUCCESS);
        assert!(out.is_empty());
    }
}
