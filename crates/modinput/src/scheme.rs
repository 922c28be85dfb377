use std::fmt::Write as _;

use crate::definition::InputParameters;
use crate::xml;
use ta_common::error::{TaError, TaResult};

/// Shortest polling interval accepted for any input, in seconds.
pub const MINIMAL_INTERVAL: u64 = 30;

pub const DEFAULT_DESCRIPTION: &str =
    "Go to the add-on's configuration UI and configure modular inputs under the Inputs menu.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: &'static str,
    pub title: Option<&'static str>,
    pub description: Option<&'static str>,
    pub required_on_create: bool,
}

impl Argument {
    pub fn new(name: &'static str, required_on_create: bool) -> Self {
        Self {
            name,
            title: None,
            description: None,
            required_on_create,
        }
    }

    pub fn titled(mut self, title: &'static str, description: &'static str) -> Self {
        self.title = Some(title);
        self.description = Some(description);
        self
    }
}

/// Declarative description of the fields an input accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    pub title: &'static str,
    pub description: &'static str,
    pub use_external_validation: bool,
    pub streaming_mode_xml: bool,
    pub use_single_instance: bool,
    pub arguments: Vec<Argument>,
}

impl Scheme {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            description: DEFAULT_DESCRIPTION,
            use_external_validation: true,
            streaming_mode_xml: true,
            use_single_instance: true,
            arguments: Vec::new(),
        }
    }

    pub fn add_argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Render the scheme document the host reads from `--scheme`.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<scheme>");
        let _ = write!(
            out,
            "<title>{}</title><description>{}</description>",
            xml::text(self.title),
            xml::text(self.description)
        );
        let _ = write!(
            out,
            "<use_external_validation>{}</use_external_validation>",
            self.use_external_validation
        );
        let _ = write!(
            out,
            "<use_single_instance>{}</use_single_instance>",
            self.use_single_instance
        );
        if self.streaming_mode_xml {
            out.push_str("<streaming_mode>xml</streaming_mode>");
        } else {
            out.push_str("<streaming_mode>simple</streaming_mode>");
        }

        out.push_str("<endpoint><args>");
        for arg in &self.arguments {
            let _ = write!(out, "<arg name=\"{}\">", xml::attribute(arg.name));
            if let Some(title) = arg.title {
                let _ = write!(out, "<title>{}</title>", xml::text(title));
            }
            if let Some(description) = arg.description {
                let _ = write!(out, "<description>{}</description>", xml::text(description));
            }
            let _ = write!(
                out,
                "<required_on_create>{}</required_on_create>",
                u8::from(arg.required_on_create)
            );
            out.push_str("</arg>");
        }
        out.push_str("</args></endpoint></scheme>");
        out
    }
}

/// Implemented by every input: what it accepts and how a stanza is checked
/// before activation.
pub trait SchemeDescriptor {
    fn scheme(&self) -> Scheme;

    fn validate_input(&self, parameters: &InputParameters) -> TaResult<()>;
}

/// Parse `interval` and enforce [`MINIMAL_INTERVAL`].
pub fn validate_interval(parameters: &InputParameters) -> TaResult<u64> {
    let raw = parameters.require("interval")?;
    let interval: u64 = raw
        .trim()
        .parse()
        .map_err(|_| TaError::Validation(format!("Interval must be an integer, got {raw:?}")))?;

    if interval < MINIMAL_INTERVAL {
        return Err(TaError::Validation(format!(
            "Interval must be at least {MINIMAL_INTERVAL} seconds"
        )));
    }
    Ok(interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(interval: &str) -> InputParameters {
        InputParameters::new().with("interval", Some(interval))
    }

    #[test]
    fn interval_below_minimum_fails() {
        let err = validate_interval(&params("29")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation error: Interval must be at least 30 seconds"
        );
    }

    #[test]
    fn interval_at_minimum_passes() {
        assert_eq!(validate_interval(&params("30")).unwrap(), 30);
        assert_eq!(validate_interval(&params("3600")).unwrap(), 3600);
    }

    #[test]
    fn non_numeric_interval_fails() {
        assert!(validate_interval(&params("5m")).is_err());
        assert!(validate_interval(&params("-1")).is_err());
        assert!(validate_interval(&InputParameters::new()).is_err());
    }

    #[test]
    fn scheme_xml_lists_arguments() {
        let scheme = Scheme::new("Example <Input>")
            .add_argument(Argument::new("name", true).titled("Name", "Name"))
            .add_argument(Argument::new("interval", true))
            .add_argument(Argument::new("start_time", false));

        let xml = scheme.to_xml();
        assert!(xml.starts_with("<scheme><title>Example &lt;Input&gt;</title>"));
        assert!(xml.contains("<description>Go to the add-on's configuration UI"));
        assert!(xml.contains("<use_external_validation>true</use_external_validation>"));
        assert!(xml.contains("<streaming_mode>xml</streaming_mode>"));
        assert!(xml.contains(
            "<arg name=\"name\"><title>Name</title><description>Name</description><required_on_create>1</required_on_create></arg>"
        ));
        assert!(xml.contains(
            "<arg name=\"start_time\"><required_on_create>0</required_on_create></arg>"
        ));
        assert!(xml.ends_with("</args></endpoint></scheme>"));
    }
}
