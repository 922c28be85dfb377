use std::collections::BTreeMap;
use std::fmt;

use ta_common::error::{TaError, TaResult};

/// Identity of one configured input, written `<scheme>://<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StanzaName {
    pub scheme: Option<String>,
    pub name: String,
}

impl StanzaName {
    /// Split a full stanza into scheme and short name. A bare name without
    /// `://` is accepted as the short name itself.
    pub fn parse(raw: &str) -> TaResult<Self> {
        let (scheme, name) = match raw.split_once("://") {
            Some((scheme, name)) => (Some(scheme.to_owned()), name),
            None => (None, raw),
        };

        if name.trim().is_empty() {
            return Err(TaError::Validation(format!(
                "stanza {raw:?} has no input name"
            )));
        }

        Ok(Self {
            scheme,
            name: name.to_owned(),
        })
    }
}

impl fmt::Display for StanzaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scheme {
            Some(scheme) => write!(f, "{scheme}://{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Raw key/value parameters of a stanza as collected by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputParameters(BTreeMap<String, String>);

impl InputParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, skipping `None` so optional flags stay absent.
    pub fn with(mut self, key: &str, value: Option<impl Into<String>>) -> Self {
        if let Some(v) = value {
            self.0.insert(key.to_owned(), v.into());
        }
        self
    }

    /// Value of `key`; blank strings read as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn require(&self, key: &str) -> TaResult<&str> {
        self.get(key)
            .ok_or_else(|| TaError::Validation(format!("Required parameter is missing: {key}")))
    }
}

/// One stanza handed to an input for a single invocation.
#[derive(Debug, Clone)]
pub struct InputDefinition {
    pub stanza: StanzaName,
    pub parameters: InputParameters,
}
