use std::fmt;

use serde::Deserialize;

use ta_common::error::{TaError, TaResult};

/// Length bounds enforced on a string field of the account model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLength {
    pub min_len: usize,
    pub max_len: usize,
}

/// Declaration of one field of the account REST model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestField {
    pub name: &'static str,
    pub required: bool,
    pub encrypted: bool,
    pub validator: Option<StringLength>,
}

/// Fields accepted for an account object.
pub const ACCOUNT_MODEL: &[RestField] = &[
    RestField {
        name: "password",
        required: true,
        encrypted: true,
        validator: Some(StringLength {
            min_len: 1,
            max_len: 8192,
        }),
    },
    RestField {
        name: "token_help_link",
        required: false,
        encrypted: false,
        validator: None,
    },
];

/// One account stanza as stored in the account conf.
///
/// The access token lives in the shared `password` slot of the account
/// schema; `token` is accepted as an alias.
#[derive(Clone, Default, Deserialize)]
pub struct AccountStanza {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, alias = "token")]
    pub password: Option<String>,
    #[serde(default)]
    pub token_help_link: Option<String>,
}

impl AccountStanza {
    fn value_of(&self, field: &str) -> Option<&str> {
        match field {
            "password" => self.password.as_deref(),
            "token_help_link" => self.token_help_link.as_deref(),
            _ => None,
        }
    }

    /// Check the stanza against [`ACCOUNT_MODEL`].
    pub fn validate(&self) -> TaResult<()> {
        for field in ACCOUNT_MODEL {
            let value = match self.value_of(field.name) {
                Some(v) => v,
                None if field.required => {
                    return Err(TaError::Validation(format!(
                        "Required field is missing: {}",
                        field.name
                    )));
                }
                None => continue,
            };

            if let Some(len) = field.validator {
                let count = value.chars().count();
                if count < len.min_len || count > len.max_len {
                    return Err(TaError::Validation(format!(
                        "Invalid length for field {}: must be between {} and {} characters",
                        field.name, len.min_len, len.max_len
                    )));
                }
            }
        }
        Ok(())
    }

    /// Validate and turn the stanza into a resolved credential.
    pub fn into_credential(self) -> TaResult<AccountCredential> {
        self.validate()?;
        Ok(AccountCredential {
            username: self.username,
            token: self.password.unwrap_or_default(),
        })
    }
}

impl fmt::Debug for AccountStanza {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountStanza")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("token_help_link", &self.token_help_link)
            .finish()
    }
}

/// Resolved account: the bearer token used against the remote API.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountCredential {
    pub username: Option<String>,
    pub token: String,
}

impl fmt::Debug for AccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredential")
            .field("username", &self.username)
            .field("token", &"********")
            .finish()
    }
}
