use super::{SecretError, SecretStore};
use async_trait::async_trait;

const ENV_PREFIX: &str = "INGESTA_SECRET_";

/// Reads secrets from the process environment.
///
/// `accounting-client-key` is looked up as `INGESTA_SECRET_ACCOUNTING_CLIENT_KEY`. The
/// variable is read on every call, so rotating it in place takes effect immediately.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn new() -> Self {
        EnvSecretStore
    }

    pub fn variable_name(key_id: &str) -> String {
        let suffix: String = key_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", ENV_PREFIX, suffix)
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_current_secret(&self, key_id: &str) -> Result<String, SecretError> {
        let name = Self::variable_name(key_id);
        match std::env::var(&name) {
            Ok(value) if !value.is_empty() => Ok(value),
            Ok(_) | Err(std::env::VarError::NotPresent) => Err(SecretError::NotFound(name)),
            Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::InvalidPayload(format!(
                "{} is not valid UTF-8",
                name
            ))),
        }
    }
}
