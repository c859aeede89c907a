//! Provider credentials held in secure memory.
//!
//! API keys live in a `secrecy` box and print as `[REDACTED]`, so a stray
//! `?config` in a log line cannot leak them.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

use crate::error::{RagError, Result};

/// A secret string that won't be logged or displayed.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(value.into().into_boxed_str()))
    }

    /// Expose the secret value. Only call this when building a request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Key, model and endpoint for one model provider.
#[derive(Clone)]
pub struct AICredentials {
    pub api_key: SecretString,

    /// Model identifier sent with every request
    pub model: String,

    /// API base URL; the client default when `None`
    pub base_url: Option<String>,
}

impl AICredentials {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Read credentials from the environment.
    ///
    /// The key comes from the first non-empty variable in `key_vars`, so a
    /// provider-specific name can fall back to a shared one. The model
    /// variable is required; the base URL variable is optional.
    pub fn from_env(key_vars: &[&str], model_var: &str, base_url_var: &str) -> Result<Self> {
        let api_key = key_vars
            .iter()
            .find_map(|var| non_empty_var(var))
            .ok_or_else(|| RagError::Config(format!("none of {} is set", key_vars.join(", "))))?;
        let model = non_empty_var(model_var)
            .ok_or_else(|| RagError::Config(format!("{} is not set", model_var)))?;

        let credentials = Self::new(api_key, model);
        Ok(match non_empty_var(base_url_var) {
            Some(url) => credentials.with_base_url(url),
            None => credentials,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl fmt::Debug for AICredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AICredentials")
            .field("api_key", &self.api_key)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}
