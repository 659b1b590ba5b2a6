//! Session token acquisition.
//!
//! The session backend is external; the pipeline only needs something that
//! can hand it the current bearer token, or say there is none.

use crate::config::AuthConfig;
use async_trait::async_trait;
use std::fmt;

/// Source of the current session's bearer token.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// The current bearer token, or `None` when there is no session.
    async fn access_token(&self) -> Option<String>;
}

/// A token known up front (CLI flag, tests).
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// A provider with no session.
    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Reads the token from config, resolving `${ENV_VAR}` references on every call.
#[derive(Debug, Clone)]
pub struct ConfigTokenProvider {
    raw: String,
}

impl ConfigTokenProvider {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            raw: config.access_token.clone(),
        }
    }
}

#[async_trait]
impl TokenProvider for ConfigTokenProvider {
    async fn access_token(&self) -> Option<String> {
        resolve_env_var(&self.raw)
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok()
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// A non-blank bearer token. Every pipeline call requires one.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a token, rejecting empty or whitespace-only values.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens never end up in logs.
impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}
