//! Credential providers injected into the API client
//!
//! The client never reaches for ambient state to find a token; whoever
//! builds it decides where credentials come from.

use std::fmt;

/// Environment variable read by [`EnvToken`]
pub const TOKEN_ENV_VAR: &str = "CONTACTS_API_TOKEN";

/// Source of the bearer token attached to API requests
pub trait CredentialProvider: Send + Sync {
    /// Current token, or `None` to send the request unauthenticated
    fn bearer_token(&self) -> Option<String>;

    /// Short description for status output (never the token itself)
    fn describe(&self) -> String;
}

/// A fixed token, typically loaded from the config file
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticToken").field("token", &"<redacted>").finish()
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.token.clone())
    }

    fn describe(&self) -> String {
        format!("static token ({})", mask_token(&self.token))
    }
}

/// Reads the token from an environment variable on every request
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new(TOKEN_ENV_VAR)
    }
}

impl CredentialProvider for EnvToken {
    fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    fn describe(&self) -> String {
        format!("environment variable {}", self.var)
    }
}

/// Sends requests without an Authorization header
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn bearer_token(&self) -> Option<String> {
        None
    }

    fn describe(&self) -> String {
        "no credentials".to_string()
    }
}

/// Keep the last four characters of a token for display
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_token() {
        let provider = StaticToken::new("abc123xyz");
        assert_eq!(provider.bearer_token().as_deref(), Some("abc123xyz"));
        assert!(!provider.describe().contains("abc123"));
        assert!(!format!("{:?}", provider).contains("abc123"));
    }

    #[test]
    fn test_no_credentials() {
        assert_eq!(NoCredentials.bearer_token(), None);
    }

    #[test]
    fn test_env_token_missing_var() {
        let provider = EnvToken::new("CONTACTS_CLI_TEST_UNSET_TOKEN_VAR");
        assert_eq!(provider.bearer_token(), None);
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abcd"), "****");
        assert_eq!(mask_token("secret-token-9876"), "****9876");
    }
}
