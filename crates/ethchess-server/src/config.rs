//! Server configuration.

use std::net::SocketAddr;

/// Where the browser lands after a successful login.
pub const LANDING_PATH: &str = "/dashboard";

/// Error-display surface for authorization-flow failures.
pub const ERROR_PATH: &str = "/auth/error";

/// Where logout sends the browser.
pub const HOME_PATH: &str = "/";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Externally visible base URL, used to build the OAuth
    /// redirect URI. No trailing slash.
    pub base_url: String,

    /// Mark cookies `Secure`. Enabled in production deployments.
    pub secure_cookies: bool,

    /// Accept a `verifier` query parameter on the callback when the
    /// cookie is missing. Debug affordance only; weakens PKCE's
    /// anti-interception guarantee, so it is off by default.
    pub verifier_param_fallback: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3007".parse().unwrap(),
            base_url: "http://localhost:3007".to_string(),
            secure_cookies: false,
            verifier_param_fallback: false,
        }
    }
}

impl ServerConfig {
    /// Create a config for the given externally visible base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            ..Default::default()
        }
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Mark cookies `Secure` (production deployments behind TLS).
    pub fn with_secure_cookies(mut self, enabled: bool) -> Self {
        self.secure_cookies = enabled;
        self
    }

    /// Enable or disable the `verifier` query-parameter fallback on
    /// the callback.
    pub fn with_verifier_param_fallback(mut self, enabled: bool) -> Self {
        self.verifier_param_fallback = enabled;
        self
    }

    /// The OAuth redirect URI. Must be byte-identical at
    /// authorization time and at token-exchange time.
    pub fn callback_url(&self) -> String {
        format!("{}/callback", self.base_url)
    }

    /// Relative redirect to the error surface carrying a reason string.
    pub fn error_redirect(&self, reason: &str) -> String {
        format!("{}?error={}", ERROR_PATH, urlencoding::encode(reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_url_has_no_double_slash() {
        let config = ServerConfig::new("http://localhost:3007/");
        assert_eq!(config.callback_url(), "http://localhost:3007/callback");
    }

    #[test]
    fn test_error_redirect_encodes_reason() {
        let config = ServerConfig::default();
        assert_eq!(
            config.error_redirect("Token request failed: bad code"),
            "/auth/error?error=Token%20request%20failed%3A%20bad%20code"
        );
    }

    #[test]
    fn test_defaults_are_development_safe() {
        let config = ServerConfig::default();
        assert!(!config.secure_cookies);
        assert!(!config.verifier_param_fallback);
    }
}
