use std::time::Duration;

/// Default server address used by the demo driver.
pub const DEFAULT_BASE_URL: &str = "https://localhost:8080";

/// Settings for one long-lived `Session`.
///
/// Certificate verification stays on unless `accept_invalid_certs` is set;
/// test servers with self-signed certificates need it switched off
/// explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub base_url: String,
    pub accept_invalid_certs: bool,
    /// Overall per-call timeout. `None` leaves the HTTP library's default.
    pub timeout: Option<Duration>,
}

impl SessionConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            accept_invalid_certs: false,
            timeout: None,
        }
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
