//! Connection descriptor types

/// Authentication method for a connection
///
/// Exactly one method is carried per connection; construction from raw
/// parameters lives in [`crate::params::SshParams::resolve`].
#[derive(Clone)]
pub enum AuthMethod {
    /// Password authentication
    Password(String),
    /// Private key authentication with the full key material in memory
    PrivateKey {
        /// Entire contents of the private key (PEM)
        key_data: String,
        /// Optional key passphrase
        passphrase: Option<String>,
    },
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print secret material
        match self {
            AuthMethod::Password(_) => f.write_str("Password(<redacted>)"),
            AuthMethod::PrivateKey { passphrase, .. } => f
                .debug_struct("PrivateKey")
                .field("key_data", &"<redacted>")
                .field("passphrase", &passphrase.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

/// Validated, immutable connection descriptor
///
/// Created once per operation and consumed by the session that opens the
/// connection.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Host address
    pub host: String,
    /// Port (default 22)
    pub port: u16,
    /// Username
    pub username: String,
    /// Authentication method
    pub auth: AuthMethod,
}

impl ConnectionConfig {
    /// Create a new connection descriptor with the default port
    pub fn new(host: impl Into<String>, username: impl Into<String>, auth: AuthMethod) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: username.into(),
            auth,
        }
    }

    /// Set custom port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}
