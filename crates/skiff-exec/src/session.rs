//! SSH transport session using the russh crate

use std::sync::Arc;
use std::time::Duration;

use russh::keys::ssh_key;
use russh::keys::{PrivateKeyWithHashAlg, decode_secret_key};
use russh::{Channel, Disconnect, client};
use tokio::time::timeout;
use tracing::{info, instrument, warn};

use crate::auth::{AuthMethod, ConnectionConfig};
use crate::error::ExecError;

/// Time allowed for the TCP connect and SSH handshake
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// SSH client handler for russh
#[derive(Debug)]
struct SshClientHandler;

impl client::Handler for SshClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        // Accept all server keys (like StrictHostKeyChecking=no);
        // host-key verification policy is out of scope here
        Ok(true)
    }
}

/// An open, authenticated connection to a single host
///
/// Created per operation and closed once the operation completes; sessions
/// are never pooled or shared. At most one command runs per session.
pub struct SshSession {
    host: String,
    handle: Option<client::Handle<SshClientHandler>>,
}

impl std::fmt::Debug for SshSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshSession")
            .field("host", &self.host)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl SshSession {
    /// Connect and authenticate using the given descriptor
    ///
    /// # Errors
    /// `ExecError::ConnectTimeout` if nothing answers within the connect
    /// timeout, `ExecError::Connect` on handshake failure, `ExecError::Auth`
    /// if authentication is rejected or the key material cannot be decoded.
    #[instrument(skip(config), fields(host = %config.host, port = config.port))]
    pub async fn open(config: &ConnectionConfig) -> Result<Self, ExecError> {
        info!(
            host = %config.host,
            port = config.port,
            user = %config.username,
            "connecting to SSH"
        );

        let russh_config = Arc::new(client::Config::default());
        let handler = SshClientHandler;

        let connect_fut = client::connect(
            russh_config,
            (&config.host[..], config.port),
            handler,
        );
        let mut handle = match timeout(CONNECT_TIMEOUT, connect_fut).await {
            Ok(Ok(handle)) => handle,
            Ok(Err(e)) => return Err(ExecError::Connect(e.to_string())),
            Err(_) => {
                return Err(ExecError::ConnectTimeout {
                    timeout: CONNECT_TIMEOUT,
                });
            }
        };

        authenticate(&mut handle, config).await?;

        info!(host = %config.host, "SSH connected and authenticated");

        Ok(Self {
            host: config.host.clone(),
            handle: Some(handle),
        })
    }

    /// Host this session is bound to
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether the session is still open
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Open a session channel for one command or subsystem
    ///
    /// # Errors
    /// `ExecError::NotConnected` after close, `ExecError::Channel` if the
    /// channel cannot be established.
    pub async fn open_channel(&mut self) -> Result<Channel<client::Msg>, ExecError> {
        let handle = self.handle.as_mut().ok_or(ExecError::NotConnected)?;
        handle
            .channel_open_session()
            .await
            .map_err(|e| ExecError::Channel(e.to_string()))
    }

    /// Disconnect from the remote host
    ///
    /// Idempotent; safe to call after a partial failure.
    pub async fn close(&mut self) -> Result<(), ExecError> {
        if let Some(handle) = self.handle.take() {
            handle
                .disconnect(Disconnect::ByApplication, "", "English")
                .await
                .map_err(|e| ExecError::Io(e.to_string()))?;
            info!(host = %self.host, "SSH disconnected");
        }
        Ok(())
    }

    /// Close, logging instead of propagating teardown failures
    pub async fn close_quietly(&mut self) {
        if let Err(e) = self.close().await {
            warn!(host = %self.host, error = %e, "failed to close SSH session");
        }
    }
}

async fn authenticate(
    handle: &mut client::Handle<SshClientHandler>,
    config: &ConnectionConfig,
) -> Result<(), ExecError> {
    match &config.auth {
        AuthMethod::Password(password) => {
            let auth_res = handle
                .authenticate_password(&config.username, password)
                .await
                .map_err(|e| ExecError::Auth(e.to_string()))?;

            if !auth_res.success() {
                return Err(ExecError::Auth(
                    "password authentication failed".to_string(),
                ));
            }
        }
        AuthMethod::PrivateKey {
            key_data,
            passphrase,
        } => {
            let key_pair = decode_secret_key(key_data, passphrase.as_deref())
                .map_err(|e| ExecError::Auth(e.to_string()))?;

            let hash_alg = handle
                .best_supported_rsa_hash()
                .await
                .ok()
                .flatten()
                .flatten();
            let auth_res = handle
                .authenticate_publickey(
                    &config.username,
                    PrivateKeyWithHashAlg::new(Arc::new(key_pair), hash_alg),
                )
                .await
                .map_err(|e| ExecError::Auth(e.to_string()))?;

            if !auth_res.success() {
                return Err(ExecError::Auth(
                    "public key authentication failed".to_string(),
                ));
            }
        }
    }
    Ok(())
}
