//! HTTPS RPC agent.
//!
//! # Responsibilities
//! - Build a TLS client carrying the daemon key pair as client identity
//! - POST JSON command bodies to the service endpoint
//! - Decode the standard response envelope and surface node-side failures
//!
//! # Design Decisions
//! - Node certificates are self-signed per install, so server verification is
//!   disabled and trust rests on the mutual-TLS key pair
//! - The endpoint is constructed from the flattened config; an explicit
//!   constructor exists for tests and non-standard deployments

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{ConfigError, ConfigLoader, ResolverContext};
use crate::rpc::{RpcError, RpcResult, Service};

/// Key pair presented to the node as TLS client identity.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Where a service's RPC interface lives and how to authenticate to it.
#[derive(Debug, Clone)]
pub struct RpcEndpoint {
    pub host: String,
    pub port: u16,
    pub credentials: Option<ClientCredentials>,
}

impl RpcEndpoint {
    /// Endpoint with an explicit host and port, no client identity.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, cert_path: PathBuf, key_path: PathBuf) -> Self {
        self.credentials = Some(ClientCredentials {
            cert_path,
            key_path,
        });
        self
    }

    /// Build the endpoint for `service` from the node configuration.
    ///
    /// Reads `/self_hostname` and `/<section>/rpc_port` from the flattened
    /// config. Credential paths come from `/daemon_ssl/private_crt` and
    /// `/daemon_ssl/private_key` when present, falling back to the canonical
    /// locations under the root.
    pub fn for_service(
        service: Service,
        ctx: &ResolverContext,
        loader: &mut ConfigLoader,
    ) -> RpcResult<Self> {
        let config = loader.load(None)?;

        let host = config.get_str("/self_hostname")?.to_string();
        let port_key = format!("/{}/rpc_port", service.config_section());
        let port = config.get_int(&port_key)?;
        let port = u16::try_from(port).map_err(|_| ConfigError::TypeMismatch {
            key: port_key,
            expected: "port number",
            found: "integer",
        })?;

        let cert_path = config_credential(ctx, loader, "/daemon_ssl/private_crt")?
            .unwrap_or_else(|| ctx.daemon_cert_path().to_path_buf());
        let key_path = config_credential(ctx, loader, "/daemon_ssl/private_key")?
            .unwrap_or_else(|| ctx.daemon_key_path().to_path_buf());

        Ok(Self::new(host, port).with_credentials(cert_path, key_path))
    }
}

/// A credential path stored in the config, or `None` when the key is absent.
fn config_credential(
    ctx: &ResolverContext,
    loader: &mut ConfigLoader,
    canonical_path: &str,
) -> RpcResult<Option<PathBuf>> {
    match ctx.resolve_path_from_config(loader, canonical_path, None) {
        Ok(path) => Ok(Some(path)),
        Err(ConfigError::MissingKey(_)) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Request body for commands that take no parameters. Serializes to `{}`,
/// which is what the node expects instead of `null`.
#[derive(Debug, Serialize)]
pub(crate) struct NoParams {}

pub(crate) const NO_PARAMS: NoParams = NoParams {};

/// JSON-over-HTTPS client bound to one service endpoint.
pub struct RpcAgent {
    client: reqwest::Client,
    base_url: Url,
}

impl RpcAgent {
    /// Create an agent for `endpoint`, loading client credentials if set.
    pub fn new(endpoint: &RpcEndpoint) -> RpcResult<Self> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(true);

        if let Some(credentials) = &endpoint.credentials {
            let identity = load_identity(credentials)?;
            builder = builder.identity(identity);
        }

        let client = builder.build().map_err(RpcError::Tls)?;
        let base = format!("https://{}:{}/", endpoint.host, endpoint.port);
        let base_url = Url::parse(&base).map_err(|_| RpcError::Endpoint(base))?;

        tracing::debug!(url = %base_url, "RPC agent created");
        Ok(Self { client, base_url })
    }

    /// Send `command` with a JSON-serialized `params` body.
    pub async fn send<R, P>(&self, command: &str, params: &P) -> RpcResult<R>
    where
        R: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let url = self
            .base_url
            .join(command)
            .map_err(|_| RpcError::Endpoint(command.to_string()))?;

        let response = self
            .client
            .post(url)
            .json(params)
            .send()
            .await
            .map_err(|source| RpcError::Transport {
                command: command.to_string(),
                source,
            })?;

        let envelope: serde_json::Value =
            response
                .json()
                .await
                .map_err(|source| RpcError::Transport {
                    command: command.to_string(),
                    source,
                })?;

        decode_response(command, envelope)
    }

    /// Send a command that takes no parameters.
    pub async fn send_command<R>(&self, command: &str) -> RpcResult<R>
    where
        R: DeserializeOwned,
    {
        self.send(command, &NO_PARAMS).await
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl std::fmt::Debug for RpcAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcAgent")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

fn load_identity(credentials: &ClientCredentials) -> RpcResult<reqwest::Identity> {
    let read = |path: &Path| {
        fs::read(path).map_err(|source| RpcError::Credentials {
            path: path.to_path_buf(),
            source,
        })
    };

    // reqwest expects certificate and key concatenated in one PEM bundle.
    let mut pem = read(&credentials.cert_path)?;
    pem.push(b'\n');
    pem.extend(read(&credentials.key_path)?);

    reqwest::Identity::from_pem(&pem).map_err(RpcError::Tls)
}

/// Check the `{success, error?}` envelope, then decode the payload.
fn decode_response<R>(command: &str, envelope: serde_json::Value) -> RpcResult<R>
where
    R: DeserializeOwned,
{
    if let Some(false) = envelope.get("success").and_then(serde_json::Value::as_bool) {
        let message = envelope
            .get("error")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(RpcError::Api {
            command: command.to_string(),
            message,
        });
    }

    serde_json::from_value(envelope).map_err(|source| RpcError::Decode {
        command: command.to_string(),
        source,
    })
}

/// Standard empty response body for commands that return nothing beyond the
/// envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct EmptyResponse {}
