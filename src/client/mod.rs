//! Client layer: signs and dispatches requests and maps responses to results.

mod account;
mod billing;
mod calls;
mod devices;
mod dids;
mod messaging;
mod pbx;
mod routing;
mod system;
mod tariffs;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::config::{Config, ConfigError};
use crate::domain::{KnownApiError, ValidationError};
use crate::transport::{self, Credentials, DecodeError, Form, Operation};
use crate::xml::{self, XmlError, XmlNode};

const LOG_BODY_LIMIT: usize = 500;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`KolmisoftClient`].
///
/// - transport failures (network errors, non-2xx statuses),
/// - unparseable XML bodies,
/// - failures reported by the API itself (`Api` for recognized strings,
///   `UnknownApi` for anything else),
/// - validation and configuration failures.
pub enum KolmisoftError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body is not well-formed XML. `body` is the raw response.
    #[error("parse error: {source}")]
    Parse {
        body: String,
        #[source]
        source: XmlError,
    },

    /// The API reported a failure this endpoint documents.
    #[error("API error: {error}")]
    Api {
        code: KnownApiError,
        error: String,
        message: Option<String>,
    },

    /// The API reported a failure string this endpoint does not document.
    #[error("unknown API error: {error}")]
    UnknownApi {
        error: String,
        message: Option<String>,
    },

    /// A success document did not have the promised shape.
    #[error("unexpected response: {0}")]
    Decode(#[from] DecodeError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Client configuration is unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl KolmisoftError {
    /// The recognized API failure, if this is one.
    pub fn api_code(&self) -> Option<KnownApiError> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Raw error string reported by the API, recognized or not.
    pub fn api_error(&self) -> Option<&str> {
        match self {
            Self::Api { error, .. } | Self::UnknownApi { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`KolmisoftClient`].
///
/// Use this when you need to customize the timeout, user-agent, or password policy.
pub struct KolmisoftClientBuilder {
    config: Config,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    send_password_always: bool,
}

impl KolmisoftClientBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            timeout: None,
            user_agent: None,
            send_password_always: false,
        }
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Send the configured password (`p`) on every request, not only on
    /// endpoints that authenticate the login.
    pub fn send_password_always(mut self, enabled: bool) -> Self {
        self.send_password_always = enabled;
        self
    }

    /// Build a [`KolmisoftClient`].
    pub fn build(self) -> Result<KolmisoftClient, KolmisoftError> {
        let api_url = self.config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| KolmisoftError::Transport(Box::new(err)))?;

        Ok(KolmisoftClient {
            api_url,
            config: Arc::new(self.config),
            send_password_always: self.send_password_always,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level MOR API client.
///
/// Every call validates its request at construction time, signs the form
/// parameters, posts them to `{api_url}/api/<endpoint>` and maps the XML
/// response. The client holds no mutable state and can be cloned freely.
pub struct KolmisoftClient {
    api_url: String,
    config: Arc<Config>,
    send_password_always: bool,
    http: Arc<dyn HttpTransport>,
}

impl KolmisoftClient {
    /// Create a client with default HTTP settings.
    ///
    /// For more customization, use [`KolmisoftClient::builder`].
    pub fn new(config: Config) -> Result<Self, KolmisoftError> {
        KolmisoftClientBuilder::new(config).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(config: Config) -> KolmisoftClientBuilder {
        KolmisoftClientBuilder::new(config)
    }

    /// Run one API call and map its response to the typed result.
    ///
    /// Errors:
    /// - [`KolmisoftError::Transport`] / [`KolmisoftError::HttpStatus`] for transport failures,
    /// - [`KolmisoftError::Parse`] when the body is not XML,
    /// - [`KolmisoftError::Api`] / [`KolmisoftError::UnknownApi`] when the API reports an error,
    /// - [`KolmisoftError::Decode`] when a success document lacks a required element.
    pub async fn execute<O: Operation>(&self, operation: &O) -> Result<O::Output, KolmisoftError> {
        let root = self.dispatch(O::ENDPOINT, operation.encode()).await?;

        if let Some(failure) = O::failure(&root) {
            debug!(
                "MOR API {} reported error: {}",
                O::ENDPOINT.path,
                failure.error
            );
            return Err(match failure.code.or_else(|| O::classify(&failure.error)) {
                Some(code) => KolmisoftError::Api {
                    code,
                    error: failure.error,
                    message: failure.message,
                },
                None => KolmisoftError::UnknownApi {
                    error: failure.error,
                    message: failure.message,
                },
            });
        }

        Ok(O::decode(&root)?)
    }

    /// Run one API call and return the parsed document untouched.
    ///
    /// Error elements are not inspected; only transport and XML parse
    /// failures are reported.
    pub async fn execute_raw<O: Operation>(
        &self,
        operation: &O,
    ) -> Result<XmlNode, KolmisoftError> {
        self.dispatch(O::ENDPOINT, operation.encode()).await
    }

    async fn dispatch(
        &self,
        endpoint: &transport::Endpoint,
        mut form: Form,
    ) -> Result<XmlNode, KolmisoftError> {
        if !form.contains("u") {
            form.set("u", &self.config.username);
        }
        let wants_password = self.send_password_always
            || endpoint.credentials == Credentials::UsernamePassword;
        if wants_password && !form.contains("p") {
            form.set("p", &self.config.password);
        }
        if self.config.use_hash {
            let hash = transport::sign(
                form.params(),
                form.hash_keys(&self.config.username),
                &self.config.auth_key,
            );
            form.set("hash", hash);
        }

        let url = self.endpoint_url(endpoint, form.path_segment())?;
        let names: Vec<&str> = form.params().iter().map(|(key, _)| key.as_str()).collect();
        debug!(
            "MOR API request: endpoint={}, params={:?}, hashed={}",
            endpoint.path, names, self.config.use_hash
        );

        let response = self
            .http
            .post_form(&url, form.into_params())
            .await
            .map_err(KolmisoftError::Transport)?;

        if !(200..=299).contains(&response.status) {
            warn!(
                "MOR API request failed: endpoint={}, status={}, body={}",
                endpoint.path,
                response.status,
                truncate_str(&response.body, LOG_BODY_LIMIT)
            );
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(KolmisoftError::HttpStatus {
                status: response.status,
                body,
            });
        }

        trace!("MOR API response body: {}", response.body);

        xml::parse(&response.body).map_err(|source| KolmisoftError::Parse {
            body: response.body,
            source,
        })
    }

    fn endpoint_url(
        &self,
        endpoint: &transport::Endpoint,
        segment: Option<&str>,
    ) -> Result<String, KolmisoftError> {
        let base = format!("{}{}", self.api_url, endpoint.path);
        let Some(segment) = segment else {
            return Ok(base);
        };

        let mut url = url::Url::parse(&base).map_err(|_| ConfigError::InvalidUrl {
            input: base.clone(),
        })?;
        url.path_segments_mut()
            .map_err(|_| ConfigError::InvalidUrl {
                input: base.clone(),
            })?
            .pop_if_empty()
            .push(segment);
        Ok(url.into())
    }
}

fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
