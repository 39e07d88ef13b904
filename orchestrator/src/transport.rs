use comms::{Request, Response};
use tokio::runtime::{Builder, Runtime};

use crate::{configs::ClientConfig, error::TransportError};

/// Sends one request and waits for its response.
pub trait Transport {
    fn send(&mut self, request: &Request) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, request: &Request) -> Result<Response, TransportError> {
        (**self).send(request)
    }
}

/// Async client posting JSON envelopes to the backend endpoint.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("ml-playground/", env!("CARGO_PKG_VERSION")));
        if !config.use_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts the request and decodes the response envelope.
    ///
    /// # Errors
    /// Returns a `TransportError` if the exchange fails, the status is not a
    /// success, or the body is not an envelope.
    pub async fn post(&self, request: &Request) -> Result<Response, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        log::debug!("received {} byte(s) for {}", body.len(), request.req);
        Ok(serde_json::from_str(&body)?)
    }
}

/// Blocking transport that drives an [`HttpClient`] on its own runtime.
pub struct HttpTransport {
    runtime: Runtime,
    client: HttpClient,
}

impl HttpTransport {
    /// Creates a new `HttpTransport`.
    ///
    /// # Arguments
    /// * `config` - The endpoint to post to.
    ///
    /// # Returns
    /// A new `HttpTransport` or an error if the runtime or client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, crate::OrchestratorError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let client = HttpClient::new(config)?;
        Ok(Self { runtime, client })
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

impl Transport for HttpTransport {
    fn send(&mut self, request: &Request) -> Result<Response, TransportError> {
        self.runtime.block_on(self.client.post(request))
    }
}
