pub mod binding;
pub mod configs;
pub mod error;
mod session;
pub mod state;
mod transport;

pub use configs::ClientConfig;
pub use error::{
    BindingError, DispatchError, ErrorTag, OrchestratorError, RequestError, StoreError,
    TransportError,
};
pub use session::{Dispatch, Outcome, Phase, Session, Ticket};
pub use state::ConfigStore;
pub use transport::{HttpClient, HttpTransport, Transport};

/// Connects to the backend named by `WEBAPI_URL` and returns a fresh session.
///
/// # Errors
/// Returns an `OrchestratorError` if the variable is missing or invalid, or
/// if the HTTP client cannot be built.
pub fn connect() -> Result<(Session, HttpTransport), OrchestratorError> {
    let config = ClientConfig::from_env()?;
    log::info!("using backend at {}", config.endpoint);
    let transport = HttpTransport::new(&config)?;
    Ok((Session::new(), transport))
}
