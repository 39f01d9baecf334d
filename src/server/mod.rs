pub mod gateway;
pub mod rejection;
pub mod routes;

pub use gateway::{GatewayServer, ServingHandle};
pub use rejection::handle_rejection;

/// Read-only state shared by all requests.
pub struct GatewayState {
    pub client: reqwest::Client,
    pub ollama_url: String,
}
