pub mod client;
pub mod request;
pub mod response;

pub use client::UpstreamRequest;
pub use response::{error_response, relay_response};
