//! HTTP transport and retry handling for the Injection API.

mod retry;
mod transport;

pub use retry::RetryHandler;
pub use transport::{RawResponse, ReqwestTransport, Transport};
