// homelink-api: Async HTTP client for HomeBridge-compatible controllers.

pub mod auth;
pub mod cache;
pub mod client;
pub mod error;
pub mod transport;

pub use auth::{Credential, TokenManager};
pub use cache::CacheMode;
pub use client::ApiClient;
pub use error::Error;
pub use transport::TransportConfig;
