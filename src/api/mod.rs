// Posts API module.
// Provides the HTTP client, endpoint functions, and response types.

pub mod client;
pub mod endpoints;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use client::ApiClient;
pub use endpoints::PostsApi;
pub use types::*;
