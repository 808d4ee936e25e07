//! REST variant: adapter, HTTP client, and wire types.

pub mod backend;
pub mod client;
pub mod wire;

pub use backend::RestBackend;
pub use client::RestClient;
