//! HTTP module
//!
//! The list-page transport. [`ListTransport`] is the seam the page fetcher
//! talks to; [`HttpClient`] implements it over reqwest.
//!
//! Retries, backoff and caching are not done here. One call is one request.

mod client;
mod types;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use types::{ListRequest, ListResponse, ListTransport};
