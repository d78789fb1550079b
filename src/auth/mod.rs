//! Credential module
//!
//! Credentials are acquired elsewhere (a token exchange service). This module
//! only models the resulting per-partition credential and the provider seam
//! the document client asks for one.

mod provider;
mod types;

pub use provider::{StaticTokenProvider, TokenProvider};
pub use types::TokenResult;

#[cfg(test)]
mod tests;
