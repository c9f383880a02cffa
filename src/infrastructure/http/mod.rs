//! HTTP client seam shared by all provider implementations

mod client;

pub use client::{HttpClient, HttpClientTrait};

#[cfg(test)]
pub use client::mock::MockHttpClient;
