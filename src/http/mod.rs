//! HTTP layer: retrying requests with basic auth and status-aware errors.

mod client;
mod error;

pub use client::HttpClient;
pub use error::StatusError;
