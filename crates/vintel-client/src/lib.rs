//! Video Intelligence REST API client.
//!
//! This crate provides:
//! - Service account authentication via gcp_auth, with token caching
//! - Annotate submission returning a long-running operation name
//! - Operation polling with per-kind progress decoding
//! - An in-process status registry with time-based cached refresh

pub mod client;
pub mod config;
pub mod error;
pub mod token_cache;

pub use client::VideoIntelligenceClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use token_cache::{TokenCache, CLOUD_PLATFORM_SCOPE};
