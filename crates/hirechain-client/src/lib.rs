//! Rust client for the HireChain marketplace REST API
//!
//! The backend owns every entity and every state transition; this crate is
//! a consumer. It normalizes all failures into [`ApiError`] values whose
//! `Display` is a user-presentable message, attaches the bearer token from
//! an injectable [`TokenStore`], and exposes typed methods for each
//! endpoint the application calls.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hirechain_client::{ApiClient, ApiConfig, MemoryTokenStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(ApiConfig::default(), Arc::new(MemoryTokenStore::new()));
//!
//! // Typed endpoint layer
//! let gigs = client.list_gigs().await?;
//!
//! // Generic verb layer
//! let raw: serde_json::Value = client.get("/api/gigs", &[]).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod token;
pub mod types;

// Re-export main types
pub use client::ApiClient;
pub use error::{ApiError, Result, DEFAULT_ERROR_MESSAGE};
pub use token::{MemoryTokenStore, TokenStore};
pub use types::*;
