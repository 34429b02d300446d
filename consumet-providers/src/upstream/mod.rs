//! Upstream Provider Client
//!
//! Pure HTTP client for a consumet-compatible JSON upstream. One client is one
//! session: it owns its cookie jar, so callers that need isolation between
//! resolutions construct a new client per use.
//!
//! # Example
//!
//! ```no_run
//! use consumet_providers::upstream::UpstreamClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = UpstreamClient::new("https://zoro.example.com")?;
//! let sources = client.watch("episode-1", Some("vidcloud"), false).await?;
//! println!("{} sources", sources.sources.len());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod types;

pub use client::{UpstreamClient, UpstreamClientBuilder};
pub use types::*;
