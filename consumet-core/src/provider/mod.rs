// Provider System
//
// Two-tier architecture:
//
// Tier 1: consumet-providers (pure upstream HTTP clients)
//   - UpstreamClient, no dependency on ProviderAdapter
//
// Tier 2: consumet-core/provider (adapters + registry)
//   - ProviderAdapter trait, the fixed contract every adapter satisfies
//   - UpstreamAdapter, ProviderAdapter over an UpstreamClient
//   - ProviderRegistry, compile-time catalog of descriptors + factories
//
// The registry never hands out shared adapter instances: every attempt gets
// a fresh adapter from the provider's factory.

// Core traits and types
pub mod catalog;
pub mod error;
pub mod registry;
pub mod server;
pub mod traits;

// Adapter implementations
pub mod upstream;

pub use error::*;
pub use registry::*;
pub use server::StreamingServer;
pub use traits::*;

pub use upstream::{UpstreamAdapter, UpstreamSettings};
