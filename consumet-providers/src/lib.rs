// Consumet Provider Clients
//
// Pure HTTP clients for upstream content sources. These clients know nothing
// about the `ProviderAdapter` trait or the resolution engine and can be used
// standalone.
//
// Architecture:
// - consumet-providers: HTTP clients speaking the upstream JSON dialect
// - consumet-core/provider: ProviderAdapter implementations calling these clients
// - consumet-core/resolution: ordered fallback across adapters

// Shared error types
pub mod error;

// HTTP clients
pub mod upstream;

pub use error::UpstreamError;
pub use upstream::UpstreamClient;
