pub mod provider;
pub mod resolution;
pub mod cache;
pub mod service;
pub mod config;
pub mod error;
pub mod logging;
pub mod bootstrap;
pub mod resilience;

#[cfg(test)]
pub mod test_helpers;

pub use config::Config;
pub use error::{Error, Result};
pub use cache::{KeyBuilder, ResultCache};
pub use resolution::{Resolution, ResolutionEngine, ResolutionRequest};
