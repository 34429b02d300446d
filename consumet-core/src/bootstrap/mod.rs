//! Bootstrap module for initializing the consumet server
//!
//! This module handles:
//! - Configuration loading
//! - Provider registry construction from the catalog
//! - Cache backend selection and service wiring

pub mod config;
pub mod services;

pub use config::{load_config, log_summary};
pub use services::{build_registry, init_services, Services};
