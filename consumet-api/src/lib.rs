// Consumet API Library
//
// HTTP layer over consumet-core: content resolution routes, provider listing
// and health checks.

pub mod http;

// Re-export commonly used types
pub use http::{create_router, AppState};
