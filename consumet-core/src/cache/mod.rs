pub mod backend;
pub mod key_builder;
pub mod redis_backend;
pub mod result_cache;
pub mod singleflight;
pub mod ttl;

pub use backend::{CacheBackend, MemoryBackend};
pub use key_builder::KeyBuilder;
pub use redis_backend::RedisBackend;
pub use result_cache::ResultCache;
pub use singleflight::{SingleFlight, SingleFlightError};
pub use ttl::TtlPolicy;
