// Resolution
//
// Provider fallback: ordered, sequential adapter attempts with usability
// checks and an ordered record of every failure.

pub mod attempt;
pub mod engine;
pub mod order;
pub mod playability;
pub mod request;
pub mod result;

pub use attempt::{AttemptOutcome, ErrorAggregator, FailureKind, ProviderFailure, ResolutionAttempt};
pub use engine::ResolutionEngine;
pub use order::{attempt_order, recognized_hint};
pub use playability::{is_playable, Usable};
pub use request::{parse_flag, ResolutionRequest, SearchRequest};
pub use result::{Resolution, Resolved};
