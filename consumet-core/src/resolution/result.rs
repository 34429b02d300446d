//! Outcome of a resolution

use serde::{Deserialize, Serialize};

use super::attempt::{ProviderFailure, ResolutionAttempt};

/// Winning value plus the trail that led to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolved<T> {
    pub provider_used: String,
    #[serde(flatten)]
    pub value: T,
    #[serde(default)]
    pub attempts: Vec<ResolutionAttempt>,
    /// Failures of the providers tried before the winner
    #[serde(default)]
    pub errors: Vec<ProviderFailure>,
}

/// Result of walking the attempt order
///
/// Exhaustion is an ordinary value; callers map it to a not-found response.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Resolved(Resolved<T>),
    Exhausted {
        tried_providers: Vec<String>,
        errors: Vec<ProviderFailure>,
    },
}

impl<T> Resolution<T> {
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    #[must_use]
    pub fn resolved(self) -> Option<Resolved<T>> {
        match self {
            Self::Resolved(r) => Some(r),
            Self::Exhausted { .. } => None,
        }
    }
}
