//! Attempt records and the per-resolution error aggregator

use serde::{Deserialize, Serialize};

/// Why an attempt did not end the resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// Transport, parse or timeout failure inside the adapter
    ProviderError,
    /// Call succeeded but no source passed the playability check
    NoPlayableSources,
    /// Call succeeded with an empty list
    EmptyResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AttemptOutcome {
    Success,
    Failure { kind: FailureKind, message: String },
}

/// One adapter invocation, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionAttempt {
    pub provider_name: String,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

impl ResolutionAttempt {
    pub fn success(provider: impl Into<String>) -> Self {
        Self {
            provider_name: provider.into(),
            outcome: AttemptOutcome::Success,
        }
    }

    pub fn failure(provider: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            provider_name: provider.into(),
            outcome: AttemptOutcome::Failure {
                kind,
                message: message.into(),
            },
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Success)
    }
}

/// `{provider, message}` pair reported to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub message: String,
}

/// Ordered accumulator of failed attempts
///
/// Records exactly what it is given, in call order: no deduplication, no
/// sorting.
#[derive(Debug, Default)]
pub struct ErrorAggregator {
    errors: Vec<ProviderFailure>,
}

impl ErrorAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, provider: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ProviderFailure {
            provider: provider.into(),
            message: message.into(),
        });
    }

    /// Record the failure of an attempt; successes are ignored
    pub fn record_attempt(&mut self, attempt: &ResolutionAttempt) {
        if let AttemptOutcome::Failure { message, .. } = &attempt.outcome {
            self.record(attempt.provider_name.clone(), message.clone());
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<ProviderFailure> {
        self.errors
    }
}
