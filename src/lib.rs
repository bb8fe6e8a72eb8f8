//! Training plan sync
//!
//! Reconciles planned training sessions against runs recorded by a fitness
//! tracking provider, then produces rule-based pace and heart-rate feedback.

pub mod config;
pub mod feedback;
pub mod matcher;
pub mod metrics;
pub mod models;
pub mod normalizer;
pub mod provider;
pub mod sync;

#[cfg(test)]
mod test_utils;

pub use config::{BridgeConfig, ConfigError, HeartRateThresholds, SyncConfig};
pub use feedback::{FeedbackEngine, PaceAssessment};
pub use matcher::SessionMatcher;
pub use models::{ActivityDetail, ActivityRecord, Feedback, SessionStatus, TrainingSession};
pub use normalizer::ActivityNormalizer;
pub use provider::{ActivityQuery, FitnessActivityProvider, GarminBridgeProvider, ProviderError};
pub use sync::{FetchOutcome, FetchStatus, SyncOrchestrator, SyncReport};
