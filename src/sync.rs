//! Fetch -> normalize -> match -> feedback
//!
//! The orchestrator is the fail-soft boundary: provider errors are logged and
//! reported in the returned [`FetchOutcome`]/[`SyncReport`], never propagated,
//! so a provider outage leaves every session planned instead of aborting.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::SyncConfig;
use crate::feedback::FeedbackEngine;
use crate::matcher::SessionMatcher;
use crate::models::{ActivityDetail, ActivityRecord, SessionStatus, TrainingSession};
use crate::normalizer::ActivityNormalizer;
use crate::provider::{ActivityQuery, FitnessActivityProvider, ProviderError};

/// ---------------------------------------------------------------------------
/// Fetch Results
/// ---------------------------------------------------------------------------

/// Result of one activity fetch, keeping "nothing to match" apart from
/// "the provider could not be reached"
#[derive(Debug)]
pub enum FetchOutcome {
  Fetched(Vec<ActivityRecord>),
  /// The provider answered but had no running activities in the window
  NoActivities,
  Unauthenticated,
  Failed(ProviderError),
}

impl FetchOutcome {
  pub fn status(&self) -> FetchStatus {
    match self {
      FetchOutcome::Fetched(activities) => FetchStatus::Fetched {
        count: activities.len(),
      },
      FetchOutcome::NoActivities => FetchStatus::NoActivities,
      FetchOutcome::Unauthenticated => FetchStatus::Unauthenticated,
      FetchOutcome::Failed(e) => FetchStatus::Failed {
        error: e.to_string(),
      },
    }
  }

  /// Collapse to a plain list; every non-success outcome is empty
  pub fn into_activities(self) -> Vec<ActivityRecord> {
    match self {
      FetchOutcome::Fetched(activities) => activities,
      _ => Vec::new(),
    }
  }
}

/// Serializable summary of a [`FetchOutcome`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchStatus {
  Fetched { count: usize },
  NoActivities,
  Unauthenticated,
  Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
  pub fetch: FetchStatus,
  /// Normalized running activities the matcher saw
  pub activities_considered: usize,
  pub sessions_matched: usize,
}

/// ---------------------------------------------------------------------------
/// Orchestrator
/// ---------------------------------------------------------------------------

pub struct SyncOrchestrator<P> {
  provider: P,
  config: SyncConfig,
  normalizer: ActivityNormalizer,
  matcher: SessionMatcher,
  feedback: FeedbackEngine,
  authenticated: bool,
}

impl<P: FitnessActivityProvider> SyncOrchestrator<P> {
  pub fn new(provider: P, config: SyncConfig) -> Self {
    Self {
      normalizer: ActivityNormalizer::new(config.retain_raw_payload),
      matcher: SessionMatcher::new(),
      feedback: FeedbackEngine::new(config.heart_rate),
      provider,
      config,
      authenticated: false,
    }
  }

  pub fn config(&self) -> &SyncConfig {
    &self.config
  }

  pub fn provider(&self) -> &P {
    &self.provider
  }

  pub fn is_authenticated(&self) -> bool {
    self.authenticated
  }

  /// Authenticate with the provider. `false` leaves every fetch empty.
  pub async fn authenticate(&mut self) -> bool {
    match self.provider.authenticate().await {
      Ok(()) => {
        info!("Activity provider authenticated");
        self.authenticated = true;
      }
      Err(e) => {
        warn!(error = %e, "Activity provider authentication failed");
        self.authenticated = false;
      }
    }
    self.authenticated
  }

  async fn ensure_authenticated(&mut self) -> bool {
    self.authenticated || self.authenticate().await
  }

  /// Fetch and normalize running activities from the last `window_days`
  pub async fn recent_activities(&mut self, window_days: u32) -> FetchOutcome {
    if !self.ensure_authenticated().await {
      return FetchOutcome::Unauthenticated;
    }

    let query = ActivityQuery {
      window_days,
      limit: self.config.fetch_limit(window_days),
    };

    match self.provider.fetch_activities(query).await {
      Ok(payloads) => {
        let activities = self.normalizer.normalize_all(&payloads);
        info!(
          window_days,
          fetched = payloads.len(),
          running = activities.len(),
          "Fetched recent activities"
        );
        if activities.is_empty() {
          FetchOutcome::NoActivities
        } else {
          FetchOutcome::Fetched(activities)
        }
      }
      Err(ProviderError::NotAuthenticated) => {
        warn!("Provider session expired; will re-authenticate on next fetch");
        self.authenticated = false;
        FetchOutcome::Unauthenticated
      }
      Err(e) => {
        warn!(error = %e, window_days, "Failed to fetch activities");
        FetchOutcome::Failed(e)
      }
    }
  }

  /// Detail projection for one activity; `None` if it could not be fetched
  pub async fn activity_detail(&mut self, activity_id: i64) -> Option<ActivityDetail> {
    if !self.ensure_authenticated().await {
      return None;
    }

    match self.provider.fetch_activity_detail(activity_id).await {
      Ok(payload) => Some(self.normalizer.normalize_detail(&payload)),
      Err(e) => {
        if matches!(e, ProviderError::NotAuthenticated) {
          self.authenticated = false;
        }
        warn!(error = %e, activity_id, "Failed to fetch activity detail");
        None
      }
    }
  }

  /// Fetch the configured window and complete matching planned sessions
  pub async fn sync_with_plan(&mut self, sessions: &mut [TrainingSession]) -> SyncReport {
    let window_days = self.config.window_days;
    let outcome = self.recent_activities(window_days).await;
    let fetch = outcome.status();
    let activities = outcome.into_activities();

    let activities_considered = activities.len();
    let sessions_matched = self.matcher.reconcile(sessions, &activities);

    info!(
      sessions = sessions.len(),
      activities_considered,
      sessions_matched,
      fetch = ?fetch,
      "Plan sync complete"
    );

    SyncReport {
      fetch,
      activities_considered,
      sessions_matched,
    }
  }

  /// Attach fresh feedback to every completed session. Returns how many
  /// sessions received feedback.
  pub fn attach_feedback(&self, sessions: &mut [TrainingSession]) -> usize {
    let mut attached = 0;
    for session in sessions
      .iter_mut()
      .filter(|s| s.status() == SessionStatus::Completed)
    {
      session.ai_feedback = Some(self.feedback.generate(session));
      attached += 1;
    }
    attached
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
