//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Mock data factories for provider payloads, activities and sessions
//! - An in-memory activity provider
//! - Helper assertions

use crate::models::{ActivityRecord, TrainingSession};
use crate::provider::{ActivityQuery, FitnessActivityProvider, ProviderError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use std::sync::Mutex;

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Provider payload in the Garmin activity shape (HR 148/171, 350 kcal)
pub fn mock_raw_activity(
  id: i64,
  start_time_local: &str,
  type_key: &str,
  distance_m: f64,
  duration_s: f64,
) -> Value {
  json!({
    "activityId": id,
    "activityName": "Morning Run",
    "startTimeLocal": start_time_local,
    "distance": distance_m,
    "duration": duration_s,
    "averageHR": 148.0,
    "maxHR": 171.0,
    "calories": 350.0,
    "elevationGain": 42.0,
    "activityType": { "typeKey": type_key }
  })
}

/// A normalized 5km run in 30:00 (6:00/km)
pub fn mock_activity_record(id: i64, date: &str) -> ActivityRecord {
  ActivityRecord {
    id,
    name: "Morning Run".to_string(),
    date: date.to_string(),
    distance_km: 5.0,
    duration_seconds: 1800,
    duration_formatted: "30:00".to_string(),
    pace_per_km: "6:00".to_string(),
    avg_heart_rate: Some(148),
    max_heart_rate: Some(171),
    calories: 350,
    elevation_gain: 42.0,
    activity_type: "running".to_string(),
    raw_payload: None,
  }
}

/// A planned easy 5km run
pub fn mock_training_session(id: &str, scheduled_date: &str, target_pace: &str) -> TrainingSession {
  TrainingSession::planned(id, "easy", scheduled_date, 5.0, Some(target_pace))
}

/// A session already matched against [`mock_activity_record`]
pub fn completed_session(id: &str, scheduled_date: &str, target_pace: &str) -> TrainingSession {
  let mut session = mock_training_session(id, scheduled_date, target_pace);
  let activity = mock_activity_record(1, &format!("{} 06:00:00", scheduled_date));
  session.mark_completed(&activity, datetime_now());
  session
}

/// ---------------------------------------------------------------------------
/// Mock Provider
/// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MockState {
  authenticated: bool,
  auth_calls: usize,
  fetches_since_auth: usize,
  queries: Vec<ActivityQuery>,
}

/// In-memory provider that records every query it receives
pub struct MockProvider {
  activities: Vec<Value>,
  detail: Value,
  accept_auth: bool,
  failure: Option<String>,
  expire_after: Option<usize>,
  state: Mutex<MockState>,
}

impl MockProvider {
  pub fn new(activities: Vec<Value>) -> Self {
    Self {
      activities,
      detail: json!({}),
      accept_auth: true,
      failure: None,
      expire_after: None,
      state: Mutex::new(MockState::default()),
    }
  }

  /// Authenticates fine, but every fetch fails with a 503
  pub fn failing(message: &str) -> Self {
    Self {
      failure: Some(message.to_string()),
      ..Self::new(vec![])
    }
  }

  pub fn rejecting_auth(mut self) -> Self {
    self.accept_auth = false;
    self
  }

  /// Token stops working after `fetches` successful fetches
  pub fn expiring_after(mut self, fetches: usize) -> Self {
    self.expire_after = Some(fetches);
    self
  }

  pub fn with_detail(mut self, detail: Value) -> Self {
    self.detail = detail;
    self
  }

  pub fn auth_calls(&self) -> usize {
    self.state.lock().unwrap().auth_calls
  }

  pub fn queries(&self) -> Vec<ActivityQuery> {
    self.state.lock().unwrap().queries.clone()
  }

  fn check_access(&self, state: &mut MockState) -> Result<(), ProviderError> {
    if !state.authenticated {
      return Err(ProviderError::NotAuthenticated);
    }
    if self.expire_after.is_some_and(|n| state.fetches_since_auth >= n) {
      state.authenticated = false;
      return Err(ProviderError::NotAuthenticated);
    }
    if let Some(message) = &self.failure {
      return Err(ProviderError::Api {
        status: 503,
        body: message.clone(),
      });
    }
    state.fetches_since_auth += 1;
    Ok(())
  }
}

#[async_trait]
impl FitnessActivityProvider for MockProvider {
  async fn authenticate(&mut self) -> Result<(), ProviderError> {
    let state = self.state.get_mut().unwrap();
    state.auth_calls += 1;
    if !self.accept_auth {
      return Err(ProviderError::Authentication("credentials rejected".to_string()));
    }
    state.authenticated = true;
    state.fetches_since_auth = 0;
    Ok(())
  }

  async fn fetch_activities(&self, query: ActivityQuery) -> Result<Vec<Value>, ProviderError> {
    let mut state = self.state.lock().unwrap();
    state.queries.push(query);
    self.check_access(&mut state)?;
    Ok(self.activities.clone())
  }

  async fn fetch_activity_detail(&self, _activity_id: i64) -> Result<Value, ProviderError> {
    let mut state = self.state.lock().unwrap();
    self.check_access(&mut state)?;
    Ok(self.detail.clone())
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Sync timestamp `days` before now
pub fn datetime_days_ago(days: i64) -> DateTime<Utc> {
  datetime_now() - Duration::days(days)
}

pub fn datetime_now() -> DateTime<Utc> {
  Utc::now()
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff: f64 = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::SessionStatus;

  #[test]
  fn test_mock_factories_create_valid_data() {
    let session = mock_training_session("s1", "2025-07-15", "6:30");
    assert_eq!(session.status(), SessionStatus::Planned);
    assert_eq!(session.target_pace.as_deref(), Some("6:30"));

    let completed = completed_session("s2", "2025-07-15", "6:30");
    assert_eq!(completed.status(), SessionStatus::Completed);

    let activity = mock_activity_record(1, "2025-07-15 06:00:00");
    assert_eq!(activity.date_key(), "2025-07-15");

    let raw = mock_raw_activity(1, "2025-07-15 06:00:00", "running", 5000.0, 1800.0);
    assert_eq!(raw["activityType"]["typeKey"], json!("running"));
  }

  #[tokio::test]
  async fn test_mock_provider_requires_auth() {
    let mut provider = MockProvider::new(vec![json!({})]);
    let query = ActivityQuery {
      window_days: 7,
      limit: 14,
    };

    assert!(provider.fetch_activities(query).await.is_err());
    provider.authenticate().await.unwrap();
    assert_eq!(provider.fetch_activities(query).await.unwrap().len(), 1);
    assert_eq!(provider.queries().len(), 2);
  }

  #[test]
  fn test_expiring_provider_drops_auth() {
    let provider = MockProvider::new(vec![]).expiring_after(1);
    let mut state = MockState {
      authenticated: true,
      ..MockState::default()
    };

    assert!(provider.check_access(&mut state).is_ok());
    assert!(matches!(
      provider.check_access(&mut state),
      Err(ProviderError::NotAuthenticated)
    ));
    assert!(!state.authenticated);
  }

  #[test]
  fn test_days_ago_is_in_the_past() {
    let synced_at = datetime_days_ago(1);
    assert!(synced_at < datetime_now());
  }
}
