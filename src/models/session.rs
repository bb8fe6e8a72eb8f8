use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::activity::{ActivityRecord, RUNNING_TYPE_KEY};
use super::feedback::Feedback;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
  #[default]
  Planned,
  Completed,
}

/// Realized metrics copied from the matched activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCompletion {
  pub actual_distance: f64,
  pub actual_duration: String,
  pub actual_pace: String,
  pub avg_heart_rate: Option<u32>,
  pub max_heart_rate: Option<u32>,
  pub calories_burned: u32,
  pub garmin_activity_id: i64,
  pub sync_timestamp: DateTime<Utc>,
}

/// A planned unit of the training plan.
///
/// `status` and `completion` only change together, through
/// [`TrainingSession::mark_completed`], and never go back to planned.
/// Deserialization rejects a status that disagrees with the actual_* fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SessionRecord")]
pub struct TrainingSession {
  pub id: String,
  #[serde(rename = "type")]
  pub activity_type: String,
  pub session_type: String,
  /// `YYYY-MM-DD`
  pub scheduled_date: String,
  #[serde(default)]
  pub target_distance: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target_pace: Option<String>,
  #[serde(default)]
  status: SessionStatus,
  #[serde(flatten)]
  completion: Option<SessionCompletion>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ai_feedback: Option<Feedback>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStateError {
  #[error("Session {id} is completed but has no {field}")]
  MissingActual { id: String, field: &'static str },

  #[error("Session {id} is planned but carries actual metrics")]
  UnexpectedActuals { id: String },
}

/// Wire shape of a session, with every actual_* field optional so the
/// status can be checked against them
#[derive(Deserialize)]
struct SessionRecord {
  id: String,
  #[serde(rename = "type")]
  activity_type: String,
  session_type: String,
  scheduled_date: String,
  #[serde(default)]
  target_distance: f64,
  #[serde(default)]
  target_pace: Option<String>,
  #[serde(default)]
  status: SessionStatus,
  #[serde(flatten)]
  actuals: CompletionFields,
  #[serde(default)]
  ai_feedback: Option<Feedback>,
}

#[derive(Default, Deserialize)]
struct CompletionFields {
  #[serde(default)]
  actual_distance: Option<f64>,
  #[serde(default)]
  actual_duration: Option<String>,
  #[serde(default)]
  actual_pace: Option<String>,
  #[serde(default)]
  avg_heart_rate: Option<u32>,
  #[serde(default)]
  max_heart_rate: Option<u32>,
  #[serde(default)]
  calories_burned: Option<u32>,
  #[serde(default)]
  garmin_activity_id: Option<i64>,
  #[serde(default)]
  sync_timestamp: Option<DateTime<Utc>>,
}

impl CompletionFields {
  fn is_empty(&self) -> bool {
    self.actual_distance.is_none()
      && self.actual_duration.is_none()
      && self.actual_pace.is_none()
      && self.avg_heart_rate.is_none()
      && self.max_heart_rate.is_none()
      && self.calories_burned.is_none()
      && self.garmin_activity_id.is_none()
      && self.sync_timestamp.is_none()
  }

  fn into_completion(self, id: &str) -> Result<SessionCompletion, SessionStateError> {
    let missing = |field| SessionStateError::MissingActual {
      id: id.to_string(),
      field,
    };

    Ok(SessionCompletion {
      actual_distance: self.actual_distance.ok_or_else(|| missing("actual_distance"))?,
      actual_duration: self.actual_duration.ok_or_else(|| missing("actual_duration"))?,
      actual_pace: self.actual_pace.ok_or_else(|| missing("actual_pace"))?,
      avg_heart_rate: self.avg_heart_rate,
      max_heart_rate: self.max_heart_rate,
      calories_burned: self.calories_burned.ok_or_else(|| missing("calories_burned"))?,
      garmin_activity_id: self
        .garmin_activity_id
        .ok_or_else(|| missing("garmin_activity_id"))?,
      sync_timestamp: self.sync_timestamp.ok_or_else(|| missing("sync_timestamp"))?,
    })
  }
}

impl TryFrom<SessionRecord> for TrainingSession {
  type Error = SessionStateError;

  fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
    let completion = match record.status {
      SessionStatus::Planned if record.actuals.is_empty() => None,
      SessionStatus::Planned => {
        return Err(SessionStateError::UnexpectedActuals { id: record.id });
      }
      SessionStatus::Completed => Some(record.actuals.into_completion(&record.id)?),
    };

    Ok(Self {
      id: record.id,
      activity_type: record.activity_type,
      session_type: record.session_type,
      scheduled_date: record.scheduled_date,
      target_distance: record.target_distance,
      target_pace: record.target_pace,
      status: record.status,
      completion,
      ai_feedback: record.ai_feedback,
    })
  }
}

impl TrainingSession {
  /// A planned running session
  pub fn planned(
    id: impl Into<String>,
    session_type: impl Into<String>,
    scheduled_date: impl Into<String>,
    target_distance: f64,
    target_pace: Option<&str>,
  ) -> Self {
    Self {
      id: id.into(),
      activity_type: RUNNING_TYPE_KEY.to_string(),
      session_type: session_type.into(),
      scheduled_date: scheduled_date.into(),
      target_distance,
      target_pace: target_pace.map(String::from),
      status: SessionStatus::Planned,
      completion: None,
      ai_feedback: None,
    }
  }

  pub fn status(&self) -> SessionStatus {
    self.status
  }

  pub fn is_running(&self) -> bool {
    self.activity_type == RUNNING_TYPE_KEY
  }

  pub fn completion(&self) -> Option<&SessionCompletion> {
    self.completion.as_ref()
  }

  pub fn actual_pace(&self) -> Option<&str> {
    self.completion.as_ref().map(|c| c.actual_pace.as_str())
  }

  pub fn avg_heart_rate(&self) -> Option<u32> {
    self.completion.as_ref().and_then(|c| c.avg_heart_rate)
  }

  /// Copy the activity's metrics onto the session and mark it completed
  pub(crate) fn mark_completed(&mut self, activity: &ActivityRecord, synced_at: DateTime<Utc>) {
    self.completion = Some(SessionCompletion {
      actual_distance: activity.distance_km,
      actual_duration: activity.duration_formatted.clone(),
      actual_pace: activity.pace_per_km.clone(),
      avg_heart_rate: activity.avg_heart_rate,
      max_heart_rate: activity.max_heart_rate,
      calories_burned: activity.calories,
      garmin_activity_id: activity.id,
      sync_timestamp: synced_at,
    });
    self.status = SessionStatus::Completed;
  }
}
