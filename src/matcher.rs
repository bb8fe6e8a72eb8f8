//! Date-based reconciliation of planned sessions against recorded runs

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::models::{ActivityRecord, SessionStatus, TrainingSession};

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionMatcher;

impl SessionMatcher {
  pub fn new() -> Self {
    Self
  }

  /// Complete every planned running session that has a run on its scheduled
  /// date. Returns the number of sessions completed by this call.
  pub fn reconcile(&self, sessions: &mut [TrainingSession], activities: &[ActivityRecord]) -> usize {
    self.reconcile_at(sessions, activities, Utc::now())
  }

  /// [`reconcile`](Self::reconcile) with an explicit sync timestamp
  pub fn reconcile_at(
    &self,
    sessions: &mut [TrainingSession],
    activities: &[ActivityRecord],
    synced_at: DateTime<Utc>,
  ) -> usize {
    let mut matched = 0;

    for session in sessions.iter_mut() {
      // Completed sessions are never revisited, which keeps re-runs a no-op
      if !session.is_running() || session.status() != SessionStatus::Planned {
        continue;
      }

      match find_activity_for_date(activities, &session.scheduled_date) {
        Some(activity) => {
          debug!(
            session_id = %session.id,
            activity_id = activity.id,
            date = %session.scheduled_date,
            "Matched planned session"
          );
          session.mark_completed(activity, synced_at);
          matched += 1;
        }
        None => {
          debug!(session_id = %session.id, date = %session.scheduled_date, "No activity for session");
        }
      }
    }

    info!(
      sessions = sessions.len(),
      activities = activities.len(),
      matched,
      "Session reconciliation finished"
    );
    matched
  }
}

/// First activity in fetch order whose start date equals `date`
pub fn find_activity_for_date<'a>(
  activities: &'a [ActivityRecord],
  date: &str,
) -> Option<&'a ActivityRecord> {
  activities.iter().find(|a| a.date_key() == date)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;

  #[test]
  fn test_matching_completes_session() {
    let mut sessions = vec![mock_training_session("s1", "2025-07-15", "6:30")];
    let activities = vec![mock_activity_record(555, "2025-07-15T06:00:00")];
    let synced_at = datetime_now();

    let matched = SessionMatcher::new().reconcile_at(&mut sessions, &activities, synced_at);

    assert_eq!(matched, 1);
    let session = &sessions[0];
    assert_eq!(session.status(), SessionStatus::Completed);
    let completion = session.completion().unwrap();
    assert_eq!(completion.actual_distance, 5.0);
    assert_eq!(completion.actual_pace, "6:00");
    assert_eq!(completion.actual_duration, "30:00");
    assert_eq!(completion.avg_heart_rate, Some(148));
    assert_eq!(completion.max_heart_rate, Some(171));
    assert_eq!(completion.calories_burned, 350);
    assert_eq!(completion.garmin_activity_id, 555);
    assert_eq!(completion.sync_timestamp, synced_at);
  }

  #[test]
  fn test_no_activity_on_date_leaves_session_planned() {
    let mut sessions = vec![mock_training_session("s1", "2025-07-15", "6:30")];
    let before = sessions.clone();
    let activities = vec![
      mock_activity_record(1, "2025-07-14 06:00:00"),
      mock_activity_record(2, "2025-07-16 06:00:00"),
    ];

    let matched = SessionMatcher::new().reconcile(&mut sessions, &activities);

    assert_eq!(matched, 0);
    assert_eq!(sessions, before);
    assert_eq!(sessions[0].status(), SessionStatus::Planned);
    assert!(sessions[0].completion().is_none());
  }

  #[test]
  fn test_first_activity_on_date_wins() {
    let mut sessions = vec![mock_training_session("s1", "2025-07-15", "6:30")];
    let mut longer = mock_activity_record(2, "2025-07-15 18:00:00");
    longer.distance_km = 12.0;
    let activities = vec![mock_activity_record(1, "2025-07-15 06:00:00"), longer];

    SessionMatcher::new().reconcile(&mut sessions, &activities);

    let completion = sessions[0].completion().unwrap();
    assert_eq!(completion.garmin_activity_id, 1);
    assert_eq!(completion.actual_distance, 5.0);
  }

  #[test]
  fn test_rematching_completed_session_is_noop() {
    let mut sessions = vec![mock_training_session("s1", "2025-07-15", "6:30")];
    let matcher = SessionMatcher::new();

    matcher.reconcile_at(
      &mut sessions,
      &[mock_activity_record(1, "2025-07-15 06:00:00")],
      datetime_days_ago(1),
    );
    let snapshot = serde_json::to_string(&sessions).unwrap();

    // A different activity on the same date must not overwrite the match
    let matched = matcher.reconcile(&mut sessions, &[mock_activity_record(2, "2025-07-15 19:00:00")]);

    assert_eq!(matched, 0);
    assert_eq!(serde_json::to_string(&sessions).unwrap(), snapshot);
  }

  #[test]
  fn test_non_running_sessions_are_ignored() {
    let mut strength = mock_training_session("s1", "2025-07-15", "6:30");
    strength.activity_type = "strength".to_string();
    let mut sessions = vec![strength.clone()];

    let matched =
      SessionMatcher::new().reconcile(&mut sessions, &[mock_activity_record(1, "2025-07-15 06:00:00")]);

    assert_eq!(matched, 0);
    assert_eq!(sessions[0], strength);
  }

  #[test]
  fn test_several_sessions_share_the_activity_list() {
    let mut sessions = vec![
      mock_training_session("s1", "2025-07-15", "6:30"),
      mock_training_session("s2", "2025-07-17", "5:30"),
      mock_training_session("s3", "2025-07-19", "6:00"),
    ];
    let activities = vec![
      mock_activity_record(17, "2025-07-17 07:10:00"),
      mock_activity_record(15, "2025-07-15 06:00:00"),
    ];

    let matched = SessionMatcher::new().reconcile(&mut sessions, &activities);

    assert_eq!(matched, 2);
    assert_eq!(sessions[0].completion().unwrap().garmin_activity_id, 15);
    assert_eq!(sessions[1].completion().unwrap().garmin_activity_id, 17);
    assert_eq!(sessions[2].status(), SessionStatus::Planned);
  }
}
