//! Provider payload -> canonical activity records
//!
//! Only running activities survive normalization. Missing numbers become 0,
//! missing strings become "", and heart rates stay `None` so "unmeasured"
//! never reads as "zero".

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::metrics;
use crate::models::{ActivityDetail, ActivityRecord, RawActivity, RawActivityDetail};

#[derive(Debug, Clone, Default)]
pub struct ActivityNormalizer {
  retain_raw_payload: bool,
}

impl ActivityNormalizer {
  pub fn new(retain_raw_payload: bool) -> Self {
    Self { retain_raw_payload }
  }

  /// Normalize one loosely-typed provider record.
  ///
  /// Returns `None` for non-running activities and for payloads whose fields
  /// have the wrong shape.
  pub fn normalize(&self, payload: &Value) -> Option<ActivityRecord> {
    let raw = match RawActivity::deserialize(payload) {
      Ok(raw) => raw,
      Err(e) => {
        warn!(error = %e, "Skipping malformed activity payload");
        return None;
      }
    };

    if !raw.is_running() {
      debug!(
        activity_id = ?raw.activity_id,
        type_key = ?raw.type_key(),
        "Skipping non-running activity"
      );
      return None;
    }

    let raw_payload = self.retain_raw_payload.then(|| Arc::new(payload.clone()));
    Some(Self::to_record(raw, raw_payload))
  }

  /// Normalize a fetched batch, preserving provider order
  pub fn normalize_all(&self, payloads: &[Value]) -> Vec<ActivityRecord> {
    payloads.iter().filter_map(|p| self.normalize(p)).collect()
  }

  /// Project a detail payload; an unreadable payload yields an empty detail
  pub fn normalize_detail(&self, payload: &Value) -> ActivityDetail {
    match RawActivityDetail::deserialize(payload) {
      Ok(raw) => raw.into(),
      Err(e) => {
        warn!(error = %e, "Unreadable activity detail payload");
        ActivityDetail::default()
      }
    }
  }

  fn to_record(raw: RawActivity, raw_payload: Option<Arc<Value>>) -> ActivityRecord {
    // Distance and duration are clamped independently
    let distance_m = raw.distance.unwrap_or(0.0).max(0.0);
    let duration_s = raw.duration.unwrap_or(0.0).max(0.0);
    let activity_type = raw.type_key().unwrap_or_default().to_string();

    ActivityRecord {
      id: raw.activity_id.unwrap_or(0),
      name: raw.activity_name.unwrap_or_default(),
      date: raw.start_time_local.unwrap_or_default(),
      distance_km: round_2(distance_m / 1000.0),
      duration_seconds: duration_s as u64,
      duration_formatted: metrics::format_duration(duration_s as u64),
      pace_per_km: metrics::pace(distance_m, duration_s),
      avg_heart_rate: raw.average_hr.map(to_bpm),
      max_heart_rate: raw.max_hr.map(to_bpm),
      calories: raw.calories.unwrap_or(0.0).max(0.0).round() as u32,
      elevation_gain: raw.elevation_gain.unwrap_or(0.0),
      activity_type,
      raw_payload,
    }
  }
}

fn round_2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

fn to_bpm(hr: f64) -> u32 {
  hr.max(0.0).round() as u32
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
