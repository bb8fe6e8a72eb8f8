use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Activity type key for runs, as reported by the provider
pub const RUNNING_TYPE_KEY: &str = "running";

/// ---------------------------------------------------------------------------
/// Provider Payloads
/// ---------------------------------------------------------------------------

/// Activity summary as returned by the provider. Every field is optional;
/// the normalizer decides which absences default and which stay absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivity {
  pub activity_id: Option<i64>,
  pub activity_name: Option<String>,
  pub start_time_local: Option<String>,
  /// Meters
  pub distance: Option<f64>,
  /// Seconds
  pub duration: Option<f64>,
  #[serde(rename = "averageHR")]
  pub average_hr: Option<f64>,
  #[serde(rename = "maxHR")]
  pub max_hr: Option<f64>,
  pub calories: Option<f64>,
  pub elevation_gain: Option<f64>,
  pub activity_type: Option<ActivityTypeRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTypeRef {
  pub type_key: Option<String>,
}

impl RawActivity {
  pub fn type_key(&self) -> Option<&str> {
    self.activity_type.as_ref()?.type_key.as_deref()
  }

  pub fn is_running(&self) -> bool {
    self.type_key() == Some(RUNNING_TYPE_KEY)
  }
}

/// Per-activity detail payload (splits, zones, GPS, advanced metrics)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawActivityDetail {
  #[serde(default)]
  pub splits: Vec<Value>,
  #[serde(default)]
  pub heart_rate_zones: Vec<Value>,
  #[serde(default)]
  pub time_in_zones: Map<String, Value>,
  #[serde(default)]
  pub laps: Vec<Value>,
  #[serde(default)]
  pub geo_points: Vec<Value>,
  pub training_stress_score: Option<f64>,
  pub training_effect: Option<f64>,
  pub recovery_time: Option<f64>,
  #[serde(rename = "vO2MaxValue")]
  pub vo2_max_value: Option<f64>,
}

/// ---------------------------------------------------------------------------
/// Canonical Records
/// ---------------------------------------------------------------------------

/// One completed run, normalized from the provider payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
  pub id: i64,
  pub name: String,
  /// Local start time as sent by the provider, e.g. "2025-07-15 06:00:00"
  pub date: String,
  pub distance_km: f64,
  pub duration_seconds: u64,
  pub duration_formatted: String,
  pub pace_per_km: String,
  pub avg_heart_rate: Option<u32>,
  pub max_heart_rate: Option<u32>,
  pub calories: u32,
  pub elevation_gain: f64,
  pub activity_type: String,
  /// Source payload, only kept when raw retention is enabled
  #[serde(skip)]
  pub raw_payload: Option<Arc<Value>>,
}

impl ActivityRecord {
  /// The `YYYY-MM-DD` prefix of the start time, used for plan matching
  pub fn date_key(&self) -> &str {
    self.date.get(..10).unwrap_or(&self.date)
  }
}

/// Pass-through projection of [`RawActivityDetail`]; not analyzed further
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityDetail {
  pub splits: Vec<Value>,
  pub heart_rate_zones: Vec<Value>,
  pub time_in_zones: Map<String, Value>,
  pub lap_data: Vec<Value>,
  pub gps_data: Vec<Value>,
  pub advanced_metrics: AdvancedMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedMetrics {
  pub training_stress_score: Option<f64>,
  pub training_effect: Option<f64>,
  pub recovery_time: Option<f64>,
  pub vo2_max: Option<f64>,
}

impl From<RawActivityDetail> for ActivityDetail {
  fn from(raw: RawActivityDetail) -> Self {
    Self {
      splits: raw.splits,
      heart_rate_zones: raw.heart_rate_zones,
      time_in_zones: raw.time_in_zones,
      lap_data: raw.laps,
      gps_data: raw.geo_points,
      advanced_metrics: AdvancedMetrics {
        training_stress_score: raw.training_stress_score,
        training_effect: raw.training_effect,
        recovery_time: raw.recovery_time,
        vo2_max: raw.vo2_max_value,
      },
    }
  }
}
