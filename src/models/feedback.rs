use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the realized pace compared to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceLabel {
  SignificantlyFaster,
  Faster,
  OnTarget,
  SignificantlySlower,
}

impl PaceLabel {
  pub fn as_str(&self) -> &'static str {
    match self {
      PaceLabel::SignificantlyFaster => "significantly_faster",
      PaceLabel::Faster => "faster",
      PaceLabel::OnTarget => "on_target",
      PaceLabel::SignificantlySlower => "significantly_slower",
    }
  }
}

/// Heart-rate band of a session's average HR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartRateZone {
  EasyAerobic,
  ModerateAerobic,
  Threshold,
  Anaerobic,
}

impl HeartRateZone {
  pub fn as_str(&self) -> &'static str {
    match self {
      HeartRateZone::EasyAerobic => "easy_aerobic",
      HeartRateZone::ModerateAerobic => "moderate_aerobic",
      HeartRateZone::Threshold => "threshold",
      HeartRateZone::Anaerobic => "anaerobic",
    }
  }
}

/// Signal that future sessions should change intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationFlag {
  IncreaseIntensity,
  DecreaseIntensity,
}

/// Metric name -> classification. Absent keys were not analyzed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalysis {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pace: Option<PaceLabel>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub heart_rate: Option<HeartRateZone>,
}

/// Snapshot of one feedback run for a completed session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
  pub performance_analysis: PerformanceAnalysis,
  pub recommendations: Vec<String>,
  pub adaptations: BTreeMap<AdaptationFlag, bool>,
}

impl Feedback {
  pub fn has_adaptation(&self, flag: AdaptationFlag) -> bool {
    self.adaptations.get(&flag).copied().unwrap_or(false)
  }
}
