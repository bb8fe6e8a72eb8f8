//! Rule-based feedback for completed sessions
//!
//! Compares the realized pace to the session's target pace and buckets the
//! average heart rate. Each call produces a fresh [`Feedback`] snapshot.

use tracing::debug;

use crate::config::HeartRateThresholds;
use crate::metrics;
use crate::models::{AdaptationFlag, Feedback, HeartRateZone, PaceLabel, TrainingSession};

/// ---------------------------------------------------------------------------
/// Pace Bands
/// ---------------------------------------------------------------------------

/// Seconds per km faster than target beyond which the goal pace is too easy
const SIGNIFICANT_DEVIATION_SECS: i64 = 15;
/// Seconds per km faster than target that still counts as good pacing
const FASTER_DEVIATION_SECS: i64 = 5;

const RECOMMEND_INCREASE: &str = "Consider increasing goal pace for future sessions";
const RECOMMEND_MAINTAIN: &str = "Good pacing - maintaining current intensity";
const RECOMMEND_REDUCE: &str = "Consider reducing intensity or adding recovery";
const RECOMMEND_CONTINUE: &str = "Perfect pacing - continue as planned";

/// Outcome of comparing one actual pace to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaceAssessment {
  pub label: PaceLabel,
  /// Actual minus target, in seconds per km (negative = faster)
  pub diff_seconds: i64,
  pub recommendation: &'static str,
  pub adaptation: Option<AdaptationFlag>,
}

impl PaceAssessment {
  fn from_diff(diff_seconds: i64) -> Self {
    let (label, recommendation, adaptation) = match diff_seconds {
      d if d < -SIGNIFICANT_DEVIATION_SECS => (
        PaceLabel::SignificantlyFaster,
        RECOMMEND_INCREASE,
        Some(AdaptationFlag::IncreaseIntensity),
      ),
      d if d < -FASTER_DEVIATION_SECS => (PaceLabel::Faster, RECOMMEND_MAINTAIN, None),
      d if d > SIGNIFICANT_DEVIATION_SECS => (
        PaceLabel::SignificantlySlower,
        RECOMMEND_REDUCE,
        Some(AdaptationFlag::DecreaseIntensity),
      ),
      _ => (PaceLabel::OnTarget, RECOMMEND_CONTINUE, None),
    };

    Self {
      label,
      diff_seconds,
      recommendation,
      adaptation,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Engine
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct FeedbackEngine {
  heart_rate: HeartRateThresholds,
}

impl FeedbackEngine {
  pub fn new(heart_rate: HeartRateThresholds) -> Self {
    Self { heart_rate }
  }

  /// Classify `actual` against `target`. Both go through the lossy
  /// [`metrics::pace_to_seconds`], so an unparseable pace counts as 0.
  pub fn analyze_pace(&self, actual: &str, target: &str) -> PaceAssessment {
    let diff = metrics::pace_to_seconds(actual).saturating_sub(metrics::pace_to_seconds(target));
    PaceAssessment::from_diff(diff)
  }

  pub fn analyze_heart_rate(&self, avg_hr: u32) -> HeartRateZone {
    let bands = &self.heart_rate;
    match avg_hr {
      hr if hr < bands.moderate => HeartRateZone::EasyAerobic,
      hr if hr < bands.threshold => HeartRateZone::ModerateAerobic,
      hr if hr < bands.anaerobic => HeartRateZone::Threshold,
      _ => HeartRateZone::Anaerobic,
    }
  }

  /// Build feedback for one session. Missing inputs just omit that metric.
  pub fn generate(&self, session: &TrainingSession) -> Feedback {
    let mut feedback = Feedback::default();

    let actual_pace = session.actual_pace().filter(|p| !p.is_empty());
    let target_pace = session.target_pace.as_deref().filter(|p| !p.is_empty());

    if let (Some(actual), Some(target)) = (actual_pace, target_pace) {
      let assessment = self.analyze_pace(actual, target);
      feedback.performance_analysis.pace = Some(assessment.label);
      feedback.recommendations.push(assessment.recommendation.to_string());
      if let Some(flag) = assessment.adaptation {
        feedback.adaptations.insert(flag, true);
      }
    }

    if let Some(hr) = session.avg_heart_rate() {
      feedback.performance_analysis.heart_rate = Some(self.analyze_heart_rate(hr));
    }

    debug!(
      session_id = %session.id,
      pace = ?feedback.performance_analysis.pace,
      heart_rate = ?feedback.performance_analysis.heart_rate,
      "Generated session feedback"
    );
    feedback
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
