pub mod activity;
pub mod feedback;
pub mod session;

pub use activity::{ActivityDetail, ActivityRecord, RawActivity, RawActivityDetail};
pub use feedback::{AdaptationFlag, Feedback, HeartRateZone, PaceLabel, PerformanceAnalysis};
pub use session::{SessionCompletion, SessionStateError, SessionStatus, TrainingSession};
