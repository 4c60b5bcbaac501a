use serde::{Deserialize, Serialize};

// ---- Core Data Structures ----

/// A learner's goal, as posted to the schedule endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub topic: String,
    pub total_duration: String,      // Free text, e.g. "30 days", "2 months"
    pub daily_commitment: String,
}

/// The `day` field of a record: a plain day number, or a period label such
/// as "1-10" or "Month 2" for coarser schedules.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum DayLabel {
    Number(i64),
    Label(String),
}

/// One period of a generated schedule.
///
/// Streamed records are forwarded untouched; this type only tells us whether
/// a line looks the way the prompt asked it to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRecord {
    pub day: DayLabel,
    pub topic_of_the_day: String,
    pub tasks: Vec<String>,
    pub exercise: String,
}

impl ScheduleRecord {
    /// Returns true if `line` decodes as a well-formed record.
    pub fn conforms(line: &str) -> bool {
        serde_json::from_str::<ScheduleRecord>(line).is_ok()
    }
}
