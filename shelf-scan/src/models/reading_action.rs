//! User-triggered reading-state changes

use serde::{Deserialize, Serialize};
use shelf_common::db::{MAX_PROGRESS, MAX_RATING};
use shelf_common::{BookRecord, ReadingFields};

/// Progress added by one "advance" action (percent)
pub const PROGRESS_STEP: i64 = 10;

/// One tap on a reading-state control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingAction {
    /// pending → reading → finished → pending
    CycleStatus,
    /// +10%, capped at 100
    AdvanceProgress,
    /// +1 star, capped at 5; unrated becomes 1
    IncrementRating,
}

impl ReadingAction {
    /// Full reading fields after applying this action to `record`
    ///
    /// The untouched fields carry the record's current values so the patch
    /// does not reset them.
    pub fn apply(&self, record: &BookRecord) -> ReadingFields {
        let mut fields = ReadingFields::from_record(record);
        match self {
            ReadingAction::CycleStatus => {
                fields.reading_status = Some(record.reading_status.next());
            }
            ReadingAction::AdvanceProgress => {
                fields.progress = Some((record.progress + PROGRESS_STEP).min(MAX_PROGRESS));
            }
            ReadingAction::IncrementRating => {
                fields.rating = Some((record.rating.unwrap_or(0) + 1).min(MAX_RATING));
            }
        }
        fields
    }
}
