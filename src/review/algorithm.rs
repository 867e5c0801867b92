//! Exponential-backoff review scheduling
//!
//! A remembered note doubles its interval with each review, capped at 30
//! days. A forgotten note keeps its state and stays due.

use chrono::{DateTime, Utc};

use crate::store::Note;

/// Interval ceiling in days
pub const MAX_INTERVAL_DAYS: i64 = 30;

/// Days until the next review, given the already-incremented review count:
/// `min(2^review_count, 30)`
pub fn next_interval_days(review_count: u32) -> i64 {
    // 2^5 already exceeds the cap, so larger counts need no shift
    (1i64 << review_count.min(5)).min(MAX_INTERVAL_DAYS)
}

/// A note is due when its next review is unset or has passed
pub fn is_due(note: &Note, now: DateTime<Utc>) -> bool {
    note.next_review_at.map_or(true, |at| at <= now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NoteType, Note};
    use chrono::Duration;
    use uuid::Uuid;

    fn bare_note() -> Note {
        let now = Utc::now();
        Note {
            id: Uuid::new_v4(),
            book_id: Uuid::new_v4(),
            note_type: NoteType::Quote,
            content: String::new(),
            location: None,
            context: None,
            extracted_text: None,
            tags: Vec::new(),
            folder_id: None,
            review_count: 0,
            last_reviewed_at: None,
            next_review_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_interval_doubles_then_caps() {
        assert_eq!(next_interval_days(1), 2);
        assert_eq!(next_interval_days(2), 4);
        assert_eq!(next_interval_days(3), 8);
        assert_eq!(next_interval_days(4), 16);
        assert_eq!(next_interval_days(5), 30);
        assert_eq!(next_interval_days(6), 30);
        assert_eq!(next_interval_days(40), 30);
    }

    #[test]
    fn test_due_predicate() {
        let now = Utc::now();
        let mut note = bare_note();

        // Never scheduled: always due
        assert!(is_due(&note, now));

        note.next_review_at = Some(now - Duration::hours(1));
        assert!(is_due(&note, now));

        note.next_review_at = Some(now);
        assert!(is_due(&note, now));

        note.next_review_at = Some(now + Duration::hours(1));
        assert!(!is_due(&note, now));
    }
}
