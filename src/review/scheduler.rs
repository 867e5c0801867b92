//! Review selection and state transitions
//!
//! Two selection paths exist with deliberately different orderings:
//! [`Store::notes_for_review`] favors the longest-unreviewed notes, while
//! [`Store::create_review_session`] favors the least-reviewed. Call sites
//! depend on each; they are not interchangeable.

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::algorithm::{is_due, next_interval_days};
use crate::store::keys;
use crate::store::{Note, Result, ReviewSession, Store, StoreError};

impl Store {
    fn due_notes(&self) -> Vec<Note> {
        let now = Utc::now();
        self.list_notes()
            .into_iter()
            .filter(|n| is_due(n, now))
            .collect()
    }

    /// Due notes, never-reviewed first, then oldest review first, at most
    /// `limit` of them
    pub fn notes_for_review(&self, limit: usize) -> Vec<Note> {
        let mut due = self.due_notes();
        // None sorts before Some, so never-reviewed notes lead
        due.sort_by_key(|n| n.last_reviewed_at);
        due.truncate(limit);
        due
    }

    /// Select up to `note_count` due notes, least-reviewed first, and record
    /// the selection as a new session
    pub fn create_review_session(&self, note_count: usize) -> Result<ReviewSession> {
        let mut due = self.due_notes();
        due.sort_by_key(|n| n.review_count);
        due.truncate(note_count);

        let session = ReviewSession {
            id: self.new_id(),
            note_ids: due.iter().map(|n| n.id).collect(),
            completed_ids: Vec::new(),
            created_at: Utc::now(),
            completed_at: None,
        };

        let mut sessions = self.list_review_sessions();
        sessions.push(session.clone());
        self.save(keys::REVIEW_SESSIONS, &sessions)?;

        log::info!(
            "Created review session {} with {} notes",
            session.id,
            session.note_ids.len()
        );
        Ok(session)
    }

    pub fn list_review_sessions(&self) -> Vec<ReviewSession> {
        self.load(keys::REVIEW_SESSIONS)
    }

    /// Apply the remembered transition: bump the review count and push the
    /// next review out by `min(2^count, 30)` days. Forgotten outcomes are
    /// not recorded; the caller simply skips this call and the note stays
    /// due.
    pub fn mark_note_reviewed(&self, id: Uuid) -> Result<Note> {
        let mut notes = self.list_notes();
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(StoreError::NoteNotFound(id))?;

        let now = Utc::now();
        note.review_count += 1;
        note.last_reviewed_at = Some(now);
        note.next_review_at = Some(now + Duration::days(next_interval_days(note.review_count)));
        note.updated_at = now;

        let updated = note.clone();
        self.save(keys::NOTES, &notes)?;
        Ok(updated)
    }

    /// Record a note as completed within a session. Idempotent per note;
    /// stamps `completed_at` once every selected note is done.
    pub fn complete_session_note(&self, session_id: Uuid, note_id: Uuid) -> Result<ReviewSession> {
        let mut sessions = self.list_review_sessions();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or(StoreError::SessionNotFound(session_id))?;

        if !session.completed_ids.contains(&note_id) {
            session.completed_ids.push(note_id);
        }
        if session.completed_at.is_none()
            && session
                .note_ids
                .iter()
                .all(|id| session.completed_ids.contains(id))
        {
            session.completed_at = Some(Utc::now());
        }

        let updated = session.clone();
        self.save(keys::REVIEW_SESSIONS, &sessions)?;
        Ok(updated)
    }
}
