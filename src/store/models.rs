//! Data models for the reading-notes store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered book
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    /// Optional cover image reference (URL or asset path)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    /// Number of notes currently referencing this book.
    /// Maintained by the store; not settable by callers.
    #[serde(default)]
    pub notes_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a book
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            cover_url: None,
            isbn: None,
        }
    }
}

/// Partial update for a book
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub isbn: Option<String>,
}

/// Kind of reading note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoteType {
    Quote,
    Idea,
    Question,
    Action,
}

impl NoteType {
    pub fn label(&self) -> &'static str {
        match self {
            NoteType::Quote => "quote",
            NoteType::Idea => "idea",
            NoteType::Question => "question",
            NoteType::Action => "action",
        }
    }
}

/// A note attached to a book
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    /// Owning book
    pub book_id: Uuid,
    #[serde(rename = "type")]
    pub note_type: NoteType,
    pub content: String,
    /// Page/chapter/timestamp label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Text extracted from a photographed page, kept alongside the note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Uuid>,
    /// Number of completed (remembered) reviews
    #[serde(default)]
    pub review_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a note
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub book_id: Uuid,
    #[serde(rename = "type")]
    pub note_type: NoteType,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Uuid>,
}

impl NewNote {
    pub fn new(book_id: Uuid, note_type: NoteType, content: impl Into<String>) -> Self {
        Self {
            book_id,
            note_type,
            content: content.into(),
            location: None,
            context: None,
            extracted_text: None,
            tags: Vec::new(),
            folder_id: None,
        }
    }
}

/// Partial update for a note. Folder moves go through
/// `Store::move_note_to_folder`, which can also clear the folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate {
    #[serde(rename = "type")]
    pub note_type: Option<NoteType>,
    pub content: Option<String>,
    pub location: Option<String>,
    pub context: Option<String>,
    pub extracted_text: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// A folder for organizing notes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial update for a folder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// A hand-curated, ordered set of notes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered note ids. Ids of since-deleted notes may linger; readers
    /// must tolerate dangling entries.
    #[serde(default)]
    pub note_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Partial update for a collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub note_ids: Option<Vec<Uuid>>,
}

/// The note query a saved filter denotes. Every criterion is optional;
/// an empty spec matches every note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_ids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_types: Option<Vec<NoteType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_ids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl FilterSpec {
    /// Check whether a note satisfies every present criterion
    pub fn matches(&self, note: &Note) -> bool {
        if let Some(ref book_ids) = self.book_ids {
            if !book_ids.contains(&note.book_id) {
                return false;
            }
        }
        if let Some(ref note_types) = self.note_types {
            if !note_types.contains(&note.note_type) {
                return false;
            }
        }
        if let Some(ref folder_ids) = self.folder_ids {
            match note.folder_id {
                Some(fid) if folder_ids.contains(&fid) => {}
                _ => return false,
            }
        }
        if let Some(ref tags) = self.tags {
            if !tags.iter().any(|t| note.tags.contains(t)) {
                return false;
            }
        }
        true
    }
}

/// A named, persisted filter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFilter {
    pub id: Uuid,
    pub name: String,
    pub filter: FilterSpec,
    pub created_at: DateTime<Utc>,
}

/// One review pass over a batch of due notes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    pub id: Uuid,
    /// Notes selected for this pass
    pub note_ids: Vec<Uuid>,
    /// Subset of `note_ids` reviewed so far
    #[serde(default)]
    pub completed_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    /// Set once every selected note has been completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Yearly reading target. Singleton per year, overwritten on save.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingGoal {
    pub year: i32,
    pub yearly_book_target: u32,
}
