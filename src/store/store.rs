//! The entity repository: CRUD, cascades, and derived counters
//!
//! One `Store` is constructed at process start over an injected [`Backend`]
//! and handed to callers. Every operation is a synchronous
//! load-mutate-persist pass over whole collections; see [`Backend`] for the
//! single-writer contract.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::backend::{keys, Backend};
use super::models::*;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Book not found: {0}")]
    BookNotFound(Uuid),

    #[error("Note not found: {0}")]
    NoteNotFound(Uuid),

    #[error("Folder not found: {0}")]
    FolderNotFound(Uuid),

    #[error("Collection not found: {0}")]
    CollectionNotFound(Uuid),

    #[error("Saved filter not found: {0}")]
    SavedFilterNotFound(Uuid),

    #[error("Review session not found: {0}")]
    SessionNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Injected identifier generator, so tests can use deterministic ids
pub type IdGen = Box<dyn Fn() -> Uuid>;

/// Repository over every entity collection
pub struct Store {
    backend: Box<dyn Backend>,
    ids: IdGen,
}

impl Store {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self::with_id_gen(backend, Box::new(Uuid::new_v4))
    }

    pub fn with_id_gen(backend: impl Backend + 'static, ids: IdGen) -> Self {
        Self {
            backend: Box::new(backend),
            ids,
        }
    }

    pub(crate) fn new_id(&self) -> Uuid {
        (self.ids)()
    }

    /// Load a collection. A missing or corrupt payload is an empty
    /// collection, never an error.
    pub(crate) fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.backend.read(key) {
            Some(payload) => serde_json::from_str(&payload).unwrap_or_else(|e| {
                log::warn!("Discarding corrupt collection '{}': {}", key, e);
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    pub(crate) fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let payload = serde_json::to_string_pretty(items)?;
        self.backend.write(key, &payload)?;
        Ok(())
    }

    // ===== Book Operations =====

    /// List all books in stored (shelf) order
    pub fn list_books(&self) -> Vec<Book> {
        self.load(keys::BOOKS)
    }

    /// Register a book. Stamps today as an activity day.
    pub fn add_book(&self, new: NewBook) -> Result<Book> {
        let book = Book {
            id: self.new_id(),
            title: new.title,
            author: new.author,
            cover_url: new.cover_url,
            isbn: new.isbn,
            notes_count: 0,
            created_at: Utc::now(),
        };

        let mut books = self.list_books();
        books.push(book.clone());
        self.save(keys::BOOKS, &books)?;
        self.record_activity()?;

        log::info!("Added book '{}'", book.title);
        Ok(book)
    }

    pub fn update_book(&self, id: Uuid, updates: BookUpdate) -> Result<Book> {
        let mut books = self.list_books();
        let book = books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(StoreError::BookNotFound(id))?;

        if let Some(title) = updates.title {
            book.title = title;
        }
        if let Some(author) = updates.author {
            book.author = author;
        }
        if updates.cover_url.is_some() {
            book.cover_url = updates.cover_url;
        }
        if updates.isbn.is_some() {
            book.isbn = updates.isbn;
        }

        let updated = book.clone();
        self.save(keys::BOOKS, &books)?;
        Ok(updated)
    }

    /// Delete a book and every note that belongs to it
    pub fn remove_book(&self, id: Uuid) -> Result<()> {
        let mut books = self.list_books();
        let len_before = books.len();
        books.retain(|b| b.id != id);
        if books.len() == len_before {
            return Err(StoreError::BookNotFound(id));
        }
        self.save(keys::BOOKS, &books)?;

        let mut notes = self.list_notes();
        let notes_before = notes.len();
        notes.retain(|n| n.book_id != id);
        self.save(keys::NOTES, &notes)?;

        log::info!(
            "Deleted book {} and {} of its notes",
            id,
            notes_before - notes.len()
        );
        Ok(())
    }

    /// Reindex the shelf to match `ids`. Unknown ids are dropped; books
    /// missing from `ids` keep their relative order and go to the end, so a
    /// stale or partial reorder request never loses a book.
    pub fn reorder_books(&self, ids: &[Uuid]) -> Result<()> {
        let mut books = self.list_books();
        let mut reordered = Vec::with_capacity(books.len());

        for id in ids {
            if let Some(pos) = books.iter().position(|b| b.id == *id) {
                reordered.push(books.remove(pos));
            }
        }
        reordered.append(&mut books);

        self.save(keys::BOOKS, &reordered)
    }

    // ===== Note Operations =====

    /// List all notes in stored (insertion) order
    pub fn list_notes(&self) -> Vec<Note> {
        self.load(keys::NOTES)
    }

    pub fn notes_for_book(&self, book_id: Uuid) -> Vec<Note> {
        self.list_notes()
            .into_iter()
            .filter(|n| n.book_id == book_id)
            .collect()
    }

    /// Create a note, bump the owning book's note counter, and stamp today
    /// as an activity day. A dangling `book_id` is tolerated: the note is
    /// still created, no counter is touched.
    pub fn add_note(&self, new: NewNote) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: self.new_id(),
            book_id: new.book_id,
            note_type: new.note_type,
            content: new.content,
            location: new.location,
            context: new.context,
            extracted_text: new.extracted_text,
            tags: new.tags,
            folder_id: new.folder_id,
            review_count: 0,
            last_reviewed_at: None,
            next_review_at: None,
            created_at: now,
            updated_at: now,
        };

        let mut notes = self.list_notes();
        notes.push(note.clone());
        self.save(keys::NOTES, &notes)?;

        let mut books = self.list_books();
        let owner = books.iter().position(|b| b.id == note.book_id);
        match owner {
            Some(pos) => {
                books[pos].notes_count += 1;
                self.save(keys::BOOKS, &books)?;
            }
            None => log::warn!("Note {} references missing book {}", note.id, note.book_id),
        }

        self.record_activity()?;
        Ok(note)
    }

    /// Merge partial fields into a note. Always refreshes `updated_at`.
    pub fn update_note(&self, id: Uuid, updates: NoteUpdate) -> Result<Note> {
        let mut notes = self.list_notes();
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(StoreError::NoteNotFound(id))?;

        if let Some(note_type) = updates.note_type {
            note.note_type = note_type;
        }
        if let Some(content) = updates.content {
            note.content = content;
        }
        if updates.location.is_some() {
            note.location = updates.location;
        }
        if updates.context.is_some() {
            note.context = updates.context;
        }
        if updates.extracted_text.is_some() {
            note.extracted_text = updates.extracted_text;
        }
        if let Some(tags) = updates.tags {
            note.tags = tags;
        }
        note.updated_at = Utc::now();

        let updated = note.clone();
        self.save(keys::NOTES, &notes)?;
        Ok(updated)
    }

    /// Move a note into a folder, or out of any folder with `None`
    pub fn move_note_to_folder(&self, id: Uuid, folder_id: Option<Uuid>) -> Result<Note> {
        let mut notes = self.list_notes();
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(StoreError::NoteNotFound(id))?;

        note.folder_id = folder_id;
        note.updated_at = Utc::now();

        let updated = note.clone();
        self.save(keys::NOTES, &notes)?;
        Ok(updated)
    }

    /// Delete a note and decrement the owning book's counter (never below
    /// zero; a missing owner is tolerated)
    pub fn remove_note(&self, id: Uuid) -> Result<()> {
        let mut notes = self.list_notes();
        let note = notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(StoreError::NoteNotFound(id))?;
        notes.retain(|n| n.id != id);
        self.save(keys::NOTES, &notes)?;

        let mut books = self.list_books();
        let owner = books.iter().position(|b| b.id == note.book_id);
        if let Some(pos) = owner {
            books[pos].notes_count = books[pos].notes_count.saturating_sub(1);
            self.save(keys::BOOKS, &books)?;
        }

        Ok(())
    }

    /// Case-insensitive substring search over content, context, extracted
    /// text, and tags. Matches come back in stored order.
    pub fn search_notes(&self, query: &str) -> Vec<Note> {
        let query = query.to_lowercase();
        self.list_notes()
            .into_iter()
            .filter(|n| {
                n.content.to_lowercase().contains(&query)
                    || n.context
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&query))
                    || n.extracted_text
                        .as_deref()
                        .is_some_and(|t| t.to_lowercase().contains(&query))
                    || n.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// All notes satisfying a filter spec, in stored order
    pub fn filter_notes(&self, spec: &FilterSpec) -> Vec<Note> {
        self.list_notes()
            .into_iter()
            .filter(|n| spec.matches(n))
            .collect()
    }

    // ===== Folder Operations =====

    pub fn list_folders(&self) -> Vec<Folder> {
        self.load(keys::FOLDERS)
    }

    pub fn add_folder(&self, name: impl Into<String>, color: Option<String>) -> Result<Folder> {
        let folder = Folder {
            id: self.new_id(),
            name: name.into(),
            color,
            created_at: Utc::now(),
        };

        let mut folders = self.list_folders();
        folders.push(folder.clone());
        self.save(keys::FOLDERS, &folders)?;

        log::info!("Added folder '{}'", folder.name);
        Ok(folder)
    }

    pub fn update_folder(&self, id: Uuid, updates: FolderUpdate) -> Result<Folder> {
        let mut folders = self.list_folders();
        let folder = folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(StoreError::FolderNotFound(id))?;

        if let Some(name) = updates.name {
            folder.name = name;
        }
        if updates.color.is_some() {
            folder.color = updates.color;
        }

        let updated = folder.clone();
        self.save(keys::FOLDERS, &folders)?;
        Ok(updated)
    }

    /// Delete a folder. Its notes survive; their `folder_id` is cleared.
    pub fn remove_folder(&self, id: Uuid) -> Result<()> {
        let mut folders = self.list_folders();
        let len_before = folders.len();
        folders.retain(|f| f.id != id);
        if folders.len() == len_before {
            return Err(StoreError::FolderNotFound(id));
        }
        self.save(keys::FOLDERS, &folders)?;

        let mut notes = self.list_notes();
        let mut cleared = 0;
        for note in notes.iter_mut().filter(|n| n.folder_id == Some(id)) {
            note.folder_id = None;
            cleared += 1;
        }
        if cleared > 0 {
            self.save(keys::NOTES, &notes)?;
        }

        log::info!("Deleted folder {}, unfiled {} notes", id, cleared);
        Ok(())
    }

    // ===== Collection Operations =====

    pub fn list_collections(&self) -> Vec<Collection> {
        self.load(keys::COLLECTIONS)
    }

    pub fn add_collection(
        &self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<Collection> {
        let collection = Collection {
            id: self.new_id(),
            name: name.into(),
            description,
            note_ids: Vec::new(),
            created_at: Utc::now(),
        };

        let mut collections = self.list_collections();
        collections.push(collection.clone());
        self.save(keys::COLLECTIONS, &collections)?;
        Ok(collection)
    }

    pub fn update_collection(&self, id: Uuid, updates: CollectionUpdate) -> Result<Collection> {
        let mut collections = self.list_collections();
        let collection = collections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::CollectionNotFound(id))?;

        if let Some(name) = updates.name {
            collection.name = name;
        }
        if updates.description.is_some() {
            collection.description = updates.description;
        }
        if let Some(note_ids) = updates.note_ids {
            collection.note_ids = note_ids;
        }

        let updated = collection.clone();
        self.save(keys::COLLECTIONS, &collections)?;
        Ok(updated)
    }

    pub fn remove_collection(&self, id: Uuid) -> Result<()> {
        let mut collections = self.list_collections();
        let len_before = collections.len();
        collections.retain(|c| c.id != id);
        if collections.len() == len_before {
            return Err(StoreError::CollectionNotFound(id));
        }
        self.save(keys::COLLECTIONS, &collections)
    }

    // ===== Saved Filter Operations =====

    pub fn list_saved_filters(&self) -> Vec<SavedFilter> {
        self.load(keys::SAVED_FILTERS)
    }

    pub fn add_saved_filter(
        &self,
        name: impl Into<String>,
        filter: FilterSpec,
    ) -> Result<SavedFilter> {
        let saved = SavedFilter {
            id: self.new_id(),
            name: name.into(),
            filter,
            created_at: Utc::now(),
        };

        let mut filters = self.list_saved_filters();
        filters.push(saved.clone());
        self.save(keys::SAVED_FILTERS, &filters)?;
        Ok(saved)
    }

    pub fn update_saved_filter(
        &self,
        id: Uuid,
        name: Option<String>,
        filter: Option<FilterSpec>,
    ) -> Result<SavedFilter> {
        let mut filters = self.list_saved_filters();
        let saved = filters
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(StoreError::SavedFilterNotFound(id))?;

        if let Some(name) = name {
            saved.name = name;
        }
        if let Some(filter) = filter {
            saved.filter = filter;
        }

        let updated = saved.clone();
        self.save(keys::SAVED_FILTERS, &filters)?;
        Ok(updated)
    }

    pub fn remove_saved_filter(&self, id: Uuid) -> Result<()> {
        let mut filters = self.list_saved_filters();
        let len_before = filters.len();
        filters.retain(|f| f.id != id);
        if filters.len() == len_before {
            return Err(StoreError::SavedFilterNotFound(id));
        }
        self.save(keys::SAVED_FILTERS, &filters)
    }
}
