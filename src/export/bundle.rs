//! Full-fidelity JSON backup and additive re-import
//!
//! The bundle is the only format import accepts: a single object with two
//! top-level arrays, `books` and `notes`.

use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Book, Note, Result, Store};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub books: Vec<Book>,
    pub notes: Vec<Note>,
}

/// Serialize books and notes as a backup bundle
pub fn export_bundle(books: &[Book], notes: &[Note]) -> Result<String> {
    let bundle = ExportBundle {
        books: books.to_vec(),
        notes: notes.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&bundle)?)
}

/// Parse a previously exported bundle. Malformed input is "no data", never
/// an error; the caller owns any user-facing messaging.
pub fn parse_bundle(payload: &str) -> Option<ExportBundle> {
    serde_json::from_str(payload).ok()
}

impl Store {
    /// Additive import: append the bundle's books and notes to the existing
    /// collections. No deduplication, no id remapping — importing a bundle
    /// exported from the same store duplicates its entities.
    pub fn import_bundle(&self, bundle: ExportBundle) -> Result<()> {
        let mut books = self.list_books();
        let mut notes = self.list_notes();
        let (added_books, added_notes) = (bundle.books.len(), bundle.notes.len());

        books.extend(bundle.books);
        notes.extend(bundle.notes);

        self.save(keys::BOOKS, &books)?;
        self.save(keys::NOTES, &notes)?;

        log::info!("Imported {} books and {} notes", added_books, added_notes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBackend, NewBook, NewNote, NoteType};

    fn seeded_store() -> Store {
        let store = Store::new(MemoryBackend::new());
        let book = store.add_book(NewBook::new("Walden", "Thoreau")).unwrap();
        let mut note = NewNote::new(book.id, NoteType::Quote, "Simplify, simplify.");
        note.tags = vec!["minimalism".to_string()];
        store.add_note(note).unwrap();
        store
    }

    #[test]
    fn test_bundle_round_trip_into_empty_store() {
        let source = seeded_store();
        let payload =
            export_bundle(&source.list_books(), &source.list_notes()).unwrap();

        let bundle = parse_bundle(&payload).expect("bundle should parse");
        let target = Store::new(MemoryBackend::new());
        target.import_bundle(bundle).unwrap();

        let books = target.list_books();
        let notes = target.list_notes();
        assert_eq!(books.len(), 1);
        assert_eq!(notes.len(), 1);
        assert_eq!(books[0].id, source.list_books()[0].id);
        assert_eq!(books[0].notes_count, 1);
        assert_eq!(notes[0].content, "Simplify, simplify.");
        assert_eq!(notes[0].created_at, source.list_notes()[0].created_at);
    }

    #[test]
    fn test_reimport_into_same_store_duplicates() {
        let store = seeded_store();
        let payload = export_bundle(&store.list_books(), &store.list_notes()).unwrap();

        store.import_bundle(parse_bundle(&payload).unwrap()).unwrap();

        assert_eq!(store.list_books().len(), 2);
        assert_eq!(store.list_notes().len(), 2);
        // Duplicate ids are kept as-is
        assert_eq!(store.list_books()[0].id, store.list_books()[1].id);
    }

    #[test]
    fn test_malformed_bundle_is_no_data() {
        assert!(parse_bundle("").is_none());
        assert!(parse_bundle("{\"books\": 3}").is_none());
        assert!(parse_bundle("not json at all").is_none());
    }

    #[test]
    fn test_bundle_has_exactly_two_top_level_arrays() {
        let store = seeded_store();
        let payload = export_bundle(&store.list_books(), &store.list_notes()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object["books"].is_array());
        assert!(object["notes"].is_array());
    }
}
