//! Spreadsheet export, one row per note, RFC 4180 quoting

use crate::store::{Book, Note, Result};

/// Render all notes as CSV with a fixed header row. Fields containing the
/// delimiter or quotes are quoted with internal quotes doubled (handled by
/// the csv writer).
pub fn export_notes_to_csv(books: &[Book], notes: &[Note]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "Book", "Author", "Type", "Content", "Location", "Context", "Tags", "Created",
    ])?;

    for note in notes {
        let book = books.iter().find(|b| b.id == note.book_id);
        writer.write_record([
            book.map(|b| b.title.as_str()).unwrap_or(""),
            book.map(|b| b.author.as_str()).unwrap_or(""),
            note.note_type.label(),
            note.content.as_str(),
            note.location.as_deref().unwrap_or(""),
            note.context.as_deref().unwrap_or(""),
            note.tags.join("; ").as_str(),
            note.created_at.to_rfc3339().as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBackend, NewBook, NewNote, NoteType, Store};

    #[test]
    fn test_csv_header_and_rows() {
        let store = Store::new(MemoryBackend::new());
        let book = store.add_book(NewBook::new("Walden", "Thoreau")).unwrap();
        let mut note = NewNote::new(book.id, NoteType::Idea, "plain content");
        note.tags = vec!["a".to_string(), "b".to_string()];
        store.add_note(note).unwrap();

        let csv = export_notes_to_csv(&store.list_books(), &store.list_notes()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Book,Author,Type,Content,Location,Context,Tags,Created"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("Walden,Thoreau,idea,plain content,,,a; b,"));
    }

    #[test]
    fn test_csv_quotes_and_doubles_embedded_quotes() {
        let store = Store::new(MemoryBackend::new());
        let book = store.add_book(NewBook::new("Walden", "Thoreau")).unwrap();
        store
            .add_note(NewNote::new(
                book.id,
                NoteType::Quote,
                "He said \"hi\", then left",
            ))
            .unwrap();

        let csv = export_notes_to_csv(&store.list_books(), &store.list_notes()).unwrap();
        assert!(csv.contains("\"He said \"\"hi\"\", then left\""));
    }

    #[test]
    fn test_csv_tolerates_dangling_book_reference() {
        let store = Store::new(MemoryBackend::new());
        store
            .add_note(NewNote::new(uuid::Uuid::new_v4(), NoteType::Quote, "orphan"))
            .unwrap();

        let csv = export_notes_to_csv(&store.list_books(), &store.list_notes()).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with(",,quote,orphan,"));
    }
}
