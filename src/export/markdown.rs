//! Human-readable Markdown backup of books and notes

use crate::store::{Book, Note, NoteType};

fn glyph(note_type: NoteType) -> &'static str {
    match note_type {
        NoteType::Quote => "💬",
        NoteType::Idea => "💡",
        NoteType::Question => "❓",
        NoteType::Action => "✅",
    }
}

fn heading_label(note_type: NoteType) -> &'static str {
    match note_type {
        NoteType::Quote => "Quote",
        NoteType::Idea => "Idea",
        NoteType::Question => "Question",
        NoteType::Action => "Action",
    }
}

/// Render all notes grouped by their owning book, in shelf order
pub fn export_notes_to_markdown(books: &[Book], notes: &[Note]) -> String {
    let mut output = String::new();
    output.push_str("# Reading Notes\n\n");

    for book in books {
        let book_notes: Vec<&Note> = notes.iter().filter(|n| n.book_id == book.id).collect();
        if book_notes.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n", book.title));
        if !book.author.is_empty() {
            output.push_str(&format!("*{}*\n", book.author));
        }
        output.push('\n');

        for note in book_notes {
            output.push_str(&format!(
                "### {} {}\n\n",
                glyph(note.note_type),
                heading_label(note.note_type)
            ));

            if let Some(ref location) = note.location {
                output.push_str(&format!("*{}*\n\n", location));
            }

            output.push_str(&note.content);
            output.push_str("\n\n");

            if let Some(ref context) = note.context {
                for line in context.lines() {
                    output.push_str(&format!("> {}\n", line));
                }
                output.push('\n');
            }

            if !note.tags.is_empty() {
                let tags: Vec<String> = note.tags.iter().map(|t| format!("#{}", t)).collect();
                output.push_str(&format!("Tags: {}\n\n", tags.join(" ")));
            }

            output.push_str("---\n\n");
        }
    }

    output.trim_end().to_string() + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBackend, NewBook, NewNote, Store};

    #[test]
    fn test_markdown_groups_notes_under_their_book() {
        let store = Store::new(MemoryBackend::new());
        let walden = store.add_book(NewBook::new("Walden", "Thoreau")).unwrap();
        let other = store.add_book(NewBook::new("Unannotated", "Nobody")).unwrap();

        let mut note = NewNote::new(walden.id, NoteType::Quote, "Simplify, simplify.");
        note.location = Some("p. 91".to_string());
        note.context = Some("On economy".to_string());
        note.tags = vec!["minimalism".to_string()];
        store.add_note(note).unwrap();
        store
            .add_note(NewNote::new(walden.id, NoteType::Question, "What is enough?"))
            .unwrap();

        let md = export_notes_to_markdown(&store.list_books(), &store.list_notes());

        assert!(md.starts_with("# Reading Notes\n"));
        assert!(md.contains("## Walden\n*Thoreau*\n"));
        assert!(md.contains("### 💬 Quote\n\n*p. 91*\n\nSimplify, simplify.\n"));
        assert!(md.contains("> On economy\n"));
        assert!(md.contains("Tags: #minimalism\n"));
        assert!(md.contains("### ❓ Question\n\nWhat is enough?\n"));
        // Books without notes get no heading
        assert!(!md.contains(&other.title));
        // Notes end with a horizontal rule separator
        assert!(md.contains("\n---\n"));
    }
}
