//! margin — the data core of a personal reading-notes app
//!
//! Books, notes, folders, collections, and saved filters live in a
//! [`Store`] over a pluggable [`Backend`]; a spaced-repetition review
//! scheduler and an activity-streak tracker are derived on top, and
//! books+notes can be exported to Markdown, CSV, or a JSON bundle that
//! re-imports additively.
//!
//! The store is synchronous and single-writer: every operation is a
//! load-mutate-persist pass that is atomic within one process but not
//! across processes sharing the same backing data. Two concurrent writers
//! can lose updates to each other; run one store per backing directory.

mod activity;
mod export;
mod review;
mod store;

pub use activity::Streak;
pub use export::{
    export_bundle, export_notes_to_csv, export_notes_to_markdown, parse_bundle, ExportBundle,
};
pub use review::{is_due, next_interval_days, MAX_INTERVAL_DAYS};
pub use store::{
    Backend, Book, BookUpdate, Collection, CollectionUpdate, FileBackend, FilterSpec, Folder,
    FolderUpdate, IdGen, MemoryBackend, NewBook, NewNote, Note, NoteType, NoteUpdate, ReadingGoal,
    Result, ReviewSession, SavedFilter, Store, StoreError,
};
