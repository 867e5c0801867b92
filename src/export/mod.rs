mod bundle;
mod csv;
mod markdown;

pub use bundle::{export_bundle, parse_bundle, ExportBundle};
pub use markdown::export_notes_to_markdown;
pub use self::csv::export_notes_to_csv;
