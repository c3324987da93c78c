pub mod dispatch;
pub mod events;
pub mod reader;

pub use dispatch::dispatch;
pub use reader::{
    discover_journals, import_journal_dir, import_journal_file, ingest_lines, BatchStats,
};
