//! Changelog extraction and normalization engine.
//!
//! Given the raw text of a release-notes page (markdown-like, or HTML routed
//! through the fallback converter), produce a deduplicated, newest-first list
//! of release entries. Pure and synchronous: no I/O, no shared state, same
//! input and strategy always give the same output.

pub mod classify;
pub mod compare;
pub mod consolidate;
pub mod content;
pub mod links;
pub mod normalize;
pub mod segment;

pub use consolidate::ChangelogEntry;
pub use content::PageContent;
pub use segment::{extract_entries, Strategy};
