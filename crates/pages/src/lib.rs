//! Page discovery and grouping-request construction.
//!
//! A page is one text artifact on disk; the loader derives its canonical
//! key, reads it verbatim, and attaches any side-channel translation.
//! The listing builder serializes the loaded pages into the single
//! payload sent to the grouping collaborator.

mod backfill;
mod error;
mod listing;
mod loader;
pub mod prompts;

pub use backfill::transcribe_missing;
pub use error::{PagesError, Result};
pub use listing::{build_listing, PAGES_END, PAGES_START, PAGE_END, PAGE_START};
pub use loader::{page_key, PageLoader};
