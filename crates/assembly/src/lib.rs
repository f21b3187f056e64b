//! Reconciliation of collaborator-proposed groupings against real pages,
//! and assembly of the resulting letters.
//!
//! Nothing the collaborator proposes is authoritative: every page
//! reference is resolved against the on-disk page set before a letter
//! is materialized.

mod assemble;
mod error;
mod grouping;
mod reconcile;
mod refids;
mod translate;

pub use assemble::{
    assemble_and_write, assemble_letters, folder_name, write_letter, META_FILENAME, TEXT_FILENAMES,
};
pub use error::{AssemblyError, Result};
pub use grouping::parse_grouping;
pub use reconcile::{resolve_group, PageIndex};
pub use refids::{dedup_ordered, extract_reference_ids};
pub use translate::{list_letter_dirs, translate_letters, TranslateStats, ENGLISH_FILENAME};
