//! Bulk text patching: replace a literal marker across a source tree.
//!
//! Walks the root for files matching the pattern set, counts marker
//! occurrences in each, and rewrites the files that contain it.

mod scan;
mod substitute;

pub use scan::{collect_candidates, matches_any, relative_path};
pub use substitute::{
    count_occurrences, patch_file, patch_tree, FileEdit, PatchResult, PatchSpec,
};
