//! Release note aggregation, rendering and writing.

pub mod buckets;
pub mod builder;
pub mod format;
pub mod writer;

pub use buckets::{aggregate, Bucket, CategoryBuckets};
pub use builder::{build_release_note, generate_summary, ReleaseNote, ReleaseNoteInput};
pub use format::render_note;
pub use writer::prepend_note;
