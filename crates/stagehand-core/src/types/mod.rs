//! Value types shared across the staging operations.
//!
//! `DestDir` and `SafePath` are validated on construction and cannot be built
//! from raw paths, so code holding one never re-checks containment.

pub mod dest_dir;
pub mod extension_filter;
pub mod file_record;
pub mod safe_path;

pub use dest_dir::DestDir;
pub use extension_filter::ExtensionFilter;
pub use file_record::FileRecord;
pub use safe_path::SafePath;
