//! Subcommand implementations.

pub mod build;
pub mod clean;
pub mod completion;
pub mod extract;
pub mod inspect;
pub mod list_files;
