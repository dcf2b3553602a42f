//! Infrastructure adapters for stddoc.
//!
//! This crate implements the ports defined in `stddoc-core::application::ports`.
//! It contains all external processes and I/O operations.

pub mod archive;
pub mod filesystem;
pub mod generator;
pub mod pdf;
mod process;

// Re-export commonly used adapters
pub use archive::{ArchiveSnapshot, CommandArchiver, RecordingArchiver};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use generator::{DilGenerator, ScriptedGenerator};
pub use pdf::{CommandPdfAssembler, RecordingPdfAssembler};
