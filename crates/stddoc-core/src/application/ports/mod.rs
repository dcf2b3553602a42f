//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `stddoc-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: file and directory operations
//!   - `DocGenerator`: the external documentation generator
//!   - `PdfAssembler`: merges generated pages into one PDF
//!   - `Archiver`: compresses the finished destination tree
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    ArchiveRequest, Archiver, DocGenerator, Filesystem, GeneratorStatus, PdfAssembler, PdfJob,
};

#[cfg(test)]
pub use output::{MockArchiver, MockDocGenerator, MockFilesystem, MockPdfAssembler};
