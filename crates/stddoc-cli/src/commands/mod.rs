//! Command handlers. Each translates parsed arguments into core calls and
//! prints the result.

pub mod build;
pub mod completions;
pub mod config;
pub mod init;
pub mod phobos;
pub mod tango;
