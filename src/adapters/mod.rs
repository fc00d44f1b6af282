//! Concrete adapter implementations for ports.

pub mod csv_store;
pub mod file_config;
pub mod prompt_parser;
#[cfg(feature = "sqlite")]
pub mod sqlite_store;
