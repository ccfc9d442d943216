//! # Bondstress Ext File
//!
//! Storage and file input for the bondstress engine:
//! - [`InMemoryRepository`]: every storage trait over concurrent maps
//! - [`ingest`]: CSV parsing and loading for curves, securities, positions
//!   and stress scenarios
//!
//! Durable backends implement the same traits from `bondstress-traits`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ingest;
mod memory;

pub use error::{IngestError, IngestResult};
pub use memory::InMemoryRepository;
