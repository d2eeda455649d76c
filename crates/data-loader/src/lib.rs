//! # Data Loader Crate
//!
//! This crate loads and indexes the historical seat-allocation cutoff table
//! that backs the heuristic college recommender.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (CutoffRecord, ProgramKey, CutoffIndex)
//! - **parser**: Parse the CSV export into Rust structs
//! - **index**: Load, index and validate the table
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::CutoffIndex;
//! use std::path::Path;
//!
//! let index = CutoffIndex::load_from_file(Path::new("data/cutoffs.csv"))?;
//!
//! for record in index.latest_by_program("OPEN") {
//!     println!("{} - {}: {}", record.institute_name, record.branch, record.closing_rank);
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    Rank,
    Year,
    Round,
    // Core types
    Column,
    CutoffIndex,
    CutoffRecord,
    ProgramKey,
};
