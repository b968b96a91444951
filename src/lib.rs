//! Core library for the material-aggregator command line application.
//!
//! The pipeline loads six material master workbooks, repairs and cleans their
//! fields, chains them together with left joins and exports one denormalized
//! sheet. Spreadsheet IO lives under [`io`], the tabular representation in
//! [`model`], the per-field fixes and cleaning in [`transform`], the join chain
//! in [`aggregate`], output shaping and summaries in [`report`], and the stage
//! orchestration in [`pipeline`].

pub mod aggregate;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod transform;

pub use error::{PipelineError, Result};
