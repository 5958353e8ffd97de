//! Core library for the session-sheets command line application.
//!
//! A run reads a session schedule workbook, normalises its rows and writes a
//! formatted section into a destination workbook; the dashboard then reads
//! that section back for filtering and reporting. The modules keep those
//! responsibilities narrow: workbook adapters live under [`io`], the shared
//! column set in [`schema`], row types inside [`model`], the row
//! normalisation in [`transform`], the end-to-end run in [`transfer`], and
//! the read-only views in [`dashboard`].

pub mod config;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod model;
pub mod schema;
pub mod transfer;
pub mod transform;

pub use error::{Result, ToolError};
