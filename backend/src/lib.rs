//! CSV to PDF merge server: one PDF per CSV row from a fixed template
//! catalogue, returned as a single PDF or a ZIP archive.

pub mod assets;
pub mod config;
pub mod error;
pub mod services;
