//! Models shared between the sheetmerge server and its browser UI.
//!
//! Everything in here is plain data: the fixed template catalogue, the
//! column mapping and layout options a user picks in the form, the column
//! checks returned by a CSV preview and the request payloads.

pub mod model;
pub mod requests;
