//! # Core Module
//!
//! Stateless building blocks: the peak-list data model and the file formats it
//! is read from and written to.
//!
//! - **Peak Representation** ([`models`]) - Dimensions, peaks, peak lists, tolerance maps
//! - **File I/O** ([`io`]) - Sparky, AutoAssign, JSON and chemical-shift table
//!   peak lists, plus the grouping result document

pub mod io;
pub mod models;
