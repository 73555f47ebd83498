//! # Workflows Module
//!
//! Top-level entry points of the library.
//!
//! - **Grouping Workflow** ([`group`]) - Iterative registration and clustering
//!   of a peak list into spin systems.

pub mod group;
