//! # SSC Core Library
//!
//! Groups the peaks of a multi-dimensional NMR peak list into spin systems.
//! Peaks are clustered with a density-based algorithm whose neighborhoods are
//! chi-square ellipsoids scaled by per-dimension tolerances, and the tolerances
//! are refined step by step from an external registration algorithm.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Peak`, `PeakList`,
//!   tolerance maps), peak-list formats and the grouping result document.
//!
//! - **[`engine`]: The Logic Core.** The region query, the modified DBSCAN pass,
//!   the cluster registry, the registration oracle adapter and tolerance policies.
//!
//! - **[`workflows`]: The Public API.** The refinement driver that ties oracle
//!   calls and clustering passes together into one grouping run.

pub mod core;
pub mod engine;
pub mod workflows;
