//! # Engine Module
//!
//! The stateful machinery behind spin-system grouping: the chi-square gated
//! neighborhood test, the density clustering pass, the registry that collects
//! clusters across passes, and the adapter to the external registration
//! oracle that estimates per-dimension tolerances.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Grouping parameters and their builder
//! - **Neighborhoods** ([`region`]) - Scaled distance and chi-square cutoff
//! - **Clustering** ([`dbscan`], [`cluster`], [`registry`]) - One pass, its clusters, and the cross-pass registry
//! - **Registration** ([`oracle`]) - The oracle trait and the child-process implementation
//! - **Tolerance Policy** ([`policy`], [`state`]) - How tolerances evolve between steps
//! - **Progress Monitoring** ([`progress`]) - Progress reporting callbacks
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod cluster;
pub mod config;
pub mod dbscan;
pub mod error;
pub mod oracle;
pub mod policy;
pub mod progress;
pub mod region;
pub mod registry;
pub mod state;
