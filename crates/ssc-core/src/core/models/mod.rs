//! # Core Models Module
//!
//! Data structures describing an experimental NMR peak list.
//!
//! - [`dimension`] - A single labeled chemical shift with its assignment
//! - [`peak`] - A peak: one dimension per label plus extra attributes
//! - [`peaklist`] - An ordered, id-addressed collection of peaks sharing one schema
//! - [`filter`] - Chemical-shift range filters applied after parsing
//! - [`tolerance`] - Per-dimension standard deviations used for clustering
//! - [`ids`] - Stable identifiers for peaks
//!
//! ```ignore
//! use ssc::core::models::{peak::Peak, peaklist::PeakList};
//!
//! let labels = vec!["HN".to_string(), "N".to_string()];
//! let mut list = PeakList::new("HSQC", labels.clone(), PeakListFormat::Json);
//! let id = list.push(Peak::unassigned(&labels, &[8.21, 119.7], vec![])?)?;
//! assert_eq!(list[id].value("N"), Some(119.7));
//! ```

pub mod dimension;
pub mod filter;
pub mod ids;
pub mod peak;
pub mod peaklist;
pub mod tolerance;
