//! Derived statistics over a Shelf book collection.
//!
//! [`Statistics::compute`] is a pure function of a book snapshot and the
//! current time; [`StatsCache`] memoizes it per store version so repeated
//! reads of an unchanged collection do not rescan it.

pub mod cache;
pub mod statistics;

pub use cache::StatsCache;
pub use statistics::{RankedCount, Statistics};
