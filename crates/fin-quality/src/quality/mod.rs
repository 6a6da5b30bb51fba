//! Dimension evaluators, aggregation and summary building.
//!
//! [`QualityChecker`] runs completeness, consistency, validity and
//! uniqueness in that order over one mutable DataFrame, each appending a
//! `flag_<dimension>` column, then appends `flag_overall`.
//! [`SummaryBuilder`] turns the collected results into a [`crate::QualitySummary`].

mod checker;
mod summary;

pub use checker::QualityChecker;
pub use summary::SummaryBuilder;
