//! Dataset split calculations
//!
//! Percentages for the training, validation and testing partitions of a
//! dataset version, and the rebalancing that assigns annotated tasks to
//! partitions by object count.

mod error;
mod percentages;
mod rebalance;

pub use error::SplitError;
pub use percentages::{object_percentages, SplitPercentages};
pub use rebalance::{rebalance, DatasetType, Partition, SplitCandidate, SplitPlan};
