//! Greedy rebalancing of annotated tasks into dataset partitions
//!
//! Tasks are consumed in the order given. Each partition takes tasks until
//! the next one would overshoot its object target; that task is kept only
//! if overshooting is closer to the target than stopping short.
//!
//! The testing partition has no stopping rule: it takes every task left
//! after training and validation, even past its target. A split therefore
//! always assigns every candidate, and no task keeps a dataset type from an
//! earlier split.

use crate::percentages::{round_percent, SplitPercentages};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Partition of a dataset version
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatasetType {
    Training = 1,
    Validation = 2,
    Testing = 3,
}

impl DatasetType {
    /// Code stored on frames and dataset versions
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// A task offered to the split, with its label and frame totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitCandidate {
    pub id: String,
    pub object_count: u64,
    pub frame_count: u64,
}

impl SplitCandidate {
    pub fn new(id: impl Into<String>, object_count: u64, frame_count: u64) -> Self {
        Self {
            id: id.into(),
            object_count,
            frame_count,
        }
    }
}

/// Tasks assigned to one partition and what they add up to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub dataset_type: DatasetType,
    pub task_ids: Vec<String>,
    pub image_count: u64,
    pub object_count: u64,
    /// Achieved share of all objects, rounded
    pub percentage: u8,
}

/// Result of a rebalance: one partition per dataset type, in code order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    pub partitions: Vec<Partition>,
}

impl SplitPlan {
    pub fn partition(&self, dataset_type: DatasetType) -> Option<&Partition> {
        self.partitions
            .iter()
            .find(|p| p.dataset_type == dataset_type)
    }

    pub fn total_objects(&self) -> u64 {
        self.partitions.iter().map(|p| p.object_count).sum()
    }

    pub fn achieved(&self) -> [u8; 3] {
        let mut out = [0; 3];
        for (slot, partition) in out.iter_mut().zip(&self.partitions) {
            *slot = partition.percentage;
        }
        out
    }
}

/// Assign `candidates` to training, validation and testing partitions
pub fn rebalance(candidates: &[SplitCandidate], percentages: SplitPercentages) -> SplitPlan {
    let total: u64 = candidates.iter().map(|c| c.object_count).sum();
    let targets = percentages
        .as_array()
        .map(|pct| ((total as f64) * f64::from(pct) / 100.0).round() as u64);

    log::debug!(
        "Rebalancing {} tasks ({} objects) towards {:?}",
        candidates.len(),
        total,
        targets
    );

    let mut remaining = candidates;
    let mut partitions = Vec::with_capacity(3);

    for (dataset_type, target) in DatasetType::iter().zip(targets) {
        let taken = match dataset_type {
            DatasetType::Testing => remaining.len(),
            _ => take_until_target(remaining, target),
        };
        let (chosen, rest) = remaining.split_at(taken);
        remaining = rest;

        let object_count = chosen.iter().map(|c| c.object_count).sum();
        partitions.push(Partition {
            dataset_type,
            task_ids: chosen.iter().map(|c| c.id.clone()).collect(),
            image_count: chosen.iter().map(|c| c.frame_count).sum(),
            object_count,
            percentage: round_percent(object_count, total),
        });
    }

    SplitPlan { partitions }
}

/// Number of leading candidates to take for an object target
fn take_until_target(candidates: &[SplitCandidate], target: u64) -> usize {
    let mut objects = 0;
    for (index, candidate) in candidates.iter().enumerate() {
        let previous = objects;
        objects += candidate.object_count;
        if objects > target {
            let overshoot = objects - target;
            let undershoot = target - previous;
            return if overshoot < undershoot { index + 1 } else { index };
        }
    }
    candidates.len()
}
