//! Split percentages and the two-thumb slider used to edit them

use crate::error::SplitError;
use serde::{Deserialize, Serialize};

/// Share of a dataset assigned to each partition, in whole percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPercentages {
    pub training: u8,
    pub validation: u8,
    pub testing: u8,
}

impl SplitPercentages {
    /// Percentages must add up to exactly 100
    pub fn new(training: u8, validation: u8, testing: u8) -> Result<Self, SplitError> {
        let total = u16::from(training) + u16::from(validation) + u16::from(testing);
        if total != 100 {
            return Err(SplitError::InvalidPercentages {
                training,
                validation,
                testing,
            });
        }
        Ok(Self {
            training,
            validation,
            testing,
        })
    }

    /// Convert slider thumbs: training is `min`, testing is what lies above `max`
    pub fn from_slider(min: u8, max: u8) -> Result<Self, SplitError> {
        if min > max || max > 100 {
            return Err(SplitError::InvalidSlider { min, max });
        }
        Ok(Self {
            training: min,
            validation: max - min,
            testing: 100 - max,
        })
    }

    /// Slider thumb positions for these percentages
    pub fn slider_bounds(&self) -> (u8, u8) {
        (self.training, 100 - self.testing)
    }

    /// Percentages in partition order (training, validation, testing)
    pub fn as_array(&self) -> [u8; 3] {
        [self.training, self.validation, self.testing]
    }
}

impl Default for SplitPercentages {
    fn default() -> Self {
        Self {
            training: 70,
            validation: 20,
            testing: 10,
        }
    }
}

/// Rounded share of each partition in the object total
///
/// The total is clamped to at least 1 so an empty dataset reports zeros.
pub fn object_percentages(training: u64, validation: u64, testing: u64) -> [u8; 3] {
    let total = (training + validation + testing).max(1);
    [training, validation, testing].map(|count| round_percent(count, total))
}

pub(crate) fn round_percent(count: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    ((count as f64) * 100.0 / (total as f64)).round() as u8
}
