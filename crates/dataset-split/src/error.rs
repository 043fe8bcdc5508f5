use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("split percentages must add up to 100 (got {training}/{validation}/{testing})")]
    InvalidPercentages {
        training: u8,
        validation: u8,
        testing: u8,
    },

    #[error("slider thumbs out of order or range (min {min}, max {max})")]
    InvalidSlider { min: u8, max: u8 },
}
