use std::ops::Mul;

use derive_more::{Display, Into};

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(0..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

impl Mul<Weight> for Reps {
    type Output = f32;

    #[allow(clippy::cast_precision_loss)]
    fn mul(self, rhs: Weight) -> Self::Output {
        self.0 as f32 * rhs.0
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

/// Load lifted in a set. The unit is a display concern and not part of the value.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !value.is_finite() || !(0.0..10000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<f32>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0 to 9999.9")]
    OutOfRange,
    #[error("Weight must be a decimal")]
    ParseError,
}

/// Self-assessed execution quality of a set, from 0 (poor) to 10 (perfect).
#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct FormRating(u8);

impl FormRating {
    pub const MIN: FormRating = FormRating(0);
    pub const DEFAULT: FormRating = FormRating(5);
    pub const MAX: FormRating = FormRating(10);

    pub fn new(value: u8) -> Result<Self, FormRatingError> {
        if value > Self::MAX.0 {
            return Err(FormRatingError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl Default for FormRating {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<&str> for FormRating {
    type Error = FormRatingError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u8>() {
            Ok(parsed_value) => FormRating::new(parsed_value),
            Err(_) => Err(FormRatingError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FormRatingError {
    #[error("Form rating must be in the range 0 to 10")]
    OutOfRange,
    #[error("Form rating must be an integer")]
    ParseError,
}
