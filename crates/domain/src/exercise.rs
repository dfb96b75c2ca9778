use std::fmt;

use derive_more::{AsRef, Deref, Display};
use log::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDef {
    pub id: ExerciseID,
    pub name: String,
    pub sets: u32,
    /// Free-form target, e.g. "10", "10 per side" or "30\"".
    pub reps: String,
    pub notes: String,
    pub is_duration: bool,
    pub is_circuit: bool,
    pub superset_id: Option<SupersetID>,
    pub default_weight: Option<Weight>,
    pub tags: Vec<String>,
}

impl ExerciseDef {
    #[must_use]
    pub fn has_weight_input(&self) -> bool {
        !self.is_duration && !self.is_circuit
    }

    /// Only exercises with a weight input can be extended by additional sets.
    #[must_use]
    pub fn accepts_extra_sets(&self) -> bool {
        self.has_weight_input()
    }
}

#[derive(AsRef, Deref, Display, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExerciseID(String);

impl From<&str> for ExerciseID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ExerciseID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(AsRef, Deref, Display, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SupersetID(String);

impl From<&str> for SupersetID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SupersetID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub const ZERO: Weight = Weight(0.0);

    /// Upper bound of user input.
    pub const MAX: Weight = Weight(999.9);

    /// Step used by the increment and decrement buttons of the weight input.
    pub const STEP: f32 = 1.25;

    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !(0.0..1000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        Ok(Self(value))
    }

    /// Parses user input.
    ///
    /// Only the leading number of the input is considered, so "12kg" is read as 12. Values above
    /// the accepted range are clamped to [`Weight::MAX`]. Anything else is read as zero.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        let value = value.trim();
        let weight = match leading_number(value).parse::<f32>() {
            Ok(parsed) if parsed > 0.0 => Weight::new(parsed).unwrap_or(Weight::MAX),
            _ => Weight::ZERO,
        };
        if !value.is_empty() && Weight::try_from(value).ok() != Some(weight) {
            warn!("interpreting weight input \"{value}\" as {weight} kg");
        }
        weight
    }

    #[must_use]
    pub fn increased(self) -> Self {
        Weight::new(self.0 + Self::STEP).unwrap_or(self)
    }

    #[must_use]
    pub fn decreased(self) -> Self {
        Self((self.0 - Self::STEP).max(0.0))
    }
}

fn leading_number(value: &str) -> &str {
    let mut seen_point = false;
    let end = value
        .char_indices()
        .find(|&(i, c)| match c {
            '0'..='9' => false,
            '.' if !seen_point => {
                seen_point = true;
                false
            }
            '+' | '-' => i != 0,
            _ => true,
        })
        .map_or(value.len(), |(i, _)| i);
    &value[..end]
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

impl From<Weight> for f32 {
    fn from(value: Weight) -> Self {
        value.0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0.0 to 999.9 kg")]
    OutOfRange,
    #[error("Weight must be a decimal")]
    ParseError,
}
