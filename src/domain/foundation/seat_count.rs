//! Seat count value object for pooled rides.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::ValidationError;

/// Number of seats requested on a shared ride. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SeatCount(u32);

impl SeatCount {
    /// Seat count sent for products that are not pooled.
    pub const DEFAULT: SeatCount = SeatCount(2);

    /// Creates a SeatCount, returning error if zero.
    pub fn new(seats: u32) -> Result<Self, ValidationError> {
        if seats == 0 {
            return Err(ValidationError::out_of_range(
                "seat_count",
                1.0,
                f64::from(u32::MAX),
                0.0,
            ));
        }
        Ok(Self(seats))
    }

    /// Parses a seat count from a dialog parameter.
    ///
    /// Dialog platforms echo numbers back either as JSON numbers or as
    /// strings, so both `3` and `"3"` are accepted.
    pub fn from_parameter(value: &Value) -> Result<Self, ValidationError> {
        let seats = match value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        }
        .ok_or_else(|| ValidationError::invalid_format("seat_count", "expected a whole number"))?;

        let seats = u32::try_from(seats)
            .map_err(|_| ValidationError::invalid_format("seat_count", "value too large"))?;
        Self::new(seats)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for SeatCount {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SeatCount> for u32 {
    fn from(value: SeatCount) -> Self {
        value.0
    }
}

impl fmt::Display for SeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
