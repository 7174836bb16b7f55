//! Pickup and drop-off pair.

use crate::domain::foundation::Coordinates;

/// Where a trip starts and ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    start: Coordinates,
    end: Coordinates,
}

impl Route {
    pub fn new(start: Coordinates, end: Coordinates) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> Coordinates {
        self.start
    }

    pub fn end(&self) -> Coordinates {
        self.end
    }
}
