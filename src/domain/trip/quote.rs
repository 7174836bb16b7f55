//! Fare quotes and ride confirmations returned by the provider.

use crate::domain::foundation::{FareId, TripRequestId};

/// A time-limited fare quote. Its id is required to request the ride.
#[derive(Debug, Clone, PartialEq)]
pub struct FareQuote {
    pub fare_id: FareId,
    pub value: f64,
    pub currency_code: Option<String>,
    /// Provider-formatted price, e.g. `"$15.00"`.
    pub display: Option<String>,
}

impl FareQuote {
    pub fn new(fare_id: FareId, value: f64) -> Self {
        Self {
            fare_id,
            value,
            currency_code: None,
            display: None,
        }
    }

    pub fn with_currency(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = Some(currency_code.into());
        self
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Price as read to the rider: the provider's own formatting when
    /// present, otherwise the bare value followed by the currency code.
    pub fn price_text(&self) -> String {
        if let Some(display) = self.display.as_deref().filter(|d| !d.trim().is_empty()) {
            return display.to_string();
        }
        match self.currency_code.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(currency) => format!("{} {}", self.value, currency),
            None => self.value.to_string(),
        }
    }
}

/// The provider's acknowledgement of a ride request.
#[derive(Debug, Clone, PartialEq)]
pub struct RideConfirmation {
    pub request_id: TripRequestId,
    /// Minutes until pickup; absent while the provider is still matching a driver.
    pub eta_minutes: Option<u32>,
}

impl RideConfirmation {
    pub fn new(request_id: TripRequestId, eta_minutes: Option<u32>) -> Self {
        Self {
            request_id,
            eta_minutes,
        }
    }
}
