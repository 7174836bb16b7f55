//! Replies spoken and displayed by the dialog platform.

use super::errors::FulfillmentError;
use super::product::Product;
use super::quote::{FareQuote, RideConfirmation};

/// Text returned to the rider for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    pub speech: String,
    pub display_text: String,
}

impl Reply {
    pub fn new(speech: impl Into<String>, display_text: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            display_text: display_text.into(),
        }
    }

    /// Same text for voice and screen.
    pub fn spoken(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }

    /// Empty reply for actions this webhook does not handle.
    pub fn acknowledgement() -> Self {
        Self::default()
    }

    /// Asks the rider to pick one of the products available at pickup.
    ///
    /// Names are listed in provider order.
    pub fn ride_type_prompt(products: &[Product]) -> Self {
        if products.is_empty() {
            return Self::spoken(
                "Sorry, there are no Uber rides available at your pickup location right now.",
            );
        }

        let options = products
            .iter()
            .map(Product::display_name)
            .collect::<Vec<_>>()
            .join(", ");

        Self::new(
            format!("Which Uber type do you prefer? You can choose from {}", options),
            format!(
                "Select a Uber type. Available options for your location are {}",
                options
            ),
        )
    }

    /// Quotes the fare and asks for confirmation.
    pub fn fare_quote(product_name: &str, quote: &FareQuote) -> Self {
        Self::spoken(format!(
            "Estimated price for your trip in Uber {} will be {}. Confirm to make a booking",
            product_name,
            quote.price_text()
        ))
    }

    /// Announces a booked ride.
    pub fn booking_confirmed(confirmation: &RideConfirmation) -> Self {
        match confirmation.eta_minutes {
            Some(eta) => Self::spoken(format!(
                "Yay!! Your ride has been requested. E.T.A is approximately {} mins",
                eta
            )),
            None => Self::spoken(
                "Yay!! Your ride has been requested. I'll let you know the E.T.A once a driver accepts.",
            ),
        }
    }

    /// Degraded reply for a failed turn.
    pub fn apology(error: &FulfillmentError) -> Self {
        Self::spoken(error.user_message())
    }
}
