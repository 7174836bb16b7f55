//! Conversation stages and the dialog actions that select them.

use std::fmt;

/// One turn of the booking dialog.
///
/// Stages run in order: ride type selection writes the route, fare
/// estimation writes the product and quote, confirmation books the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    TypeSelection,
    Estimate,
    Confirm,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::TypeSelection, Stage::Estimate, Stage::Confirm];

    /// Maps a dialog action name to its stage. Matching is exact.
    pub fn from_action(action: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.action() == action)
    }

    /// The dialog action name that triggers this stage.
    pub fn action(&self) -> &'static str {
        match self {
            Stage::TypeSelection => "uber.type",
            Stage::Estimate => "uber.estimate",
            Stage::Confirm => "uber.confirm",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::TypeSelection => "type_selection",
            Stage::Estimate => "estimate",
            Stage::Confirm => "confirm",
        };
        write!(f, "{}", s)
    }
}
