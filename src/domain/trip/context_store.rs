//! ContextStore - keyed access to the dialog platform's contexts.
//!
//! The platform is the real store: it sends every active context with each
//! turn and keeps whatever we return in `contextOut`. This module only
//! looks the trip context up by name and reflects an updated snapshot
//! back, preserving parameters the platform owns.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::context::{keys, TripContext, TRIP_CONTEXT_NAME};

/// Number of turns a freshly created trip context stays alive.
pub const DEFAULT_CONTEXT_LIFESPAN: u32 = 5;

/// A named context as exchanged with the dialog platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformContext {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifespan: Option<u32>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Any other keys the platform attached; returned untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlatformContext {
    /// Creates an empty context with the default lifespan.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lifespan: Some(DEFAULT_CONTEXT_LIFESPAN),
            parameters: Map::new(),
            extra: Map::new(),
        }
    }
}

/// Inbound contexts indexed by name.
#[derive(Debug, Clone, Default)]
pub struct ContextStore {
    contexts: HashMap<String, PlatformContext>,
}

impl ContextStore {
    /// Indexes contexts by name. If a name repeats, the first one wins.
    pub fn from_contexts(contexts: impl IntoIterator<Item = PlatformContext>) -> Self {
        let mut map = HashMap::new();
        for context in contexts {
            map.entry(context.name.clone()).or_insert(context);
        }
        Self { contexts: map }
    }

    pub fn get(&self, name: &str) -> Option<&PlatformContext> {
        self.contexts.get(name)
    }

    /// The inbound trip context exactly as the platform sent it.
    pub fn inbound_trip_context(&self) -> Option<&PlatformContext> {
        self.get(TRIP_CONTEXT_NAME)
    }

    /// Typed snapshot of the trip context. Empty on the first turn.
    pub fn trip_context(&self) -> TripContext {
        self.inbound_trip_context()
            .map(|context| TripContext::from_parameters(&context.parameters))
            .unwrap_or_default()
    }

    /// Builds the outbound trip context for `contextOut`.
    ///
    /// Trip keys are replaced by the snapshot's fields; any other parameter
    /// and the lifespan are carried over from the inbound context.
    pub fn reflect(&self, trip: &TripContext) -> PlatformContext {
        let mut context = self
            .inbound_trip_context()
            .cloned()
            .unwrap_or_else(|| PlatformContext::new(TRIP_CONTEXT_NAME));

        for key in keys::ALL {
            context.parameters.remove(key);
        }
        context.parameters.extend(trip.to_parameters());
        context
    }
}
