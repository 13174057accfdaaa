//! Domain types for pickup-availability monitoring.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pickup availability of the monitored SKU at one store.
///
/// `Unknown` covers stores that are part of the tracked set but absent (or
/// unreadable) in the current response. It never triggers a notification by
/// itself and is never coerced to `Available` or `Unavailable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityState {
    Available,
    Unavailable,
    Unknown,
}

impl std::fmt::Display for AvailabilityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AvailabilityState::Available => write!(f, "available"),
            AvailabilityState::Unavailable => write!(f, "unavailable"),
            AvailabilityState::Unknown => write!(f, "unknown"),
        }
    }
}

/// One store's observation within a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    /// Store display name (e.g., `"홍대"`).
    pub store_name: String,
    pub city: Option<String>,
    pub state: AvailabilityState,
    /// Retailer pickup quote text, carried into notifications.
    pub quote: Option<String>,
}

/// The complete per-store availability mapping observed in one poll cycle.
///
/// Keyed by store number so iteration order is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySnapshot {
    pub taken_at: DateTime<Utc>,
    pub stores: BTreeMap<String, StoreStatus>,
}

impl AvailabilitySnapshot {
    #[must_use]
    pub fn new(taken_at: DateTime<Utc>, stores: BTreeMap<String, StoreStatus>) -> Self {
        Self { taken_at, stores }
    }
}

/// A store flipping from not-available to available between two consecutive
/// successful polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub store_number: String,
    pub store_name: String,
    pub city: Option<String>,
    pub sku: String,
    pub observed_at: DateTime<Utc>,
    /// State before the flip: `Unavailable` or `Unknown` (absent stores count
    /// as `Unknown`).
    pub previous_state: AvailabilityState,
    pub quote: Option<String>,
}
