//! Edge-triggered transition detection between consecutive availability
//! snapshots.

use crate::types::{AvailabilitySnapshot, AvailabilityState, StoreStatus, TransitionEvent};

/// Detects per-store flips from not-available to available between
/// consecutive successful snapshots.
///
/// The detector is the sole owner of the previous snapshot. It starts out
/// bootstrapping (no prior snapshot); the first observed snapshot is stored
/// without producing any events, since there is nothing to diff against.
/// A failed fetch must simply not be passed to [`TransitionDetector::observe`]
/// — the stored snapshot then stays untouched and no event can be
/// manufactured from the failure.
#[derive(Debug)]
pub struct TransitionDetector {
    sku: String,
    previous: Option<AvailabilitySnapshot>,
}

impl TransitionDetector {
    #[must_use]
    pub fn new(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            previous: None,
        }
    }

    /// `true` once a first successful snapshot has been stored.
    #[must_use]
    pub fn is_steady(&self) -> bool {
        self.previous.is_some()
    }

    /// The most recently stored snapshot, including `Unknown` entries for
    /// stores that dropped out of the response.
    #[must_use]
    pub fn previous(&self) -> Option<&AvailabilitySnapshot> {
        self.previous.as_ref()
    }

    /// Diffs `snapshot` against the stored previous snapshot and replaces it.
    ///
    /// A store emits a [`TransitionEvent`] iff its new state is `Available`
    /// and its previous state was `Unavailable`, `Unknown`, or the store was
    /// absent from the previous snapshot (treated as `Unknown`). Stores
    /// present previously but missing from `snapshot` are kept in the stored
    /// set as `Unknown`, so a store briefly dropping out of the nearby-search
    /// result set cannot mask a restock — while never itself producing an
    /// event.
    pub fn observe(&mut self, snapshot: AvailabilitySnapshot) -> Vec<TransitionEvent> {
        let Some(previous) = self.previous.take() else {
            self.previous = Some(snapshot);
            return Vec::new();
        };

        let mut next = snapshot;
        for (number, prev_status) in &previous.stores {
            if !next.stores.contains_key(number) {
                next.stores.insert(
                    number.clone(),
                    StoreStatus {
                        store_name: prev_status.store_name.clone(),
                        city: prev_status.city.clone(),
                        state: AvailabilityState::Unknown,
                        quote: None,
                    },
                );
            }
        }

        let mut events = Vec::new();
        for (number, status) in &next.stores {
            if status.state != AvailabilityState::Available {
                continue;
            }
            let previous_state = previous
                .stores
                .get(number)
                .map_or(AvailabilityState::Unknown, |s| s.state);
            if previous_state != AvailabilityState::Available {
                events.push(TransitionEvent {
                    store_number: number.clone(),
                    store_name: status.store_name.clone(),
                    city: status.city.clone(),
                    sku: self.sku.clone(),
                    observed_at: next.taken_at,
                    previous_state,
                    quote: status.quote.clone(),
                });
            }
        }

        self.previous = Some(next);
        events
    }
}
