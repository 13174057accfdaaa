//! Conversion of pickup responses into availability snapshots.

use std::collections::BTreeMap;

use pickupwatch_core::{AvailabilityState, StoreStatus};

use crate::error::FetchError;
use crate::types::{PartAvailability, PickupMessageResponse};

/// Maps a parsed pickup response to per-store statuses for `sku`.
///
/// A store whose `partsAvailability` lacks the SKU entirely is recorded as
/// `Unknown` — the endpoint said nothing about the part there, which is not
/// the same as an explicit out-of-stock answer. Entries without a store
/// number are dropped.
///
/// # Errors
///
/// Returns [`FetchError::MissingStoreList`] when the response has no
/// `body.stores` field.
pub fn parse_stores(
    response: &PickupMessageResponse,
    sku: &str,
) -> Result<BTreeMap<String, StoreStatus>, FetchError> {
    let stores = response
        .body
        .as_ref()
        .and_then(|body| body.stores.as_ref())
        .ok_or(FetchError::MissingStoreList)?;

    let mut out = BTreeMap::new();
    for store in stores {
        let Some(number) = store
            .store_number
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        else {
            tracing::debug!("skipping store entry without a store number");
            continue;
        };

        let part = store.parts_availability.get(sku);
        let state = match part {
            None => AvailabilityState::Unknown,
            Some(part) if part.pickup_display.as_deref() == Some("available") => {
                AvailabilityState::Available
            }
            Some(_) => AvailabilityState::Unavailable,
        };

        out.insert(
            number.to_string(),
            StoreStatus {
                store_name: store
                    .store_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .unwrap_or(number)
                    .to_string(),
                city: store
                    .city
                    .as_deref()
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string),
                state,
                quote: part.and_then(pickup_quote),
            },
        );
    }

    Ok(out)
}

/// Extracts the pickup quote, preferring the regular message text over the
/// flat search quote.
fn pickup_quote(part: &PartAvailability) -> Option<String> {
    part.message_types
        .as_ref()
        .and_then(|types| types.regular.as_ref())
        .and_then(|regular| regular.store_pickup_quote.as_deref())
        .or(part.pickup_search_quote.as_deref())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
