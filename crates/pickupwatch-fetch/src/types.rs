//! Response types for the retailer's `pickup-message` endpoint.
//!
//! ## Observed shape from the live endpoint
//!
//! ### Envelope
//! The payload nests everything under a `body` object; the store list lives
//! at `body.stores`. Both levels have been observed to disappear on error
//! pages, so both are modeled as `Option` — their absence is a format error
//! surfaced by the parser, not silently treated as "no stores".
//!
//! ### `partsAvailability`
//! A map keyed by SKU (e.g., `"MFYQ4KH/A"`), even though the request names a
//! single part. A store that does not carry the part at all simply lacks the
//! key.
//!
//! ### `pickupDisplay`
//! The per-SKU status string: `"available"` when the part is
//! pickup-eligible and in stock; `"unavailable"` or `"ineligible"`
//! otherwise. Only the exact value `"available"` counts as in stock.
//!
//! ### Pickup quote
//! Human-readable pickup text lives at
//! `messageTypes.regular.storePickupQuote`, with `pickupSearchQuote` as a
//! flat fallback on some responses. Either may be empty.

use std::collections::HashMap;

use serde::Deserialize;

/// Top-level response from `GET /shop/retail/pickup-message`.
#[derive(Debug, Deserialize)]
pub struct PickupMessageResponse {
    #[serde(default)]
    pub body: Option<PickupBody>,
}

#[derive(Debug, Deserialize)]
pub struct PickupBody {
    /// Absent on malformed/error responses; `None` is a format error.
    #[serde(default)]
    pub stores: Option<Vec<PickupStore>>,
}

/// One store entry from the pickup response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupStore {
    /// Retailer store code (e.g., `"R764"`). Skipped when absent.
    #[serde(default)]
    pub store_number: Option<String>,

    #[serde(default)]
    pub store_name: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    /// Per-SKU availability, keyed by SKU.
    #[serde(default)]
    pub parts_availability: HashMap<String, PartAvailability>,
}

/// Availability details for one SKU at one store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartAvailability {
    #[serde(default)]
    pub pickup_display: Option<String>,

    #[serde(default)]
    pub pickup_search_quote: Option<String>,

    #[serde(default)]
    pub message_types: Option<MessageTypes>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTypes {
    #[serde(default)]
    pub regular: Option<RegularMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegularMessage {
    #[serde(default)]
    pub store_pickup_quote: Option<String>,
}
