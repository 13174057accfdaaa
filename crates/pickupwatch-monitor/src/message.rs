//! Human-readable rendering: console status lines and push text.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use pickupwatch_core::{AvailabilitySnapshot, TransitionEvent};
use pickupwatch_fetch::FetchError;

fn local_ts(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S %Z").to_string()
}

/// One compact line of `store:status` per poll cycle, timestamped in the
/// market's local time.
#[must_use]
pub fn status_line(snapshot: &AvailabilitySnapshot, tz: Tz) -> String {
    let brief = if snapshot.stores.is_empty() {
        "(no stores)".to_string()
    } else {
        snapshot
            .stores
            .values()
            .map(|status| format!("{}:{}", status.store_name, status.state))
            .collect::<Vec<_>>()
            .join(" | ")
    };
    format!("[{}] {brief}", local_ts(snapshot.taken_at, tz))
}

/// Console line for a failed poll cycle.
#[must_use]
pub fn failure_line(now: DateTime<Utc>, tz: Tz, err: &FetchError) -> String {
    format!("[{}] fetch failed: {err}", local_ts(now, tz))
}

/// Push title for a restock event.
#[must_use]
pub fn event_title(event: &TransitionEvent) -> String {
    format!("In stock: {} - {}", event.store_name, event.sku)
}

/// Push body for a restock event: local time, city, and the retailer's
/// pickup quote when present.
#[must_use]
pub fn event_body(event: &TransitionEvent, tz: Tz) -> String {
    let mut body = format!("{} pickup available", local_ts(event.observed_at, tz));
    if let Some(city) = &event.city {
        body.push_str(&format!(" ({city})"));
    }
    if let Some(quote) = &event.quote {
        body.push('\n');
        body.push_str(quote);
    }
    body
}
