//! Canonical booking identifier resolution.
//!
//! Extraction puts identifiers in many places: the `booking_number` column,
//! which often holds a placeholder phrase ("reserviert", "ohne Nr."), and a
//! handful of aliases inside `details`. Candidates are consulted in a fixed
//! order and the first usable one wins.

use serde::Serialize;

use crate::types::Booking;

/// Values that mean "no number yet" rather than an identifier.
const PLACEHOLDER_NUMBERS: &[&str] = &[
    "reserviert", "ohne nr.", "ohne nr", "pending", "n/a", "tba", "unknown", "-", "–", "",
];

/// Where a resolved identifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "key")]
pub enum NumberSource {
    BookingNumber,
    Detail(&'static str),
}

/// Whether placeholder values are skipped at a given step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter {
    SkipPlaceholders,
    AcceptAny,
}

/// Resolution order. `order_number` is extracted with higher confidence than
/// the free-text column; the remaining aliases are taken as-is.
const RESOLUTION_ORDER: &[(NumberSource, Filter)] = &[
    (NumberSource::BookingNumber, Filter::SkipPlaceholders),
    (NumberSource::Detail("order_number"), Filter::SkipPlaceholders),
    (NumberSource::Detail("confirmation_number"), Filter::AcceptAny),
    (NumberSource::Detail("reference"), Filter::AcceptAny),
    (NumberSource::Detail("pnr"), Filter::AcceptAny),
    (NumberSource::Detail("booking_code"), Filter::AcceptAny),
    (NumberSource::Detail("auftragsnummer"), Filter::AcceptAny),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNumber {
    pub value: String,
    pub source: NumberSource,
}

/// Case-insensitive match against the placeholder set, ignoring surrounding
/// whitespace.
pub fn is_placeholder_number(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    PLACEHOLDER_NUMBERS.contains(&normalized.as_str())
}

fn candidate(booking: &Booking, source: NumberSource) -> Option<String> {
    match source {
        NumberSource::BookingNumber => booking.booking_number.clone(),
        NumberSource::Detail(key) => booking.detail_text(key),
    }
}

/// Resolve the canonical identifier together with where it came from.
///
/// Falls back to the raw `booking_number` even when it is a placeholder, so
/// the UI still has something to show; an empty column resolves to `None`.
pub fn resolve_booking_number_with_source(booking: &Booking) -> Option<ResolvedNumber> {
    for &(source, filter) in RESOLUTION_ORDER {
        let Some(value) = candidate(booking, source) else {
            continue;
        };
        if filter == Filter::SkipPlaceholders && is_placeholder_number(&value) {
            continue;
        }
        return Some(ResolvedNumber {
            value: value.trim().to_string(),
            source,
        });
    }

    booking
        .booking_number
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| ResolvedNumber {
            value: raw.to_string(),
            source: NumberSource::BookingNumber,
        })
}

/// Canonical booking identifier, or `None` when nothing is known.
pub fn resolve_booking_number(booking: &Booking) -> Option<String> {
    resolve_booking_number_with_source(booking).map(|r| r.value)
}
