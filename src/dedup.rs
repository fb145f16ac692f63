//! Collapse duplicate bookings from repeated email/PDF ingestion.
//!
//! Two bookings collide when they share type, UTC start date, origin and
//! destination. On a collision the richer record wins as a whole; fields are
//! not merged. A record that only differs in fields outside the four richness
//! criteria loses whatever it had to the one kept.

use std::collections::HashMap;

use serde::Serialize;

use crate::time::{parse_instant, instant_has_real_time, utc_date_key};
use crate::types::{Booking, BookingType};

/// Heuristic identity of a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub booking_type: BookingType,
    pub date: String,
    pub origin: String,
    pub destination: String,
}

impl DedupKey {
    pub fn of(booking: &Booking) -> Self {
        Self {
            booking_type: booking.booking_type,
            date: utc_date_key(&booking.start_date_time),
            origin: booking.origin_city.clone().unwrap_or_default(),
            destination: booking.destination_city.clone().unwrap_or_default(),
        }
    }
}

fn start_has_real_time(booking: &Booking) -> bool {
    parse_instant(&booking.start_date_time)
        .map(|dt| instant_has_real_time(&dt))
        .unwrap_or(false)
}

/// Whether `incoming` should replace `stored` for the same key: it gains an
/// end time, a booking number, a real start time, or strictly more details.
pub fn supersedes(incoming: &Booking, stored: &Booking) -> bool {
    (incoming.end_date_time.is_some() && stored.end_date_time.is_none())
        || (incoming.booking_number.is_some() && stored.booking_number.is_none())
        || (start_has_real_time(incoming) && !start_has_real_time(stored))
        || incoming.details.len() > stored.details.len()
}

/// A booking that did not survive deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Superseded {
    pub id: String,
    /// Id of the booking that finally holds the slot.
    pub replaced_by: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupReport {
    pub bookings: Vec<Booking>,
    pub superseded: Vec<Superseded>,
}

/// Deduplicate and report which input bookings were dropped.
///
/// Output keeps the position of each key's first appearance; a replacement
/// takes over the slot of the booking it replaces. Ties keep the stored one,
/// so the result is deterministic for a given input order.
pub fn deduplicate_with_report(bookings: &[Booking]) -> DedupReport {
    let mut slots: Vec<Booking> = Vec::with_capacity(bookings.len());
    let mut index: HashMap<DedupKey, usize> = HashMap::new();
    // (dropped id, slot it lost)
    let mut dropped: Vec<(String, usize)> = Vec::new();

    for incoming in bookings {
        let key = DedupKey::of(incoming);
        let Some(&slot) = index.get(&key) else {
            index.insert(key, slots.len());
            slots.push(incoming.clone());
            continue;
        };

        if supersedes(incoming, &slots[slot]) {
            log::debug!(
                "dedup: {} replaces {} ({} on {})",
                incoming.id,
                slots[slot].id,
                key.booking_type.as_str(),
                key.date
            );
            let replaced = std::mem::replace(&mut slots[slot], incoming.clone());
            dropped.push((replaced.id, slot));
        } else {
            log::debug!("dedup: {} kept over {}", slots[slot].id, incoming.id);
            dropped.push((incoming.id.clone(), slot));
        }
    }

    let superseded = dropped
        .into_iter()
        .map(|(id, slot)| Superseded {
            id,
            replaced_by: slots[slot].id.clone(),
        })
        .collect();

    DedupReport {
        bookings: slots,
        superseded,
    }
}

/// Deduplicated canonical booking list.
pub fn deduplicate(bookings: &[Booking]) -> Vec<Booking> {
    deduplicate_with_report(bookings).bookings
}
