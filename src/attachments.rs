//! Attachment-to-booking reconciliation.
//!
//! The engine never assigns `booking_id`; it only decides, for display, which
//! files belong to a booking: those linked to it directly, and unlinked files
//! from the same source email that still need operator triage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::types::{Attachment, Booking};

/// Files for one booking.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentSet {
    /// `booking_id` equals the booking's id.
    pub assigned: Vec<Attachment>,
    /// Unlinked, from the booking's source email.
    pub unassigned: Vec<Attachment>,
}

/// Partition `attachments` for `booking`. Input order is preserved.
pub fn reconcile(booking: &Booking, attachments: &[Attachment]) -> AttachmentSet {
    let assigned = attachments
        .iter()
        .filter(|a| a.booking_id.as_deref() == Some(booking.id.as_str()))
        .cloned()
        .collect();

    let source_email = booking
        .source_email_id
        .as_deref()
        .filter(|id| !id.trim().is_empty());

    let unassigned = match source_email {
        Some(email_id) => attachments
            .iter()
            .filter(|a| a.linked_booking().is_none() && a.source_email() == Some(email_id))
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    AttachmentSet {
        assigned,
        unassigned,
    }
}

/// Display partition of a booking's files. Every file appears in exactly
/// one list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    /// Assigned PDFs of train and flight bookings, shown as the ticket.
    pub primary_tickets: Vec<Attachment>,
    pub other_documents: Vec<Attachment>,
    pub unassigned: Vec<Attachment>,
}

pub fn partition_for_display(booking: &Booking, attachments: &[Attachment]) -> DocumentView {
    let set = reconcile(booking, attachments);

    let (primary_tickets, other_documents) = if booking.booking_type.has_primary_ticket() {
        set.assigned.into_iter().partition(|a| a.is_pdf())
    } else {
        (Vec::new(), set.assigned)
    };

    DocumentView {
        primary_tickets,
        other_documents,
        unassigned: set.unassigned,
    }
}

/// Unlinked attachments grouped by source email, for manual triage.
/// Attachments without an email id are left out.
pub fn unassigned_by_email(attachments: &[Attachment]) -> BTreeMap<String, Vec<Attachment>> {
    let mut groups: BTreeMap<String, Vec<Attachment>> = BTreeMap::new();
    for attachment in attachments.iter().filter(|a| a.linked_booking().is_none()) {
        if let Some(email_id) = attachment.source_email() {
            groups
                .entry(email_id.to_string())
                .or_default()
                .push(attachment.clone());
        }
    }
    groups
}

/// Structured output of the QR extraction service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QrMetadata {
    pub sha256: Option<String>,
    pub method: Option<String>,
    /// Bounding box as returned by the extractor; its shape varies by method.
    pub bbox: Option<Value>,
    pub symbology: Option<String>,
}

impl QrMetadata {
    /// Whether `image` hashes to the recorded digest. False when no digest
    /// was recorded.
    pub fn matches_image(&self, image: &[u8]) -> bool {
        let Some(expected) = self.sha256.as_deref().map(str::trim) else {
            return false;
        };
        let actual = hex::encode(Sha256::digest(image));
        actual.eq_ignore_ascii_case(expected)
    }
}

/// `qr_code_data` is either extractor metadata or plain scanned text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QrCode {
    Parsed(QrMetadata),
    Opaque(String),
}

fn text_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Classify raw `qr_code_data`. Metadata is a JSON object with a `sha256` or
/// `method` key; everything else, including invalid JSON, is opaque text.
pub fn parse_qr_data(raw: &str) -> QrCode {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) {
        if map.contains_key("sha256") || map.contains_key("method") {
            return QrCode::Parsed(QrMetadata {
                sha256: text_field(&map, "sha256"),
                method: text_field(&map, "method"),
                bbox: map.get("bbox").filter(|v| !v.is_null()).cloned(),
                symbology: text_field(&map, "symbology"),
            });
        }
    }
    QrCode::Opaque(raw.to_string())
}

impl Attachment {
    /// QR content attached to this file, if any was extracted.
    pub fn qr_code(&self) -> Option<QrCode> {
        self.qr_code_data
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(parse_qr_data)
    }
}
