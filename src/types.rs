//! Booking and attachment rows as returned by the store.
//!
//! Field names follow the store's snake_case columns. Anything the extraction
//! pipeline may leave out is optional or defaulted, so one sparse row never
//! fails the whole snapshot.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Kind of reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    Hotel,
    Train,
    Flight,
    Bus,
    RentalCar,
    #[default]
    #[serde(other)]
    Other,
}

impl BookingType {
    /// Point-to-point travel, where an origin city is required.
    pub fn is_transport(self) -> bool {
        matches!(self, BookingType::Train | BookingType::Flight | BookingType::Bus)
    }

    /// Types whose PDF attachment is shown as the primary ticket.
    pub fn has_primary_ticket(self) -> bool {
        matches!(self, BookingType::Train | BookingType::Flight)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingType::Hotel => "hotel",
            BookingType::Train => "train",
            BookingType::Flight => "flight",
            BookingType::Bus => "bus",
            BookingType::RentalCar => "rental_car",
            BookingType::Other => "other",
        }
    }
}

/// Lifecycle status of a booking. Unknown values read as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Changed,
    Cancelled,
    Proposal,
    #[default]
    #[serde(other)]
    Pending,
}

/// One travel reservation.
///
/// `start_date_time` / `end_date_time` are kept as the raw ISO text from the
/// store; see [`crate::time`] for parsing and the midnight-UTC placeholder rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub booking_type: BookingType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date_time: String,
    #[serde(default)]
    pub end_date_time: Option<String>,
    #[serde(default)]
    pub booking_number: Option<String>,
    /// Open bag of extracted fields (`order_number`, `pnr`, seat info, ...).
    #[serde(default, deserialize_with = "details_or_empty")]
    pub details: Map<String, Value>,
    #[serde(default)]
    pub traveler_name: Option<String>,
    #[serde(default)]
    pub traveler_names: Option<Vec<String>>,
    #[serde(default)]
    pub origin_city: Option<String>,
    #[serde(default)]
    pub destination_city: Option<String>,
    #[serde(default)]
    pub venue_name: Option<String>,
    #[serde(default)]
    pub venue_address: Option<String>,
    #[serde(default)]
    pub source_email_id: Option<String>,
    #[serde(default)]
    pub ai_confidence: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: BookingStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Booking {
    /// Text value of a `details` entry: trimmed non-empty strings and numbers.
    /// Anything else (null, bool, nested objects) counts as absent.
    pub fn detail_text(&self, key: &str) -> Option<String> {
        match self.details.get(key)? {
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// `traveler_name` followed by `traveler_names`, trimmed, without empties
    /// or case-insensitive repeats.
    pub fn travelers(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let candidates = self
            .traveler_name
            .iter()
            .chain(self.traveler_names.iter().flatten());
        for name in candidates {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            if out.iter().any(|seen| seen.to_lowercase() == name.to_lowercase()) {
                continue;
            }
            out.push(name.to_string());
        }
        out
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept an object, a JSON-encoded object string, or anything else as empty.
fn details_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    })
}

/// A file that came in with an email or a manual PDF upload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub content_type: Option<String>,
    /// `None` until the extraction pipeline links the file to a booking.
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub email_id: Option<String>,
    #[serde(default)]
    pub qr_code_image_path: Option<String>,
    /// Raw scanned text, or JSON metadata from the QR extraction service.
    #[serde(default)]
    pub qr_code_data: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Attachment {
    /// Linked booking id, treating an empty string like `None`.
    pub fn linked_booking(&self) -> Option<&str> {
        self.booking_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    pub fn source_email(&self) -> Option<&str> {
        self.email_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    pub fn is_pdf(&self) -> bool {
        let by_type = self
            .content_type
            .as_deref()
            .map(|ct| ct.trim().to_ascii_lowercase().starts_with("application/pdf"))
            .unwrap_or(false);
        by_type || self.file_name.to_ascii_lowercase().ends_with(".pdf")
    }
}

/// Severity tier of a data quality issue. Ordered most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Booking field an issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueField {
    DestinationCity,
    OriginCity,
    BookingNumber,
    AiConfidence,
}

impl IssueField {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueField::DestinationCity => "destination_city",
            IssueField::OriginCity => "origin_city",
            IssueField::BookingNumber => "booking_number",
            IssueField::AiConfidence => "ai_confidence",
        }
    }
}

/// Derived warning about an incomplete or suspicious field. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQualityIssue {
    pub field: IssueField,
    pub message: String,
    pub severity: Severity,
}
