//! Data quality checks for extracted bookings.
//!
//! Issues are warnings for the operator, never errors: a booking with issues
//! stays in every result set. Each rule is evaluated independently.

use serde::Serialize;

use crate::config::Locale;
use crate::types::{Booking, DataQualityIssue, IssueField, Severity};

pub const DEFAULT_LOW_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Narrower than the resolver's placeholder set: "pending", "tba" and
/// "unknown" are not flagged here.
const FLAGGED_NUMBERS: &[&str] = &["reserviert", "ohne nr.", "ohne nr", "n/a", "-", ""];

fn is_missing_city(city: Option<&str>) -> bool {
    match city.map(str::trim) {
        None | Some("") => true,
        Some(c) => c.eq_ignore_ascii_case("unknown"),
    }
}

fn message(field: IssueField, locale: Locale, detail: Option<&str>) -> String {
    match (field, locale) {
        (IssueField::DestinationCity, Locale::De) => "Zielort fehlt".to_string(),
        (IssueField::DestinationCity, Locale::En) => "Destination city is missing".to_string(),
        (IssueField::OriginCity, Locale::De) => "Abfahrtsort fehlt".to_string(),
        (IssueField::OriginCity, Locale::En) => "Origin city is missing".to_string(),
        (IssueField::BookingNumber, Locale::De) => format!(
            "Buchungsnummer ist ein Platzhalter (\"{}\")",
            detail.unwrap_or_default()
        ),
        (IssueField::BookingNumber, Locale::En) => format!(
            "Booking number is a placeholder (\"{}\")",
            detail.unwrap_or_default()
        ),
        (IssueField::AiConfidence, Locale::De) => {
            format!("Niedrige KI-Konfidenz ({}%)", detail.unwrap_or_default())
        }
        (IssueField::AiConfidence, Locale::En) => {
            format!("Low AI confidence ({}%)", detail.unwrap_or_default())
        }
    }
}

/// Check a booking with an explicit confidence threshold and message locale.
pub fn check_quality_with(
    booking: &Booking,
    threshold: f64,
    locale: Locale,
) -> Vec<DataQualityIssue> {
    let mut issues = Vec::new();

    if is_missing_city(booking.destination_city.as_deref()) {
        issues.push(DataQualityIssue {
            field: IssueField::DestinationCity,
            message: message(IssueField::DestinationCity, locale, None),
            severity: Severity::High,
        });
    }

    if booking.booking_type.is_transport() && is_missing_city(booking.origin_city.as_deref()) {
        issues.push(DataQualityIssue {
            field: IssueField::OriginCity,
            message: message(IssueField::OriginCity, locale, None),
            severity: Severity::High,
        });
    }

    if let Some(number) = booking.booking_number.as_deref() {
        let normalized = number.trim().to_lowercase();
        if FLAGGED_NUMBERS.contains(&normalized.as_str()) {
            issues.push(DataQualityIssue {
                field: IssueField::BookingNumber,
                message: message(IssueField::BookingNumber, locale, Some(number.trim())),
                severity: Severity::Medium,
            });
        }
    }

    if let Some(confidence) = booking.ai_confidence {
        if confidence < threshold {
            let percent = ((confidence * 100.0).round() as i64).to_string();
            issues.push(DataQualityIssue {
                field: IssueField::AiConfidence,
                message: message(IssueField::AiConfidence, locale, Some(&percent)),
                severity: Severity::Low,
            });
        }
    }

    issues
}

/// Check a booking with the default threshold and German messages.
pub fn check_quality(booking: &Booking) -> Vec<DataQualityIssue> {
    check_quality_with(booking, DEFAULT_LOW_CONFIDENCE_THRESHOLD, Locale::De)
}

/// Derived purely from an issue list.
pub fn has_high_severity(issues: &[DataQualityIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::High)
}

pub fn has_high_severity_issues(booking: &Booking) -> bool {
    has_high_severity(&check_quality(booking))
}

/// Issue counts across a booking list, for the dashboard badge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitySummary {
    pub total: usize,
    pub with_issues: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// Ids with at least one high-severity issue, in input order.
    pub flagged_ids: Vec<String>,
}

pub fn summarize_quality_with(
    bookings: &[Booking],
    threshold: f64,
    locale: Locale,
) -> QualitySummary {
    let mut summary = QualitySummary {
        total: bookings.len(),
        ..Default::default()
    };

    for booking in bookings {
        let issues = check_quality_with(booking, threshold, locale);
        if issues.is_empty() {
            continue;
        }
        summary.with_issues += 1;
        for issue in &issues {
            match issue.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }
        if has_high_severity(&issues) {
            summary.flagged_ids.push(booking.id.clone());
        }
    }

    summary
}

pub fn summarize_quality(bookings: &[Booking]) -> QualitySummary {
    summarize_quality_with(bookings, DEFAULT_LOW_CONFIDENCE_THRESHOLD, Locale::De)
}
