//! Dashboard assembly: the full pass from a raw booking snapshot to the
//! grouped, annotated timeline the UI renders.
//!
//! dedup -> per-booking identifier + quality -> timeline.
//! Runs on one snapshot per refresh; the same input gives the same view.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::booking_number::resolve_booking_number;
use crate::config::ReconcileConfig;
use crate::dedup::{deduplicate_with_report, Superseded};
use crate::quality::{
    check_quality_with, has_high_severity, summarize_quality_with, QualitySummary,
};
use crate::time::{display_time, has_real_time};
use crate::timeline::{build_timeline, Timeline};
use crate::types::{Booking, DataQualityIssue};

/// One booking as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCard {
    pub booking: Booking,
    pub resolved_booking_number: Option<String>,
    pub issues: Vec<DataQualityIssue>,
    pub has_high_severity_issues: bool,
    /// `HH:mm` in the presentation timezone, or the placeholder label.
    pub start_time: String,
    pub end_time: Option<String>,
    pub has_real_time: bool,
    pub travelers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub timeline: Timeline<BookingCard>,
    pub quality: QualitySummary,
    /// Input bookings hidden as duplicates.
    pub superseded: Vec<Superseded>,
}

/// Annotate a single booking for display.
pub fn booking_card(booking: Booking, config: &ReconcileConfig) -> BookingCard {
    let tz = config.tz();
    let issues = check_quality_with(&booking, config.low_confidence_threshold, config.locale);
    let has_high = has_high_severity(&issues);
    let start_time = display_time(&booking.start_date_time, &tz, &config.time_placeholder);
    let end_time = booking
        .end_date_time
        .as_deref()
        .filter(|end| !end.trim().is_empty())
        .map(|end| display_time(end, &tz, &config.time_placeholder));

    BookingCard {
        resolved_booking_number: resolve_booking_number(&booking),
        has_high_severity_issues: has_high,
        has_real_time: has_real_time(&booking.start_date_time),
        travelers: booking.travelers(),
        start_time,
        end_time,
        issues,
        booking,
    }
}

/// Build the dashboard for a booking snapshot as of `now`.
pub fn build_dashboard(
    bookings: &[Booking],
    now: DateTime<Utc>,
    config: &ReconcileConfig,
) -> DashboardView {
    let tz = config.tz();
    let report = deduplicate_with_report(bookings);
    let quality = summarize_quality_with(
        &report.bookings,
        config.low_confidence_threshold,
        config.locale,
    );

    log::info!(
        "dashboard: {} bookings, {} after dedup, {} flagged",
        bookings.len(),
        report.bookings.len(),
        quality.flagged_ids.len()
    );

    let timeline = build_timeline(&report.bookings, now, &tz, config.locale)
        .map(|b| booking_card(b, config));

    DashboardView {
        timeline,
        quality,
        superseded: report.superseded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Locale;
    use crate::timeline::DayLabel;
    use crate::types::BookingType;
    use chrono::TimeZone;
    use serde_json::json;

    fn make_train(id: &str, start: &str) -> Booking {
        Booking {
            id: id.to_string(),
            booking_type: BookingType::Train,
            start_date_time: start.to_string(),
            origin_city: Some("Köln".to_string()),
            destination_city: Some("Berlin".to_string()),
            ..Default::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_card_fields() {
        let booking = Booking {
            booking_number: Some("reserviert".to_string()),
            details: match json!({ "order_number": "DB777" }) {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            },
            end_date_time: Some("2025-03-12T14:30:00Z".to_string()),
            traveler_name: Some("Lea".to_string()),
            traveler_names: Some(vec!["Tom".to_string()]),
            ..make_train("b1", "2025-03-12T09:45:00Z")
        };
        let card = booking_card(booking, &ReconcileConfig::default());
        assert_eq!(card.resolved_booking_number.as_deref(), Some("DB777"));
        assert_eq!(card.start_time, "10:45");
        assert_eq!(card.end_time.as_deref(), Some("15:30"));
        assert!(card.has_real_time);
        assert_eq!(card.travelers, vec!["Lea", "Tom"]);
        // "reserviert" is still flagged even though a better number resolved
        assert_eq!(card.issues.len(), 1);
        assert!(!card.has_high_severity_issues);
    }

    #[test]
    fn test_placeholder_start_shows_label() {
        let config = ReconcileConfig {
            time_placeholder: "--:--".to_string(),
            ..Default::default()
        };
        let card = booking_card(make_train("b1", "2025-03-12T00:00:00Z"), &config);
        assert_eq!(card.start_time, "--:--");
        assert!(!card.has_real_time);
        assert_eq!(card.end_time, None);
    }

    #[test]
    fn test_dashboard_dedups_then_groups() {
        let bookings = vec![
            make_train("sparse", "2025-03-10T00:00:00Z"),
            Booking {
                booking_number: Some("DB1".to_string()),
                ..make_train("rich", "2025-03-10T00:00:00Z")
            },
            make_train("next", "2025-03-11T06:00:00Z"),
            Booking {
                destination_city: Some("unknown".to_string()),
                ..make_train("old", "2025-02-01T06:00:00Z")
            },
        ];
        let view = build_dashboard(&bookings, now(), &ReconcileConfig::default());

        let ids: Vec<&str> = view
            .timeline
            .flatten()
            .into_iter()
            .map(|c| c.booking.id.as_str())
            .collect();
        assert_eq!(ids, vec!["rich", "next", "old"]);
        assert_eq!(view.timeline.groups[0].label, Some(DayLabel::Today));
        assert_eq!(view.superseded.len(), 1);
        assert_eq!(view.superseded[0].id, "sparse");
        assert_eq!(view.quality.total, 3);
        assert_eq!(view.quality.flagged_ids, vec!["old".to_string()]);
    }

    #[test]
    fn test_dashboard_is_deterministic() {
        let bookings = vec![
            make_train("a", "2025-03-12T09:00:00Z"),
            make_train("b", "2025-03-12T09:00:00Z"),
            make_train("c", "2025-03-09T09:00:00Z"),
            make_train("d", "garbage"),
        ];
        let config = ReconcileConfig {
            locale: Locale::En,
            ..Default::default()
        };
        let first = build_dashboard(&bookings, now(), &config);
        let second = build_dashboard(&bookings, now(), &config);
        assert_eq!(first, second);
        assert_eq!(first.timeline.undated.len(), 1);
    }

    #[test]
    fn test_dashboard_serializes_for_ui() {
        let bookings = [make_train("a", "2025-03-10T09:00:00Z")];
        let view = build_dashboard(&bookings, now(), &ReconcileConfig::default());
        let value = serde_json::to_value(&view).unwrap();
        let group = &value["timeline"]["groups"][0];
        assert_eq!(group["items"][0]["startTime"], "10:00");
        assert_eq!(group["items"][0]["booking"]["booking_type"], "train");
        assert_eq!(group["label"], "today");
        assert_eq!(group["labelText"], "Heute");
    }

    #[test]
    fn test_day_labels_follow_config_locale() {
        let bookings = [
            make_train("a", "2025-03-10T09:00:00Z"),
            make_train("b", "2025-03-11T09:00:00Z"),
        ];
        let german = build_dashboard(&bookings, now(), &ReconcileConfig::default());
        let texts: Vec<_> = german.timeline.groups.iter().map(|g| g.label_text).collect();
        assert_eq!(texts, vec![Some("Heute"), Some("Morgen")]);

        let config = ReconcileConfig {
            locale: Locale::En,
            ..Default::default()
        };
        let english = build_dashboard(&bookings, now(), &config);
        let texts: Vec<_> = english.timeline.groups.iter().map(|g| g.label_text).collect();
        assert_eq!(texts, vec![Some("Today"), Some("Tomorrow")]);
    }
}
