//! Booking reconciliation engine for the travel dashboard.
//!
//! Pure, synchronous transformations over one snapshot of bookings and
//! attachments: duplicate collapsing, identifier resolution, data quality
//! checks, attachment partitioning and timeline grouping. File loading lives
//! in [`snapshot`] and [`config`]; nothing else touches I/O.

pub mod attachments;
pub mod booking_number;
pub mod config;
pub mod dashboard;
pub mod dedup;
pub mod error;
pub mod quality;
pub mod snapshot;
pub mod time;
pub mod timeline;
pub mod types;

pub use attachments::{
    partition_for_display, reconcile, unassigned_by_email, AttachmentSet, DocumentView, QrCode,
    QrMetadata,
};
pub use booking_number::resolve_booking_number;
pub use config::{load_config, load_config_from, Locale, ReconcileConfig};
pub use dashboard::{build_dashboard, BookingCard, DashboardView};
pub use dedup::{deduplicate, deduplicate_with_report, DedupReport};
pub use error::ReconcileError;
pub use quality::{check_quality, has_high_severity_issues, summarize_quality, QualitySummary};
pub use time::{format_time, has_real_time};
pub use timeline::{
    build_timeline, group_by_date, sort_date_keys, DateGroup, DayLabel, DayRelation, Timeline,
};
pub use types::{
    Attachment, Booking, BookingStatus, BookingType, DataQualityIssue, IssueField, Severity,
};
