//! Date grouping and ordering for the booking timeline.
//!
//! Bookings are grouped by their start date in the presentation timezone.
//! Dates from today onward come first, soonest first; past dates follow,
//! most recent first. Whether past dates are collapsed is left to the UI.
//! `now` and the timezone are always passed in, never read from the clock.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::Locale;
use crate::time::parse_instant;
use crate::types::Booking;

/// Position of a date relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayRelation {
    Today,
    Tomorrow,
    Future,
    Past,
}

impl DayRelation {
    pub fn classify(date: NaiveDate, today: NaiveDate) -> Self {
        if date == today {
            DayRelation::Today
        } else if Some(date) == today.succ_opt() {
            DayRelation::Tomorrow
        } else if date > today {
            DayRelation::Future
        } else {
            DayRelation::Past
        }
    }

    pub fn label(self) -> Option<DayLabel> {
        match self {
            DayRelation::Today => Some(DayLabel::Today),
            DayRelation::Tomorrow => Some(DayLabel::Tomorrow),
            DayRelation::Future | DayRelation::Past => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayLabel {
    Today,
    Tomorrow,
}

impl DayLabel {
    pub fn text(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (DayLabel::Today, Locale::De) => "Heute",
            (DayLabel::Tomorrow, Locale::De) => "Morgen",
            (DayLabel::Today, Locale::En) => "Today",
            (DayLabel::Tomorrow, Locale::En) => "Tomorrow",
        }
    }
}

/// Group bookings by local start date, each group ordered by start instant.
///
/// Placeholder times sort by their literal midnight-UTC value. Equal instants
/// keep input order. Bookings whose start cannot be parsed are left out; see
/// [`build_timeline`] for a variant that keeps them.
pub fn group_by_date(bookings: &[Booking], tz: &Tz) -> BTreeMap<NaiveDate, Vec<Booking>> {
    split_by_date(bookings, tz).0
}

fn split_by_date(
    bookings: &[Booking],
    tz: &Tz,
) -> (BTreeMap<NaiveDate, Vec<Booking>>, Vec<Booking>) {
    let mut dated: BTreeMap<NaiveDate, Vec<(DateTime<Utc>, &Booking)>> = BTreeMap::new();
    let mut undated = Vec::new();

    for booking in bookings {
        match parse_instant(&booking.start_date_time) {
            Some(start) => {
                let date = start.with_timezone(tz).date_naive();
                dated.entry(date).or_default().push((start, booking));
            }
            None => {
                log::debug!(
                    "timeline: booking {} has unparseable start '{}'",
                    booking.id,
                    booking.start_date_time
                );
                undated.push(booking.clone());
            }
        }
    }

    let groups = dated
        .into_iter()
        .map(|(date, mut entries)| {
            entries.sort_by_key(|(start, _)| *start);
            (date, entries.into_iter().map(|(_, b)| b.clone()).collect())
        })
        .collect();

    (groups, undated)
}

/// Order date keys: today and later ascending, then earlier dates descending.
pub fn sort_date_keys<I>(keys: I, today: NaiveDate) -> Vec<NaiveDate>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let (mut future, mut past): (Vec<NaiveDate>, Vec<NaiveDate>) =
        keys.into_iter().partition(|d| *d >= today);
    future.sort();
    past.sort_by(|a, b| b.cmp(a));
    future.extend(past);
    future
}

/// Today's date for `now` in the presentation timezone.
pub fn today_in(now: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    now.with_timezone(tz).date_naive()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateGroup<T> {
    pub date: NaiveDate,
    pub relation: DayRelation,
    pub label: Option<DayLabel>,
    /// `label` in the configured locale ("Heute", "Today", ...).
    pub label_text: Option<&'static str>,
    pub items: Vec<T>,
}

/// Date groups in display order, plus bookings without a usable start.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline<T> {
    pub today: NaiveDate,
    pub groups: Vec<DateGroup<T>>,
    pub undated: Vec<T>,
}

impl<T> Timeline<T> {
    /// Today and later.
    pub fn upcoming(&self) -> impl Iterator<Item = &DateGroup<T>> {
        self.groups.iter().filter(|g| g.relation != DayRelation::Past)
    }

    pub fn past(&self) -> impl Iterator<Item = &DateGroup<T>> {
        self.groups.iter().filter(|g| g.relation == DayRelation::Past)
    }

    /// Every dated item once, in display order.
    pub fn flatten(&self) -> Vec<&T> {
        self.groups.iter().flat_map(|g| g.items.iter()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum::<usize>() + self.undated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn map<U, F>(self, mut f: F) -> Timeline<U>
    where
        F: FnMut(T) -> U,
    {
        let groups = self
            .groups
            .into_iter()
            .map(|g| DateGroup {
                date: g.date,
                relation: g.relation,
                label: g.label,
                label_text: g.label_text,
                items: g.items.into_iter().map(&mut f).collect(),
            })
            .collect();
        let undated = self.undated.into_iter().map(&mut f).collect();
        Timeline {
            today: self.today,
            groups,
            undated,
        }
    }
}

/// Group, label and order bookings relative to `now`.
pub fn build_timeline(
    bookings: &[Booking],
    now: DateTime<Utc>,
    tz: &Tz,
    locale: Locale,
) -> Timeline<Booking> {
    let today = today_in(now, tz);
    let (mut by_date, undated) = split_by_date(bookings, tz);

    let order = sort_date_keys(by_date.keys().copied().collect::<Vec<_>>(), today);
    let groups = order
        .into_iter()
        .filter_map(|date| {
            let items = by_date.remove(&date)?;
            let relation = DayRelation::classify(date, today);
            let label = relation.label();
            Some(DateGroup {
                date,
                relation,
                label,
                label_text: label.map(|l| l.text(locale)),
                items,
            })
        })
        .collect();

    Timeline {
        today,
        groups,
        undated,
    }
}
