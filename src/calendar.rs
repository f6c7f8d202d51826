use crate::models::{CalendarEvent, JoinedTraining};
use chrono::{Datelike, Duration, Local, Months, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Month,
    #[default]
    Week,
    Day,
}

impl CalendarView {
    pub fn as_str(self) -> &'static str {
        match self {
            CalendarView::Month => "month",
            CalendarView::Week => "week",
            CalendarView::Day => "day",
        }
    }
}

/// Half-open range of local dates `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

pub fn to_events(trainings: &[JoinedTraining]) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = trainings
        .iter()
        .filter_map(|joined| {
            let start = joined.training.date?;
            let minutes = joined.training.duration.unwrap_or(0);
            let Some(end) = Duration::try_minutes(minutes).and_then(|span| start.checked_add_signed(span))
            else {
                warn!(training = joined.training.self_href(), minutes, "duration out of range, skipping event");
                return None;
            };
            Some(CalendarEvent {
                title: format!(
                    "{} - {}",
                    joined.training.activity.as_deref().unwrap_or_default(),
                    joined.customer_name()
                ),
                start,
                end,
                training: joined.training.self_href().to_string(),
            })
        })
        .collect();
    events.sort_by_key(|event| event.start);
    events
}

pub fn visible_range(view: CalendarView, anchor: NaiveDate) -> DateRange {
    match view {
        CalendarView::Day => DateRange {
            start: anchor,
            end: anchor + Duration::days(1),
        },
        CalendarView::Week => {
            let start = week_start(anchor);
            DateRange {
                start,
                end: start + Duration::days(7),
            }
        }
        CalendarView::Month => {
            let start = anchor.with_day(1).unwrap_or(anchor);
            DateRange {
                start,
                end: start + Months::new(1),
            }
        }
    }
}

/// Moves the anchor one view-unit backwards (`-1`) or forwards (`1`).
pub fn navigate(view: CalendarView, anchor: NaiveDate, step: i32) -> NaiveDate {
    match view {
        CalendarView::Day => anchor + Duration::days(i64::from(step)),
        CalendarView::Week => anchor + Duration::weeks(i64::from(step)),
        CalendarView::Month => {
            let months = Months::new(step.unsigned_abs());
            if step >= 0 {
                anchor.checked_add_months(months).unwrap_or(anchor)
            } else {
                anchor.checked_sub_months(months).unwrap_or(anchor)
            }
        }
    }
}

/// Events overlapping `range`, compared in local time.
pub fn events_in_range(events: &[CalendarEvent], range: DateRange) -> Vec<CalendarEvent> {
    let (Some(start), Some(end)) = (local_midnight(range.start), local_midnight(range.end)) else {
        return Vec::new();
    };
    events
        .iter()
        .filter(|event| {
            let event_start = event.start.with_timezone(&Local);
            let event_end = event.end.with_timezone(&Local);
            event_start < end && (event_end > start || event_start >= start)
        })
        .cloned()
        .collect()
}

fn local_midnight(date: NaiveDate) -> Option<chrono::DateTime<Local>> {
    Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}
