//! Derived view: filter then stable sort over the canonical list.
//!
//! The projection is recomputed from scratch on every call; no index or
//! cached result is kept between renders.

use crate::models::{Customer, CustomerField, JoinedTraining, TrainingField};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: Copy + PartialEq> SortState<K> {
    pub fn new(key: K, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Same key flips the direction, a new key starts ascending.
    pub fn toggle(self, key: K) -> Self {
        if self.key == key {
            Self::new(key, self.direction.reversed())
        } else {
            Self::new(key, SortDirection::Asc)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec<K: Ord> {
    None,
    /// One query, matched against every searchable field; any match passes.
    Global(String),
    /// Per-field queries; every non-empty query must match its field.
    PerField(BTreeMap<K, String>),
}

impl<K: Ord> Default for FilterSpec<K> {
    fn default() -> Self {
        FilterSpec::None
    }
}

impl<K: Ord> FilterSpec<K> {
    pub fn global(query: impl Into<String>) -> Self {
        let query = query.into();
        if query.is_empty() {
            FilterSpec::None
        } else {
            FilterSpec::Global(query)
        }
    }

    pub fn per_field(queries: impl IntoIterator<Item = (K, String)>) -> Self {
        let queries: BTreeMap<K, String> = queries
            .into_iter()
            .filter(|(_, query)| !query.is_empty())
            .collect();
        if queries.is_empty() {
            FilterSpec::None
        } else {
            FilterSpec::PerField(queries)
        }
    }

    pub fn global_query(&self) -> &str {
        match self {
            FilterSpec::Global(query) => query,
            _ => "",
        }
    }

    pub fn field_query(&self, key: &K) -> &str {
        match self {
            FilterSpec::PerField(queries) => queries.get(key).map(String::as_str).unwrap_or(""),
            _ => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(i64),
    Timestamp(Option<DateTime<FixedOffset>>),
}

impl SortValue {
    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.cmp(b),
            (SortValue::Timestamp(a), SortValue::Timestamp(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// A record that can be filtered and sorted by a view.
pub trait Projectable {
    type Key: Copy + Ord + Hash + Debug;

    /// Text of every field the global filter searches.
    fn search_fields(&self) -> Vec<String>;

    /// Text of a single field for per-field filtering.
    fn field_text(&self, key: Self::Key) -> String;

    fn sort_value(&self, key: Self::Key) -> SortValue;
}

impl Projectable for Customer {
    type Key = CustomerField;

    fn search_fields(&self) -> Vec<String> {
        CustomerField::ALL
            .into_iter()
            .map(|field| self.field(field).to_string())
            .collect()
    }

    fn field_text(&self, key: CustomerField) -> String {
        self.field(key).to_string()
    }

    fn sort_value(&self, key: CustomerField) -> SortValue {
        SortValue::Text(self.field(key).to_lowercase())
    }
}

impl Projectable for JoinedTraining {
    type Key = TrainingField;

    fn search_fields(&self) -> Vec<String> {
        TrainingField::ALL
            .into_iter()
            .map(|field| self.field_text(field))
            .collect()
    }

    fn field_text(&self, key: TrainingField) -> String {
        match key {
            TrainingField::Date => self.display_date(),
            TrainingField::Activity => self.training.activity.clone().unwrap_or_default(),
            TrainingField::Duration => self
                .training
                .duration
                .map(|minutes| minutes.to_string())
                .unwrap_or_default(),
            TrainingField::CustomerName => self.customer_name(),
        }
    }

    fn sort_value(&self, key: TrainingField) -> SortValue {
        match key {
            TrainingField::Date => SortValue::Timestamp(self.training.date),
            TrainingField::Activity => SortValue::Text(
                self.training
                    .activity
                    .as_deref()
                    .unwrap_or_default()
                    .to_lowercase(),
            ),
            TrainingField::Duration => SortValue::Number(self.training.duration.unwrap_or(0)),
            TrainingField::CustomerName => SortValue::Text(self.customer_name().to_lowercase()),
        }
    }
}

pub fn matches<R: Projectable>(record: &R, filter: &FilterSpec<R::Key>) -> bool {
    match filter {
        FilterSpec::None => true,
        FilterSpec::Global(query) => {
            let needle = query.to_lowercase();
            record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        }
        FilterSpec::PerField(queries) => queries.iter().all(|(key, query)| {
            record
                .field_text(*key)
                .to_lowercase()
                .contains(&query.to_lowercase())
        }),
    }
}

/// Filters `records` and sorts the survivors by a single key.
///
/// The sort is stable: records with equal keys keep their input order.
pub fn project<R: Projectable + Clone>(
    records: &[R],
    filter: &FilterSpec<R::Key>,
    sort: SortState<R::Key>,
) -> Vec<R> {
    let mut rows: Vec<R> = records
        .iter()
        .filter(|record| matches(*record, filter))
        .cloned()
        .collect();
    rows.sort_by(|a, b| {
        let ordering = a.sort_value(sort.key).compare(&b.sort_value(sort.key));
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomerLinks, Link, Training, TrainingLinks};

    fn customer(first: &str, last: &str, city: Option<&str>) -> Customer {
        Customer {
            firstname: Some(first.to_string()),
            lastname: Some(last.to_string()),
            email: Some(format!("{}@example.com", first.to_lowercase())),
            phone: None,
            streetaddress: None,
            postcode: None,
            city: city.map(str::to_string),
            links: CustomerLinks {
                self_link: Link {
                    href: format!("http://api/customers/{last}"),
                },
            },
        }
    }

    fn training(activity: &str, duration: Option<i64>, date: &str, who: Option<Customer>) -> JoinedTraining {
        JoinedTraining {
            training: Training {
                date: Some(DateTime::parse_from_rfc3339(date).unwrap()),
                activity: Some(activity.to_string()),
                duration,
                links: TrainingLinks {
                    self_link: Link {
                        href: format!("http://api/trainings/{activity}"),
                    },
                    customer: None,
                },
            },
            customer: who,
        }
    }

    fn lastnames(rows: &[Customer]) -> Vec<String> {
        rows.iter()
            .map(|row| row.field(CustomerField::Lastname).to_string())
            .collect()
    }

    #[test]
    fn sorting_by_lastname_ascending() {
        let rows = vec![customer("Ann", "Lee", None), customer("Bo", "Katz", None)];
        let sorted = project(
            &rows,
            &FilterSpec::None,
            SortState::new(CustomerField::Lastname, SortDirection::Asc),
        );
        assert_eq!(lastnames(&sorted), vec!["Katz", "Lee"]);
    }

    #[test]
    fn sorting_is_idempotent_and_toggle_reverses() {
        let rows = vec![
            customer("Cy", "moore", None),
            customer("Ann", "Lee", None),
            customer("Bo", "Katz", None),
        ];
        let asc = SortState::new(CustomerField::Lastname, SortDirection::Asc);
        let once = project(&rows, &FilterSpec::None, asc);
        let twice = project(&once, &FilterSpec::None, asc);
        assert_eq!(once, twice);
        assert_eq!(lastnames(&once), vec!["Katz", "Lee", "moore"]);

        let desc = asc.toggle(CustomerField::Lastname);
        assert_eq!(desc.direction, SortDirection::Desc);
        let reversed = project(&rows, &FilterSpec::None, desc);
        let mut expected = once.clone();
        expected.reverse();
        assert_eq!(reversed, expected);
    }

    #[test]
    fn toggling_new_key_resets_to_ascending() {
        let state = SortState::new(CustomerField::Lastname, SortDirection::Desc);
        let next = state.toggle(CustomerField::City);
        assert_eq!(next, SortState::new(CustomerField::City, SortDirection::Asc));
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let rows = vec![
            customer("Ann", "Lee", Some("Oulu")),
            customer("Bo", "Katz", Some("oulu")),
            customer("Cy", "Aho", Some("Espoo")),
        ];
        let sorted = project(
            &rows,
            &FilterSpec::None,
            SortState::new(CustomerField::City, SortDirection::Asc),
        );
        assert_eq!(lastnames(&sorted), vec!["Aho", "Lee", "Katz"]);
    }

    #[test]
    fn global_filter_matches_any_field_case_insensitively() {
        let rows = vec![
            customer("Ann", "Lee", Some("Helsinki")),
            customer("Bo", "Katz", Some("Tampere")),
        ];
        let sort = SortState::new(CustomerField::Lastname, SortDirection::Asc);
        let hits = project(&rows, &FilterSpec::global("HELS"), sort);
        assert_eq!(lastnames(&hits), vec!["Lee"]);

        let by_email = project(&rows, &FilterSpec::global("bo@"), sort);
        assert_eq!(lastnames(&by_email), vec!["Katz"]);

        let all = project(&rows, &FilterSpec::global(""), sort);
        assert_eq!(all.len(), rows.len());
    }

    #[test]
    fn per_field_filter_requires_every_field() {
        let rows = vec![
            customer("Ann", "Lee", Some("Helsinki")),
            customer("Anna", "Katz", Some("Tampere")),
        ];
        let sort = SortState::new(CustomerField::Lastname, SortDirection::Asc);
        let filter = FilterSpec::per_field([
            (CustomerField::Firstname, "ann".to_string()),
            (CustomerField::City, "tamp".to_string()),
        ]);
        assert_eq!(lastnames(&project(&rows, &filter, sort)), vec!["Katz"]);

        let missing_city = FilterSpec::per_field([(CustomerField::Phone, "040".to_string())]);
        assert!(project(&rows, &missing_city, sort).is_empty());

        let blank = FilterSpec::per_field([(CustomerField::City, String::new())]);
        assert_eq!(blank, FilterSpec::None);
    }

    #[test]
    fn training_duration_sorts_numerically_with_zero_default() {
        let rows = vec![
            training("Gym", Some(100), "2024-01-03T10:00:00+00:00", None),
            training("Yoga", None, "2024-01-01T10:00:00+00:00", None),
            training("Run", Some(9), "2024-01-02T10:00:00+00:00", None),
        ];
        let sorted = project(
            &rows,
            &FilterSpec::None,
            SortState::new(TrainingField::Duration, SortDirection::Asc),
        );
        let order: Vec<_> = sorted
            .iter()
            .map(|row| row.training.activity.clone().unwrap())
            .collect();
        assert_eq!(order, vec!["Yoga", "Run", "Gym"]);
    }

    #[test]
    fn training_date_sorts_by_timestamp() {
        let rows = vec![
            training("Late", Some(10), "2024-02-01T08:00:00+02:00", None),
            training("Early", Some(10), "2024-01-15T23:00:00+00:00", None),
        ];
        let sorted = project(
            &rows,
            &FilterSpec::None,
            SortState::new(TrainingField::Date, SortDirection::Desc),
        );
        assert_eq!(sorted[0].training.activity.as_deref(), Some("Late"));
    }

    #[test]
    fn training_filter_searches_customer_name() {
        let rows = vec![
            training("Gym", Some(30), "2024-01-03T10:00:00+00:00", Some(customer("Ann", "Lee", None))),
            training("Boxing", Some(77), "2024-01-04T10:00:00+00:00", None),
        ];
        let sort = SortState::new(TrainingField::Date, SortDirection::Asc);
        let hits = project(&rows, &FilterSpec::global("ann lee"), sort);
        assert_eq!(hits.len(), 1);
        let unassigned = project(&rows, &FilterSpec::global("n/a"), sort);
        assert_eq!(unassigned[0].training.activity.as_deref(), Some("Boxing"));
        let by_duration = project(&rows, &FilterSpec::global("77"), sort);
        assert_eq!(by_duration.len(), 1);
    }
}
