use crate::controller::ViewController;
use crate::models::{Customer, CustomerField, JoinedTraining, StatusMessage, TrainingField};
use crate::remote::ApiClient;
use crate::view::{project, FilterSpec, Projectable, SortDirection, SortState};
use std::sync::Arc;

/// Per-view state. Every change goes through one of the transitions below,
/// each of which returns a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<R: Projectable> {
    pub records: Vec<R>,
    pub filter: FilterSpec<R::Key>,
    pub sort: SortState<R::Key>,
    pub loading: bool,
    pub status: Option<StatusMessage>,
}

impl<R: Projectable + Clone> ViewState<R> {
    pub fn new(sort: SortState<R::Key>) -> Self {
        Self {
            records: Vec::new(),
            filter: FilterSpec::None,
            sort,
            loading: true,
            status: None,
        }
    }

    pub fn set_filter(self, filter: FilterSpec<R::Key>) -> Self {
        Self { filter, ..self }
    }

    pub fn set_sort(self, key: R::Key) -> Self {
        let sort = self.sort.toggle(key);
        Self { sort, ..self }
    }

    pub fn data_loaded(self, records: Vec<R>) -> Self {
        Self {
            records,
            loading: false,
            ..self
        }
    }

    /// Loading ends; the previous list, if any, stays canonical.
    pub fn load_failed(self) -> Self {
        Self {
            loading: false,
            ..self
        }
    }

    pub fn mutation_succeeded(self, message: impl Into<String>) -> Self {
        Self {
            status: Some(StatusMessage::success(message)),
            ..self
        }
    }

    pub fn mutation_failed(self, message: impl Into<String>) -> Self {
        Self {
            status: Some(StatusMessage::error(message)),
            ..self
        }
    }

    pub fn dismiss_status(self) -> Self {
        Self {
            status: None,
            ..self
        }
    }

    /// The displayed rows: filter then sort of the canonical list.
    pub fn rows(&self) -> Vec<R> {
        project(&self.records, &self.filter, self.sort)
    }
}

pub type CustomerView = ViewState<Customer>;
pub type TrainingView = ViewState<JoinedTraining>;

pub fn default_customer_sort() -> SortState<CustomerField> {
    SortState::new(CustomerField::Lastname, SortDirection::Asc)
}

pub fn default_training_sort() -> SortState<TrainingField> {
    SortState::new(TrainingField::Date, SortDirection::Desc)
}

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub customers: Arc<ViewController<Customer>>,
    pub trainings: Arc<ViewController<JoinedTraining>>,
}

impl AppState {
    pub fn new(api: ApiClient) -> Self {
        Self {
            customers: Arc::new(ViewController::new(
                api.clone(),
                CustomerView::new(default_customer_sort()),
            )),
            trainings: Arc::new(ViewController::new(
                api.clone(),
                TrainingView::new(default_training_sort()),
            )),
            api,
        }
    }

    /// Opening the customer view drops any training load still in flight.
    pub fn enter_customers(&self) {
        self.trainings.abort();
    }

    pub fn enter_trainings(&self) {
        self.customers.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomerLinks, Link, Severity};

    fn customer(last: &str) -> Customer {
        Customer {
            firstname: Some("X".to_string()),
            lastname: Some(last.to_string()),
            email: None,
            phone: None,
            streetaddress: None,
            postcode: None,
            city: None,
            links: CustomerLinks {
                self_link: Link {
                    href: format!("http://api/customers/{last}"),
                },
            },
        }
    }

    #[test]
    fn rows_follow_filter_and_sort_transitions() {
        let state = CustomerView::new(default_customer_sort())
            .data_loaded(vec![customer("Lee"), customer("Katz"), customer("Aho")]);
        assert!(!state.loading);

        let names = |state: &CustomerView| -> Vec<String> {
            state
                .rows()
                .iter()
                .map(|row| row.field(CustomerField::Lastname).to_string())
                .collect()
        };
        assert_eq!(names(&state), vec!["Aho", "Katz", "Lee"]);

        let state = state.set_sort(CustomerField::Lastname);
        assert_eq!(names(&state), vec!["Lee", "Katz", "Aho"]);

        let state = state.set_filter(FilterSpec::global("k"));
        assert_eq!(names(&state), vec!["Katz"]);
        assert_eq!(state.records.len(), 3);
    }

    #[test]
    fn load_failure_keeps_previous_list() {
        let state = CustomerView::new(default_customer_sort())
            .data_loaded(vec![customer("Lee")])
            .load_failed();
        assert_eq!(state.records.len(), 1);

        let empty = CustomerView::new(default_customer_sort()).load_failed();
        assert!(empty.records.is_empty());
        assert!(!empty.loading);
    }

    #[test]
    fn status_messages_replace_and_dismiss() {
        let state = CustomerView::new(default_customer_sort()).mutation_failed("boom");
        assert_eq!(state.status.as_ref().map(|s| s.severity), Some(Severity::Error));
        let state = state.mutation_succeeded("ok");
        assert_eq!(state.status, Some(StatusMessage::success("ok")));
        assert_eq!(state.dismiss_status().status, None);
    }
}
