use crate::errors::ApiError;
use crate::models::{Customer, CustomerForm, JoinedTraining, TrainingForm};
use crate::remote::ApiClient;
use crate::state::ViewState;
use crate::view::Projectable;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Identifies one load. Only the most recent ticket may publish its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Failed,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Failed,
    Cancelled,
}

/// Owns one view's state and drives fetches and mutations against the API.
pub struct ViewController<R: Projectable> {
    api: ApiClient,
    state: Mutex<ViewState<R>>,
    generation: AtomicU64,
}

impl<R: Projectable + Clone> ViewController<R> {
    pub fn new(api: ApiClient, initial: ViewState<R>) -> Self {
        Self {
            api,
            state: Mutex::new(initial),
            generation: AtomicU64::new(0),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn snapshot(&self) -> ViewState<R> {
        self.state.lock().await.clone()
    }

    /// Returns the state for rendering and clears the status message so it
    /// shows once.
    pub async fn take_for_render(&self) -> ViewState<R> {
        let mut guard = self.state.lock().await;
        let current = guard.clone();
        *guard = current.clone().dismiss_status();
        current
    }

    pub async fn update(&self, transition: impl FnOnce(ViewState<R>) -> ViewState<R>) {
        let mut guard = self.state.lock().await;
        *guard = transition(guard.clone());
    }

    pub async fn needs_initial_load(&self) -> bool {
        let guard = self.state.lock().await;
        guard.loading && guard.records.is_empty()
    }

    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Invalidates any load in flight; its result will be discarded.
    pub fn abort(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    pub async fn finish_load(
        &self,
        ticket: LoadTicket,
        result: Result<Vec<R>, ApiError>,
    ) -> LoadOutcome {
        let mut guard = self.state.lock().await;
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, "discarding stale load result");
            return LoadOutcome::Stale;
        }
        match result {
            Ok(records) => {
                let count = records.len();
                *guard = guard.clone().data_loaded(records);
                LoadOutcome::Loaded(count)
            }
            Err(err) => {
                error!("failed to load records: {err}");
                *guard = guard.clone().load_failed();
                LoadOutcome::Failed
            }
        }
    }

    pub async fn load<F>(&self, fetch: F) -> LoadOutcome
    where
        F: Future<Output = Result<Vec<R>, ApiError>>,
    {
        let ticket = self.begin_load();
        let result = fetch.await;
        self.finish_load(ticket, result).await
    }

    /// Runs a write against the API and records the outcome as a status
    /// message. The caller refetches on `Applied`.
    pub async fn mutate<F>(&self, request: F, success: &str, failure: &str) -> MutationOutcome
    where
        F: Future<Output = Result<(), ApiError>>,
    {
        match request.await {
            Ok(()) => {
                info!("{success}");
                self.update(|state| state.mutation_succeeded(success)).await;
                MutationOutcome::Applied
            }
            Err(err) => {
                error!("{failure}: {err}");
                self.update(|state| state.mutation_failed(failure)).await;
                MutationOutcome::Failed
            }
        }
    }
}

impl ViewController<Customer> {
    pub async fn refresh(&self) -> LoadOutcome {
        let api = self.api.clone();
        self.load(async move { api.fetch_customers().await }).await
    }

    pub async fn ensure_loaded(&self) {
        if self.needs_initial_load().await {
            self.refresh().await;
        }
    }

    pub async fn create(&self, form: &CustomerForm) -> MutationOutcome {
        let outcome = self
            .mutate(
                self.api.create_customer(form),
                "Customer added",
                "Failed to add customer",
            )
            .await;
        self.refetch_after(outcome).await
    }

    pub async fn update_customer(&self, href: &str, form: &CustomerForm) -> MutationOutcome {
        let outcome = self
            .mutate(
                self.api.update_customer(href, form),
                "Customer updated",
                "Failed to update customer",
            )
            .await;
        self.refetch_after(outcome).await
    }

    pub async fn delete(&self, href: &str, confirmed: bool) -> MutationOutcome {
        if !confirmed {
            debug!(%href, "customer delete not confirmed");
            return MutationOutcome::Cancelled;
        }
        let outcome = self
            .mutate(
                self.api.delete(href),
                "Customer deleted",
                "Failed to delete customer",
            )
            .await;
        self.refetch_after(outcome).await
    }

    async fn refetch_after(&self, outcome: MutationOutcome) -> MutationOutcome {
        if outcome == MutationOutcome::Applied {
            self.refresh().await;
        }
        outcome
    }
}

impl ViewController<JoinedTraining> {
    pub async fn refresh(&self) -> LoadOutcome {
        let api = self.api.clone();
        self.load(async move { api.fetch_joined_trainings().await })
            .await
    }

    pub async fn ensure_loaded(&self) {
        if self.needs_initial_load().await {
            self.refresh().await;
        }
    }

    pub async fn create(&self, form: &TrainingForm) -> MutationOutcome {
        let outcome = self
            .mutate(
                self.api.create_training(form),
                "Training added",
                "Failed to add training",
            )
            .await;
        self.refetch_after(outcome).await
    }

    pub async fn delete(&self, href: &str, confirmed: bool) -> MutationOutcome {
        if !confirmed {
            debug!(%href, "training delete not confirmed");
            return MutationOutcome::Cancelled;
        }
        let outcome = self
            .mutate(
                self.api.delete(href),
                "Training deleted",
                "Failed to delete training",
            )
            .await;
        self.refetch_after(outcome).await
    }

    async fn refetch_after(&self, outcome: MutationOutcome) -> MutationOutcome {
        if outcome == MutationOutcome::Applied {
            self.refresh().await;
        }
        outcome
    }
}
