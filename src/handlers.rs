use crate::calendar::{events_in_range, navigate, to_events, visible_range, CalendarView};
use crate::errors::AppError;
use crate::export::{customers_to_csv, CSV_FILE_NAME};
use crate::models::{
    ActivityStats, CalendarEvent, Customer, CustomerField, CustomerForm, JoinedTraining,
    TrainingField, TrainingForm,
};
use crate::state::AppState;
use crate::stats::build_activity_stats;
use crate::ui::{render_calendar, render_customers, render_home, render_statistics, render_trainings};
use crate::view::{FilterSpec, SortState};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    Form, Json,
};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

#[derive(Debug, Default, Deserialize)]
pub struct CustomerQuery {
    pub q: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub streetaddress: Option<String>,
    pub postcode: Option<String>,
    pub city: Option<String>,
}

impl CustomerQuery {
    fn field(&self, field: CustomerField) -> Option<&String> {
        match field {
            CustomerField::Firstname => self.firstname.as_ref(),
            CustomerField::Lastname => self.lastname.as_ref(),
            CustomerField::Email => self.email.as_ref(),
            CustomerField::Phone => self.phone.as_ref(),
            CustomerField::Streetaddress => self.streetaddress.as_ref(),
            CustomerField::Postcode => self.postcode.as_ref(),
            CustomerField::City => self.city.as_ref(),
        }
    }

    /// `None` when the request carries no filter parameters at all, so the
    /// current filter stays in place.
    pub fn to_filter(&self) -> Option<FilterSpec<CustomerField>> {
        let per_field: Vec<(CustomerField, String)> = CustomerField::ALL
            .into_iter()
            .filter_map(|field| self.field(field).map(|value| (field, value.clone())))
            .collect();
        if per_field.iter().any(|(_, value)| !value.is_empty()) {
            return Some(FilterSpec::per_field(per_field));
        }
        match &self.q {
            Some(query) => Some(FilterSpec::global(query.as_str())),
            None if !per_field.is_empty() => Some(FilterSpec::None),
            None => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TrainingQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerEditRequest {
    pub href: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub streetaddress: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub city: String,
}

impl CustomerEditRequest {
    fn into_parts(self) -> (String, CustomerForm) {
        let form = CustomerForm {
            firstname: self.firstname,
            lastname: self.lastname,
            email: self.email,
            phone: self.phone,
            streetaddress: self.streetaddress,
            postcode: self.postcode,
            city: self.city,
        };
        (self.href, form)
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub href: String,
    #[serde(default)]
    pub confirmed: Option<String>,
}

impl DeleteRequest {
    fn is_confirmed(&self) -> bool {
        matches!(self.confirmed.as_deref(), Some("true") | Some("yes") | Some("on"))
    }
}

#[derive(Debug, Deserialize)]
pub struct TrainingRequest {
    pub date: String,
    pub activity: String,
    pub duration: String,
    pub customer: String,
}

impl TrainingRequest {
    pub fn into_form(self) -> Result<TrainingForm, String> {
        let date = parse_form_date(&self.date)
            .ok_or_else(|| format!("invalid date '{}'", self.date))?;
        let duration = self
            .duration
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("invalid duration '{}'", self.duration))?;
        Ok(TrainingForm {
            date,
            activity: self.activity,
            duration,
            customer: self.customer,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub view: Option<CalendarView>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ViewPayload<R, K> {
    pub rows: Vec<R>,
    pub sort: SortState<K>,
    pub loading: bool,
}

#[derive(Debug, Serialize)]
pub struct CalendarPayload {
    pub view: CalendarView,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub events: Vec<CalendarEvent>,
}

pub async fn index() -> Html<String> {
    Html(render_home())
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn customers_page(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> Html<String> {
    state.enter_customers();
    apply_customer_query(&state, &query).await;
    let view = state.customers.take_for_render().await;
    Html(render_customers(&view))
}

pub async fn customers_json(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> Json<ViewPayload<Customer, CustomerField>> {
    apply_customer_query(&state, &query).await;
    let view = state.customers.snapshot().await;
    Json(ViewPayload {
        rows: view.rows(),
        sort: view.sort,
        loading: view.loading,
    })
}

pub async fn customers_sort(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Redirect, AppError> {
    let field = CustomerField::parse(&key)
        .ok_or_else(|| AppError::not_found(format!("unknown customer column '{key}'")))?;
    state.customers.update(|view| view.set_sort(field)).await;
    Ok(Redirect::to("/customers"))
}

pub async fn customers_refresh(State(state): State<AppState>) -> Redirect {
    state.enter_customers();
    state.customers.refresh().await;
    Redirect::to("/customers")
}

pub async fn create_customer(
    State(state): State<AppState>,
    Form(form): Form<CustomerForm>,
) -> Redirect {
    state.customers.create(&form).await;
    Redirect::to("/customers")
}

pub async fn edit_customer(
    State(state): State<AppState>,
    Form(request): Form<CustomerEditRequest>,
) -> Redirect {
    let (href, form) = request.into_parts();
    state.customers.update_customer(&href, &form).await;
    Redirect::to("/customers")
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Form(request): Form<DeleteRequest>,
) -> Redirect {
    state
        .customers
        .delete(&request.href, request.is_confirmed())
        .await;
    Redirect::to("/customers")
}

pub async fn export_customers(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.customers.ensure_loaded().await;
    let view = state.customers.snapshot().await;
    let csv = customers_to_csv(&view.records)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        csv,
    ))
}

pub async fn trainings_page(
    State(state): State<AppState>,
    Query(query): Query<TrainingQuery>,
) -> Html<String> {
    state.enter_trainings();
    apply_training_query(&state, &query).await;
    state.customers.ensure_loaded().await;
    let customers = state.customers.snapshot().await.records;
    let view = state.trainings.take_for_render().await;
    Html(render_trainings(&view, &customers))
}

pub async fn trainings_json(
    State(state): State<AppState>,
    Query(query): Query<TrainingQuery>,
) -> Json<ViewPayload<JoinedTraining, TrainingField>> {
    apply_training_query(&state, &query).await;
    let view = state.trainings.snapshot().await;
    Json(ViewPayload {
        rows: view.rows(),
        sort: view.sort,
        loading: view.loading,
    })
}

pub async fn trainings_sort(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Redirect, AppError> {
    let field = TrainingField::parse(&key)
        .ok_or_else(|| AppError::not_found(format!("unknown training column '{key}'")))?;
    state.trainings.update(|view| view.set_sort(field)).await;
    Ok(Redirect::to("/trainings"))
}

pub async fn trainings_refresh(State(state): State<AppState>) -> Redirect {
    state.enter_trainings();
    state.trainings.refresh().await;
    Redirect::to("/trainings")
}

pub async fn create_training(
    State(state): State<AppState>,
    Form(request): Form<TrainingRequest>,
) -> Redirect {
    match request.into_form() {
        Ok(form) => {
            state.trainings.create(&form).await;
        }
        Err(reason) => {
            warn!("rejected training form: {reason}");
            state
                .trainings
                .update(|view| view.mutation_failed(format!("Failed to add training: {reason}")))
                .await;
        }
    }
    Redirect::to("/trainings")
}

pub async fn delete_training(
    State(state): State<AppState>,
    Form(request): Form<DeleteRequest>,
) -> Redirect {
    state
        .trainings
        .delete(&request.href, request.is_confirmed())
        .await;
    Redirect::to("/trainings")
}

pub async fn calendar_page(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Html<String> {
    let view = query.view.unwrap_or_default();
    let anchor = query.date.unwrap_or_else(|| Local::now().date_naive());
    let payload = build_calendar(&state, view, anchor).await;
    Html(render_calendar(
        view,
        anchor,
        navigate(view, anchor, -1),
        navigate(view, anchor, 1),
        visible_range(view, anchor),
        &payload.events,
    ))
}

pub async fn calendar_json(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Json<CalendarPayload> {
    let view = query.view.unwrap_or_default();
    let anchor = query.date.unwrap_or_else(|| Local::now().date_naive());
    Json(build_calendar(&state, view, anchor).await)
}

pub async fn statistics_page(State(state): State<AppState>) -> Html<String> {
    let stats = match load_stats(&state).await {
        Ok(stats) => stats,
        Err(err) => {
            error!("failed to load training statistics: {err}");
            Vec::new()
        }
    };
    Html(render_statistics(&stats))
}

pub async fn stats_json(State(state): State<AppState>) -> Result<Json<Vec<ActivityStats>>, AppError> {
    let stats = load_stats(&state).await.map_err(AppError::upstream)?;
    Ok(Json(stats))
}

async fn load_stats(state: &AppState) -> Result<Vec<ActivityStats>, crate::errors::ApiError> {
    let trainings = state.api.fetch_trainings().await?;
    Ok(build_activity_stats(&trainings))
}

async fn build_calendar(state: &AppState, view: CalendarView, anchor: NaiveDate) -> CalendarPayload {
    let range = visible_range(view, anchor);
    let trainings = match state.api.fetch_joined_trainings().await {
        Ok(trainings) => trainings,
        Err(err) => {
            error!("failed to load trainings for calendar: {err}");
            Vec::new()
        }
    };
    let events = events_in_range(&to_events(&trainings), range);
    CalendarPayload {
        view,
        start: range.start,
        end: range.end,
        events,
    }
}

async fn apply_customer_query(state: &AppState, query: &CustomerQuery) {
    state.customers.ensure_loaded().await;
    if let Some(filter) = query.to_filter() {
        state.customers.update(|view| view.set_filter(filter)).await;
    }
}

async fn apply_training_query(state: &AppState, query: &TrainingQuery) {
    state.trainings.ensure_loaded().await;
    if let Some(q) = &query.q {
        let filter = FilterSpec::global(q.as_str());
        state.trainings.update(|view| view.set_filter(filter)).await;
    }
}

/// Accepts RFC 3339 or the `datetime-local` input format in local time.
fn parse_form_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date);
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()?;
    naive
        .and_local_timezone(Local)
        .earliest()
        .map(|date| date.fixed_offset())
}
