use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/customers", get(handlers::customers_page).post(handlers::create_customer))
        .route("/customers/sort/:key", get(handlers::customers_sort))
        .route("/customers/refresh", get(handlers::customers_refresh))
        .route("/customers/edit", post(handlers::edit_customer))
        .route("/customers/delete", post(handlers::delete_customer))
        .route("/customers/export.csv", get(handlers::export_customers))
        .route("/trainings", get(handlers::trainings_page).post(handlers::create_training))
        .route("/trainings/sort/:key", get(handlers::trainings_sort))
        .route("/trainings/refresh", get(handlers::trainings_refresh))
        .route("/trainings/delete", post(handlers::delete_training))
        .route("/calendar", get(handlers::calendar_page))
        .route("/statistics", get(handlers::statistics_page))
        .route("/api/customers", get(handlers::customers_json))
        .route("/api/trainings", get(handlers::trainings_json))
        .route("/api/stats", get(handlers::stats_json))
        .route("/api/calendar", get(handlers::calendar_json))
        .with_state(state)
}
