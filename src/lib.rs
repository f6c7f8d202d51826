pub mod app;
pub mod calendar;
pub mod config;
pub mod controller;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod remote;
pub mod stats;
pub mod state;
pub mod ui;
pub mod view;

pub use app::router;
pub use config::Config;
pub use remote::ApiClient;
pub use state::AppState;
