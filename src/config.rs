use std::{env, net::SocketAddr};

pub const DEFAULT_API_URL: &str =
    "https://customer-rest-service-frontend-personaltrainer.2.rahtiapp.fi/api";
pub const DEFAULT_PORT: u16 = 8080;

// Settings sourced from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let api_url = env::var("TRAINER_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(port, api_url)
    }

    pub fn new(port: u16, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim().trim_end_matches('/').to_string();
        Self { port, api_url }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn customers_url(&self) -> String {
        format!("{}/customers", self.api_url)
    }

    pub fn trainings_url(&self) -> String {
        format!("{}/trainings", self.api_url)
    }
}
