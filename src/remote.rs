use crate::config::Config;
use crate::errors::ApiError;
use crate::models::{
    Customer, CustomerForm, CustomersResponse, JoinedTraining, Training, TrainingForm,
    TrainingsResponse,
};
use futures::future::try_join_all;
use reqwest::{Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

/// Client for the remote trainer REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    customers_url: String,
    trainings_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: &Config) -> Self {
        Self {
            http,
            customers_url: config.customers_url(),
            trainings_url: config.trainings_url(),
        }
    }

    pub async fn fetch_customers(&self) -> Result<Vec<Customer>, ApiError> {
        let body: CustomersResponse = self.get_json(&self.customers_url).await?;
        Ok(body.embedded.customers)
    }

    pub async fn fetch_trainings(&self) -> Result<Vec<Training>, ApiError> {
        let body: TrainingsResponse = self.get_json(&self.trainings_url).await?;
        Ok(body.embedded.trainings)
    }

    pub async fn fetch_customer(&self, href: &str) -> Result<Customer, ApiError> {
        self.get_json(href).await
    }

    /// Fetches all trainings and resolves each linked customer.
    ///
    /// Customer lookups run concurrently and the result keeps the order of
    /// the trainings collection. A single failed lookup fails the batch.
    pub async fn fetch_joined_trainings(&self) -> Result<Vec<JoinedTraining>, ApiError> {
        let trainings = self.fetch_trainings().await?;
        let lookups = trainings.into_iter().map(|training| async move {
            let customer = match training.customer_href() {
                Some(href) => Some(self.fetch_customer(href).await?),
                None => None,
            };
            Ok::<_, ApiError>(JoinedTraining { training, customer })
        });
        try_join_all(lookups).await
    }

    pub async fn create_customer(&self, form: &CustomerForm) -> Result<(), ApiError> {
        self.send_json(Method::POST, &self.customers_url, form).await
    }

    pub async fn update_customer(&self, href: &str, form: &CustomerForm) -> Result<(), ApiError> {
        self.send_json(Method::PUT, href, form).await
    }

    pub async fn create_training(&self, form: &TrainingForm) -> Result<(), ApiError> {
        self.send_json(Method::POST, &self.trainings_url, form).await
    }

    pub async fn delete(&self, href: &str) -> Result<(), ApiError> {
        debug!(%href, "DELETE");
        let response = self
            .http
            .delete(href)
            .send()
            .await
            .map_err(|source| transport(href, source))?;
        ensure_success(href, response)?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| transport(url, source))?;
        let response = ensure_success(url, response)?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| transport(url, source))?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn send_json<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        debug!(%method, %url, "sending");
        let response = self
            .http
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(|source| transport(url, source))?;
        ensure_success(url, response)?;
        Ok(())
    }
}

fn transport(url: &str, source: reqwest::Error) -> ApiError {
    ApiError::Transport {
        url: url.to_string(),
        source,
    }
}

fn ensure_success(url: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            url: url.to_string(),
            status,
        })
    }
}
