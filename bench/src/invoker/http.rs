use super::{Session, SessionFactory, Table, Transaction};
use crate::error::{HammerError, OperationError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const CONTROL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct InvokeRequest {
    transaction_id: Option<u64>,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    id: u64,
}

/// Store reachable over HTTP, one operation per endpoint.
#[derive(Debug, Clone)]
pub struct HttpSessionFactory {
    base_url: Url,
}

impl HttpSessionFactory {
    pub fn new(server_url: &str) -> Result<Self, HammerError> {
        let mut base_url =
            Url::parse(server_url).map_err(|e| HammerError::InvalidServerUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(HammerError::InvalidServerUrl(server_url.to_owned()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url })
    }
}

#[async_trait]
impl SessionFactory for HttpSessionFactory {
    async fn create_session(&self) -> Result<Box<dyn Session>, HammerError> {
        // A client per session keeps connection pools from being shared between workers.
        let client = Client::builder()
            .pool_max_idle_per_host(1)
            .build()
            .map_err(|e| HammerError::CannotOpenSession(e.to_string()))?;
        Ok(Box::new(HttpSession {
            client,
            base_url: self.base_url.clone(),
        }))
    }

    fn describe(&self) -> String {
        format!("HTTP store at {}", self.base_url)
    }
}

pub struct HttpSession {
    client: Client,
    base_url: Url,
}

impl HttpSession {
    fn url(&self, path: &str) -> Result<Url, OperationError> {
        self.base_url
            .join(path)
            .map_err(|e| OperationError::Other(format!("Invalid endpoint '{path}': {e}")))
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        timeout: Duration,
    ) -> Result<Response, OperationError> {
        let response = self
            .client
            .post(self.url(path)?)
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_transport_error)?;
        check_status(response).await
    }
}

#[async_trait]
impl Session for HttpSession {
    async fn invoke(
        &mut self,
        operation: &str,
        timeout: Duration,
        transaction: Option<&Transaction>,
    ) -> Result<(), OperationError> {
        let request = InvokeRequest {
            transaction_id: transaction.map(Transaction::id),
            timeout_secs: timeout.as_secs(),
        };
        self.post(&format!("operations/{operation}"), &request, timeout)
            .await?;
        Ok(())
    }

    async fn begin_transaction(&mut self) -> Result<Transaction, OperationError> {
        let response = self
            .post("transactions", &serde_json::json!({}), CONTROL_TIMEOUT)
            .await?;
        let body: TransactionResponse = response
            .json()
            .await
            .map_err(|e| OperationError::Other(format!("Invalid transaction response: {e}")))?;
        Ok(Transaction::new(body.id))
    }

    async fn commit(&mut self, transaction: Transaction) -> Result<(), OperationError> {
        self.post(
            &format!("transactions/{}/commit", transaction.id()),
            &serde_json::json!({}),
            CONTROL_TIMEOUT,
        )
        .await?;
        Ok(())
    }

    async fn rollback(&mut self, transaction: Transaction) -> Result<(), OperationError> {
        self.post(
            &format!("transactions/{}/rollback", transaction.id()),
            &serde_json::json!({}),
            CONTROL_TIMEOUT,
        )
        .await?;
        Ok(())
    }

    async fn force_recompile(&mut self, operation: &str) -> Result<(), OperationError> {
        self.post(
            &format!("operations/{operation}/recompile"),
            &serde_json::json!({}),
            CONTROL_TIMEOUT,
        )
        .await?;
        Ok(())
    }

    async fn fetch_table(
        &mut self,
        operation: &str,
        timeout: Duration,
    ) -> Result<Table, OperationError> {
        let response = self
            .client
            .get(self.url(&format!("operations/{operation}/table"))?)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_transport_error)?;
        check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| OperationError::Other(format!("Invalid table response: {e}")))
    }
}

fn classify_transport_error(error: reqwest::Error) -> OperationError {
    if error.is_timeout() {
        return OperationError::Timeout;
    }
    OperationError::Other(error.to_string())
}

async fn check_status(response: Response) -> Result<Response, OperationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!("Store responded with {status}: {body}");
    Err(classify_failure(status, &body))
}

fn classify_failure(status: StatusCode, body: &str) -> OperationError {
    if status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::GATEWAY_TIMEOUT
        || body.to_uppercase().contains("TIMEOUT")
    {
        return OperationError::Timeout;
    }
    OperationError::Other(format!("HTTP {}: {}", status.as_u16(), body.trim()))
}
