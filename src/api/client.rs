use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::auth::CredentialProvider;
use super::constants::{self, headers};
use super::errors::ApiError;
use super::models::{CommitRequest, CommitResult, PreparedImport};
use crate::import::{ImportApi, SelectedFile};

/// Contacts REST API client with connection pooling
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http_client: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    /// Build a client with the default 30 second request timeout
    pub fn new(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, credentials, constants::DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(timeout)
            .connect_timeout(constants::CONNECT_TIMEOUT)
            .user_agent(constants::USER_AGENT)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_custom_client(base_url, credentials, http_client))
    }

    /// Create a client around an already configured HTTP client
    pub fn with_custom_client(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request with auth and correlation headers attached
    pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let request_id = uuid::Uuid::new_v4().to_string();
        debug!("{} {} [{}]", method, url, request_id);

        let mut builder = self
            .http_client
            .request(method, url)
            .header(headers::REQUEST_ID, request_id);

        if let Some(token) = self.credentials.bearer_token() {
            builder = builder.bearer_auth(token);
        }

        builder
    }

    /// Send a request and turn non-success statuses into [`ApiError`]
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| {
            warn!("Request failed before a response arrived: {}", e);
            ApiError::from(e)
        })?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_status(status.as_u16(), &body);
        warn!("Request failed: {}", error);
        Err(error)
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ImportApi for ApiClient {
    async fn prepare_import(&self, file: &SelectedFile) -> Result<PreparedImport, ApiError> {
        info!("Preparing import of {} ({} bytes)", file.name(), file.size());

        let bytes = file
            .read_bytes()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read {}: {}", file.name(), e)))?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file.name().to_string())
            .mime_str(headers::CONTENT_TYPE_CSV)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part(constants::IMPORT_FILE_FIELD, part);

        let url = constants::import_prepare_endpoint(&self.base_url);
        let prepared: PreparedImport = self
            .send_json(self.request(Method::POST, &url).multipart(form))
            .await?;

        info!(
            "Import {} prepared: {} rows, {} headers",
            prepared.import_id,
            prepared.total_rows,
            prepared.headers.len()
        );
        Ok(prepared)
    }

    async fn commit_import(&self, request: &CommitRequest) -> Result<CommitResult, ApiError> {
        info!(
            "Committing import {} with {} mapped columns",
            request.import_id,
            request.mapping.len()
        );

        let url = constants::import_commit_endpoint(&self.base_url);
        let result: CommitResult = self
            .send_json(self.request(Method::POST, &url).json(request))
            .await?;

        info!(
            "Import {} committed: {} inserted, {} updated, {} skipped",
            request.import_id, result.inserted_count, result.updated_count, result.skipped_count
        );
        Ok(result)
    }
}
