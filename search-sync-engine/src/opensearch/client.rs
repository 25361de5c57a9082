//! OpenSearch transport adapter.
//!
//! The only component that performs network I/O. Owns connection setup
//! (URL, credentials, CA bundle, request timeout); everything above it is
//! transport-agnostic.

use std::time::Duration;

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    cert::{Certificate, CertificateValidation},
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts},
    BulkParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::interfaces::SearchClient;
use crate::sync::BulkOperation;

/// OpenSearch-backed `SearchClient`.
pub struct OpenSearchAdapter {
    client: OpenSearch,
}

impl OpenSearchAdapter {
    /// Build an adapter from connection configuration.
    ///
    /// The API key takes precedence over basic-auth credentials when both
    /// are set. Fails on an unparsable URL, an unreadable CA bundle, or a
    /// malformed API key.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let url = Url::parse(&config.url)
            .map_err(|e| EngineError::config(format!("Invalid engine URL: {}", e)))?;

        let conn_pool = SingleNodeConnectionPool::new(url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.auth(Credentials::Basic(username.clone(), password.clone()));
        }

        if let Some(api_key) = &config.api_key {
            let (id, secret) = api_key.split_once(':').ok_or_else(|| {
                EngineError::config("API key must be in id:secret form")
            })?;
            builder = builder.auth(Credentials::ApiKey(id.to_string(), secret.to_string()));
        }

        if let Some(path) = &config.ca_cert_path {
            let pem = std::fs::read(path).map_err(|e| {
                EngineError::config(format!("Cannot read CA bundle {}: {}", path, e))
            })?;
            let cert = Certificate::from_pem(&pem)?;
            builder = builder.cert_validation(CertificateValidation::Full(cert));
        }

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let transport = builder
            .build()
            .map_err(|e| EngineError::config(e.to_string()))?;

        info!(
            url = %config.url,
            soft_delete = config.soft_delete,
            "Created OpenSearch adapter"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }
}

#[async_trait]
impl SearchClient for OpenSearchAdapter {
    async fn bulk(&self, operations: &[BulkOperation]) -> Result<(), EngineError> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(operations.len() * 2);
        for operation in operations {
            for line in operation.to_body_lines() {
                body.push(line.into());
            }
        }

        let response = self.client.bulk(BulkParts::None).body(body).send().await?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(EngineError::response(status.as_u16(), error_body));
        }

        debug!(operations = operations.len(), "Bulk request transmitted");
        Ok(())
    }

    async fn search(&self, index: &str, body: Value) -> Result<Value, EngineError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(EngineError::response(status.as_u16(), error_body));
        }

        let raw = response.json::<Value>().await?;
        debug!(index = %index, "Search request completed");
        Ok(raw)
    }

    async fn create_index(&self, name: &str, body: Option<Value>) -> Result<(), EngineError> {
        let indices = self.client.indices();
        let request = indices.create(IndicesCreateParts::Index(name));
        let response = match body {
            Some(schema) => request.body(schema).send().await?,
            None => request.send().await?,
        };

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, index = %name, "Index creation failed");
            return Err(EngineError::response(status.as_u16(), error_body));
        }

        debug!(index = %name, "Index created");
        Ok(())
    }

    async fn delete_index(&self, name: &str) -> Result<(), EngineError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[name]))
            .send()
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, index = %name, "Index deletion failed");
            return Err(EngineError::response(status.as_u16(), error_body));
        }

        debug!(index = %name, "Index deleted");
        Ok(())
    }
}
