//! HTTP client for organizer service requests.
//!
//! This module provides a low-level HTTP client wrapper that builds request
//! URLs from the configured base URL, checks response status and decodes
//! JSON bodies.

use super::error::ApiError;
use log::*;
use reqwest::{Method, Response};
use serde::{de::DeserializeOwned, Serialize};

/// Makes requests to the service and tries to conform response data to the
/// requested type.
///
#[derive(Clone, Debug)]
pub struct Client {
    pub(crate) base_url: String,
    pub(crate) http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given base URL.
    ///
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ApiError::InvalidBaseUrl(base_url.to_owned()));
        }
        Ok(Client {
            base_url: trimmed.to_owned(),
            http_client: reqwest::Client::builder().build()?,
        })
    }

    /// Return the absolute URL for a path relative to the base URL.
    ///
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue a GET request and decode the response body.
    ///
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.call::<()>(Method::GET, path, params, None).await?;
        Self::decode(response).await
    }

    /// Issue a request with a JSON body and decode the response body.
    ///
    pub async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.call(method, path, &[], Some(body)).await?;
        Self::decode(response).await
    }

    /// Issue a DELETE request, ignoring any acknowledgement body.
    ///
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.call::<()>(Method::DELETE, path, &[], None).await?;
        Ok(())
    }

    /// Make request and return the response if its status is a success.
    ///
    async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let request_url = self.url(path);
        debug!("{} {}", method, request_url);

        let mut request = self.http_client.request(method, &request_url);
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let response_text = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("Unable to read response"));
        let message = detail_message(&response_text)
            .or_else(|| status.canonical_reason().map(str::to_owned))
            .unwrap_or_else(|| status.to_string());
        error!(
            "API request to {} failed with status {}: {}",
            request_url, status, response_text
        );
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response_bytes = response.bytes().await?;
        serde_json::from_slice::<T>(&response_bytes).map_err(|e| {
            error!(
                "Failed to deserialize API response: {}. Response body: {}",
                e,
                String::from_utf8_lossy(&response_bytes)
            );
            ApiError::Deserialization(e)
        })
    }
}

/// Extract a readable message from an error body, preferring the `detail`
/// member the service puts there.
///
fn detail_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => match value.get("detail") {
            Some(serde_json::Value::String(detail)) => Some(detail.to_owned()),
            Some(detail) => Some(detail.to_string()),
            None => Some(trimmed.to_owned()),
        },
        Err(_) => Some(trimmed.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorKind;
    use httpmock::MockServer;
    use serde_json::json;

    #[test]
    fn new_rejects_base_url_without_scheme() {
        assert!(matches!(
            Client::new("localhost:8000"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn url_joins_paths() {
        let client = Client::new("http://10.0.2.2:8000/").unwrap();
        assert_eq!(client.url("tasks/"), "http://10.0.2.2:8000/tasks/");
        assert_eq!(client.url("/tasks/3"), "http://10.0.2.2:8000/tasks/3");
    }

    #[test]
    fn detail_message_prefers_detail_member() {
        assert_eq!(
            detail_message(r#"{"detail":"Task not found"}"#),
            Some("Task not found".to_string())
        );
        assert_eq!(
            detail_message(r#"{"detail":[{"msg":"field required"}]}"#),
            Some(r#"[{"msg":"field required"}]"#.to_string())
        );
        assert_eq!(detail_message("oops"), Some("oops".to_string()));
        assert_eq!(detail_message("  "), None);
    }

    #[tokio::test]
    async fn get_sends_query_params() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/tasks/").query_param("user_id", "1");
                then.status(200).json_body(json!([]));
            })
            .await;

        let client = Client::new(&server.base_url()).unwrap();
        let records: Vec<serde_json::Value> = client
            .get("tasks/", &[("user_id", "1".to_string())])
            .await
            .unwrap();
        assert!(records.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_server_error() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("POST").path("/school/");
                then.status(422).json_body(json!({ "detail": "subject missing" }));
            })
            .await;

        let client = Client::new(&server.base_url()).unwrap();
        let error = client
            .send::<_, serde_json::Value>(Method::POST, "school/", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Server);
        assert_eq!(error.status(), Some(422));
        assert!(error.to_string().contains("subject missing"));
    }

    #[tokio::test]
    async fn undecodable_body_is_server_error() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/health/");
                then.status(200).body("<html>proxy</html>");
            })
            .await;

        let client = Client::new(&server.base_url()).unwrap();
        let error = client
            .get::<Vec<serde_json::Value>>("health/", &[])
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Deserialization(_)));
        assert_eq!(error.kind(), ErrorKind::Server);
    }

    #[tokio::test]
    async fn unreachable_service_is_network_error() {
        let client = Client::new("http://127.0.0.1:9").unwrap();
        let error = client.delete("tasks/1").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Network);
    }
}
