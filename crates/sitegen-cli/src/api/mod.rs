//! HTTP client for the generation service

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, RequestBuilder};
use serde::de::DeserializeOwned;
use sitegen_core::{RequestError, WebsiteApi};
use sitegen_types::{
    ApiEnvelope, ApiErrorBody, Artifact, DeleteAck, GenerateRequest, ListQuery, PreviewPayload,
    Settings, SystemHealth, WebsitePage, WebsiteUpdate,
};
use std::time::Duration;
use tracing::{debug, error};

pub struct Client {
    http: ReqwestClient,
    base_url: String,
}

impl Client {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create client from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.server_url.clone(),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        // server_url already includes /api/v1, so just append the endpoint
        format!("{}{}", self.base_url, path)
    }

    /// `/websites/<id><suffix>` with the id encoded as a single path segment
    fn website_url(&self, id: &str, suffix: &str) -> String {
        self.url(&format!("/websites/{}{}", urlencoding::encode(id), suffix))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        url: &str,
        request: RequestBuilder,
    ) -> std::result::Result<T, RequestError> {
        debug!("API Request: {} {}", method, url);

        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("API Request Error: {} {}: {}", method, url, e);
                if e.is_timeout() {
                    RequestError::Timeout
                } else {
                    RequestError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        debug!("API Response: {} {}", status.as_u16(), url);

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                RequestError::Timeout
            } else {
                RequestError::Network(e.to_string())
            }
        })?;

        if !status.is_success() {
            error!(
                "API Error: {} {} returned {}: {}",
                method,
                url,
                status.as_u16(),
                body
            );
            let error: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
            let suggestions = error.suggestions();
            return Err(RequestError::from_status(
                status.as_u16(),
                error.message,
                suggestions,
            ));
        }

        decode(&body)
    }
}

/// Decode a success body. The service normally wraps payloads in
/// `{ success, data, message }`; bare payloads are accepted as well.
fn decode<T: DeserializeOwned>(body: &str) -> std::result::Result<T, RequestError> {
    if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<T>>(body) {
        if !envelope.success {
            return Err(RequestError::InvalidResponse(
                envelope
                    .message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            ));
        }
        if let Some(data) = envelope.data {
            return Ok(data);
        }
    }

    serde_json::from_str::<T>(body).map_err(|e| RequestError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl WebsiteApi for Client {
    async fn generate_website(
        &self,
        request: &GenerateRequest,
    ) -> std::result::Result<Artifact, RequestError> {
        let url = self.url("/websites/generate");
        self.send("POST", &url, self.http.post(&url).json(request))
            .await
    }

    async fn list_websites(
        &self,
        query: &ListQuery,
    ) -> std::result::Result<WebsitePage, RequestError> {
        let url = self.url("/websites");
        let mut params = vec![
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
            params.push(("search", search.clone()));
        }
        self.send("GET", &url, self.http.get(&url).query(&params))
            .await
    }

    async fn list_public_websites(
        &self,
        page: u32,
        limit: u32,
    ) -> std::result::Result<WebsitePage, RequestError> {
        let url = self.url("/websites/public");
        let params = [("page", page.to_string()), ("limit", limit.to_string())];
        self.send("GET", &url, self.http.get(&url).query(&params))
            .await
    }

    async fn get_website(&self, id: &str) -> std::result::Result<Artifact, RequestError> {
        let url = self.website_url(id, "");
        self.send("GET", &url, self.http.get(&url)).await
    }

    async fn get_preview(&self, id: &str) -> std::result::Result<PreviewPayload, RequestError> {
        let url = self.website_url(id, "/preview");
        self.send("GET", &url, self.http.get(&url)).await
    }

    async fn system_health(&self) -> std::result::Result<SystemHealth, RequestError> {
        let url = self.url("/health/detailed");
        self.send("GET", &url, self.http.get(&url)).await
    }

    async fn update_website(
        &self,
        id: &str,
        update: &WebsiteUpdate,
    ) -> std::result::Result<Artifact, RequestError> {
        let url = self.website_url(id, "");
        self.send("PUT", &url, self.http.put(&url).json(update))
            .await
    }

    async fn delete_website(&self, id: &str) -> std::result::Result<DeleteAck, RequestError> {
        let url = self.website_url(id, "");
        self.send("DELETE", &url, self.http.delete(&url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn website_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Bakery",
            "description": "Fresh bread daily",
            "prompt": "A website for a neighbourhood bakery",
            "htmlContent": "<h1>Bakery</h1>",
            "cssContent": "h1 { color: brown; }",
            "isPublic": false,
            "createdAt": "2024-05-01T12:00:00Z"
        })
    }

    fn client(server: &MockServer) -> Client {
        Client::new(format!("{}/api/v1", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_generate_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/websites/generate"))
            .and(body_partial_json(json!({
                "prompt": "A website for a neighbourhood bakery",
                "isPublic": false
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "data": website_json("w1"),
                "message": "Website generated successfully"
            })))
            .mount(&server)
            .await;

        let request = GenerateRequest::new("A website for a neighbourhood bakery").public(false);
        let website = client(&server).generate_website(&request).await.unwrap();

        assert_eq!(website.id, "w1");
        assert!(!website.is_public);
    }

    #[tokio::test]
    async fn test_bad_request_carries_message_and_suggestions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/websites/generate"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "message": "Prompt is too vague",
                "details": { "suggestions": ["Describe the business", "List the pages"] }
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .generate_website(&GenerateRequest::new("Make me a website please"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RequestError::BadRequest {
                message: "Prompt is too vague".to_string(),
                suggestions: vec!["Describe the business".to_string(), "List the pages".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/websites/limited"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/websites/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client(&server);
        assert_eq!(
            client.get_website("limited").await.unwrap_err(),
            RequestError::RateLimited
        );
        assert!(matches!(
            client.get_website("broken").await.unwrap_err(),
            RequestError::Server { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn test_unwrapped_single_website() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/websites/w2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(website_json("w2")))
            .mount(&server)
            .await;

        let website = client(&server).get_website("w2").await.unwrap();
        assert_eq!(website.title, "Bakery");
    }

    #[tokio::test]
    async fn test_ids_are_encoded_as_one_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/websites/a%2Fb%20c/preview"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "html": "<p>ok</p>", "css": "" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/websites/a%2Fb%20c"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Website deleted successfully"
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let preview = client.get_preview("a/b c").await.unwrap();
        assert_eq!(preview.html, "<p>ok</p>");
        assert!(client.delete_website("a/b c").await.unwrap().success);
    }

    #[tokio::test]
    async fn test_listing_sends_pagination_and_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/websites"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "12"))
            .and(query_param("search", "bakery"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "websites": [website_json("w1"), website_json("w2")],
                    "total": 14,
                    "page": 2,
                    "limit": 12,
                    "totalPages": 2
                }
            })))
            .mount(&server)
            .await;

        let listing = client(&server)
            .list_websites(&ListQuery {
                page: 2,
                limit: 12,
                search: Some("bakery".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(listing.websites.len(), 2);
        assert_eq!(listing.total_pages, 2);
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/health/detailed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Database unavailable"
            })))
            .mount(&server)
            .await;

        assert_eq!(
            client(&server).system_health().await.unwrap_err(),
            RequestError::InvalidResponse("Database unavailable".to_string())
        );
    }

    #[tokio::test]
    async fn test_delete_acknowledgement() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/websites/w1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Website deleted successfully"
            })))
            .mount(&server)
            .await;

        let ack = tokio_test::assert_ok!(client(&server).delete_website("w1").await);
        assert!(ack.success);
        assert_eq!(ack.message, "Website deleted successfully");
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/health/detailed"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": true, "data": { "status": "healthy" } }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client =
            Client::new(format!("{}/api/v1", server.uri()), Duration::from_millis(100)).unwrap();
        assert_eq!(client.system_health().await.unwrap_err(), RequestError::Timeout);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_network_error() {
        let client = Client::new("http://127.0.0.1:9/api/v1", Duration::from_secs(2)).unwrap();
        let err = client.system_health().await.unwrap_err();
        assert!(matches!(err, RequestError::Network(_)), "{:?}", err);
        assert_eq!(
            err.user_message(),
            "Network error. Please check your connection and try again."
        );
    }
}
