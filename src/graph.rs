//! Graph transport and mailbox operations
//!
//! Provides the process-scoped client for the remote mailbox provider. One
//! function per provider verb; every call carries bearer authentication and
//! is bounded by the client-wide timeouts from server config. Failures are
//! wrapped into [`AppError`] uniformly; the dispatcher does not distinguish
//! provider causes further.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{Message, MessageCollection, UserProfile};

/// Fields requested for message list projections
const LIST_SELECT: &str = "id,subject,from,receivedDateTime,bodyPreview";

/// Authenticated Graph API client
///
/// Holds the HTTP connection pool and the bearer token. Cheap to share via
/// `Arc`; all methods take `&self` and are safe to call concurrently.
pub struct GraphClient {
    http: Client,
    base_url: String,
    access_token: SecretString,
}

impl GraphClient {
    /// Build a client from server config
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &ServerConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(concat!("mail-graph-mcp-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("http client setup failed: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Probe the signed-in mailbox
    ///
    /// Issues a minimal profile request to confirm the token works. Used at
    /// startup for a log line only; the server starts regardless.
    pub async fn verify_connection(&self) -> AppResult<String> {
        let url = format!("{}/me", self.base_url);
        let response = self
            .authorized(self.http.get(url))
            .query(&[("$select", "userPrincipalName")])
            .send()
            .await
            .map_err(request_error)?;
        let profile: UserProfile = decode_json(ensure_success(response).await?).await?;
        Ok(profile
            .user_principal_name
            .unwrap_or_else(|| "unknown".to_owned()))
    }

    /// List messages received on or after `since`, newest first
    ///
    /// Caps the result at `limit` via the provider's page-size option and
    /// requests only the summary fields.
    pub async fn list_recent_messages(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<Message>> {
        let url = format!("{}/me/messages", self.base_url);
        let filter = format!(
            "receivedDateTime ge {}",
            since.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        tracing::debug!(%filter, limit, "graph list messages");
        let response = self
            .authorized(self.http.get(url))
            .query(&[
                ("$filter", filter.as_str()),
                ("$top", &limit.to_string()),
                ("$orderby", "receivedDateTime DESC"),
                ("$select", LIST_SELECT),
            ])
            .send()
            .await
            .map_err(request_error)?;
        let collection: MessageCollection = decode_json(ensure_success(response).await?).await?;
        Ok(collection.value)
    }

    /// Fetch one message by provider id
    pub async fn get_message(&self, id: &str) -> AppResult<Message> {
        let url = format!("{}/me/messages/{id}", self.base_url);
        tracing::debug!(message_id = %id, "graph get message");
        let response = self
            .authorized(self.http.get(url))
            .send()
            .await
            .map_err(request_error)?;
        decode_json(ensure_success(response).await?).await
    }

    /// Create a reply draft for an existing message
    ///
    /// The provider pre-fills the draft (subject, recipients, quoted body);
    /// the returned draft carries the id used for the follow-up body patch.
    pub async fn create_reply_draft(&self, id: &str) -> AppResult<Message> {
        let url = format!("{}/me/messages/{id}/createReply", self.base_url);
        tracing::debug!(message_id = %id, "graph create reply draft");
        let response = self
            .authorized(self.http.post(url))
            .json(&json!({}))
            .send()
            .await
            .map_err(request_error)?;
        decode_json(ensure_success(response).await?).await
    }

    /// Replace a draft's body with plain text
    pub async fn update_draft_body(&self, draft_id: &str, text: &str) -> AppResult<()> {
        let url = format!("{}/me/messages/{draft_id}", self.base_url);
        tracing::debug!(draft_id = %draft_id, "graph update draft body");
        let response = self
            .authorized(self.http.patch(url))
            .json(&json!({
                "body": { "contentType": "Text", "content": text }
            }))
            .send()
            .await
            .map_err(request_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Permanently delete a message (not a move to a trash folder)
    pub async fn delete_message(&self, id: &str) -> AppResult<()> {
        let url = format!("{}/me/messages/{id}", self.base_url);
        tracing::debug!(message_id = %id, "graph delete message");
        let response = self
            .authorized(self.http.delete(url))
            .send()
            .await
            .map_err(request_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Attach bearer authentication and the JSON accept header
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(self.access_token.expose_secret())
            .header(ACCEPT, "application/json")
    }
}

/// Map transport-level request failures
fn request_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Timeout(format!("graph request timed out: {e}"))
    } else {
        AppError::Provider(format!("graph request failed: {e}"))
    }
}

/// Check response status and map failures
///
/// 401/403 indicate a rejected token, 404 an unknown resource; every other
/// non-success status is reported as a provider failure carrying the
/// response body text.
async fn ensure_success(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AppError::AuthFailed(format!("graph rejected credentials ({status}): {body}"))
        }
        StatusCode::NOT_FOUND => AppError::NotFound(format!("graph resource not found: {body}")),
        _ => AppError::Provider(format!("graph request failed ({status}): {body}")),
    })
}

/// Decode a JSON response body
async fn decode_json<T: for<'de> serde::Deserialize<'de>>(response: Response) -> AppResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| AppError::Internal(format!("invalid provider response: {e}")))
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use secrecy::SecretString;
    use serde_json::json;

    use super::GraphClient;
    use crate::config::ServerConfig;
    use crate::errors::AppError;

    fn client_for(server: &MockServer) -> GraphClient {
        let config = ServerConfig {
            base_url: server.base_url(),
            access_token: SecretString::new("test-token".into()),
            request_timeout_ms: 5_000,
            connect_timeout_ms: 5_000,
        };
        GraphClient::new(&config).expect("client builds")
    }

    #[tokio::test]
    async fn list_sends_query_options_and_bearer_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/me/messages")
                .query_param("$top", "3")
                .query_param("$orderby", "receivedDateTime DESC")
                .query_param("$select", "id,subject,from,receivedDateTime,bodyPreview")
                .query_param_exists("$filter")
                .header("authorization", "Bearer test-token");
            then.status(200).json_body(json!({
                "value": [
                    { "id": "m1", "subject": "Newest", "bodyPreview": "hi" },
                    { "id": "m2", "subject": "Older" }
                ]
            }));
        });

        let client = client_for(&server);
        let messages = client
            .list_recent_messages(chrono::Utc::now() - chrono::Duration::days(7), 3)
            .await
            .expect("list succeeds");
        mock.assert();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, "m1");
        assert_eq!(messages[0].subject.as_deref(), Some("Newest"));
        assert_eq!(messages[1].body_preview, None);
    }

    #[tokio::test]
    async fn get_message_maps_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/me/messages/missing");
            then.status(404).body("ErrorItemNotFound");
        });

        let client = client_for(&server);
        let err = client.get_message("missing").await.expect_err("must fail");
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("ErrorItemNotFound"));
    }

    #[tokio::test]
    async fn create_reply_draft_posts_empty_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/me/messages/m1/createReply")
                .json_body(json!({}));
            then.status(201).json_body(json!({
                "id": "draft-1",
                "subject": "RE: Quarterly numbers"
            }));
        });

        let client = client_for(&server);
        let draft = client.create_reply_draft("m1").await.expect("draft created");
        mock.assert();
        assert_eq!(draft.id, "draft-1");
        assert_eq!(draft.subject.as_deref(), Some("RE: Quarterly numbers"));
    }

    #[tokio::test]
    async fn update_draft_body_patches_plain_text_content() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::PATCH)
                .path("/me/messages/draft-1")
                .json_body(json!({
                    "body": { "contentType": "Text", "content": "Thanks!" }
                }));
            then.status(200).json_body(json!({ "id": "draft-1" }));
        });

        let client = client_for(&server);
        client
            .update_draft_body("draft-1", "Thanks!")
            .await
            .expect("patch succeeds");
        mock.assert();
    }

    #[tokio::test]
    async fn delete_accepts_no_content_and_maps_auth_failures() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/me/messages/m1");
            then.status(204);
        });
        server.mock(|when, then| {
            when.method(DELETE).path("/me/messages/locked");
            then.status(403).body("access denied");
        });

        let client = client_for(&server);
        client.delete_message("m1").await.expect("delete succeeds");

        let err = client.delete_message("locked").await.expect_err("must fail");
        assert!(matches!(err, AppError::AuthFailed(_)));
    }

    #[tokio::test]
    async fn verify_connection_returns_principal_name() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/me")
                .query_param("$select", "userPrincipalName");
            then.status(200)
                .json_body(json!({ "userPrincipalName": "user@contoso.com" }));
        });

        let client = client_for(&server);
        let who = client.verify_connection().await.expect("probe succeeds");
        assert_eq!(who, "user@contoso.com");
    }
}
