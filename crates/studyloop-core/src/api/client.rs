//! HTTP client for the remote review API.

use std::time::Duration;

use url::Url;

use crate::api::types::{ApiError, CardToReview, DueCounts, IntervalPreviews, ReviewSubmission};
use crate::config::ApiConfig;

/// The remote review API as the engine sees it.
///
/// The production implementation is [`ReviewClient`]; tests substitute
/// scripted implementations.
#[allow(async_fn_in_trait)]
pub trait ReviewApi {
    /// Due/new/total counts for a deck, optionally filtered by tags.
    async fn due_counts(
        &self,
        deck_id: &str,
        tags: Option<&[String]>,
    ) -> Result<DueCounts, ApiError>;

    /// The next card to review, or `None` when the queue is exhausted.
    async fn next_card(
        &self,
        deck_id: &str,
        tags: Option<&[String]>,
    ) -> Result<Option<CardToReview>, ApiError>;

    /// Submit a rating for a card.
    async fn submit_review(
        &self,
        card_id: &str,
        submission: &ReviewSubmission,
    ) -> Result<(), ApiError>;

    /// Next-interval previews for a card. Best-effort; callers treat a
    /// failure as "no preview".
    async fn interval_previews(&self, card_id: &str) -> Result<IntervalPreviews, ApiError>;
}

/// reqwest-backed [`ReviewApi`] implementation.
///
/// Every request carries an explicit timeout so a hung call cannot leave
/// the engine in `Loading` indefinitely.
pub struct ReviewClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ReviewClient {
    /// Create a client against `base_url` with a per-request timeout.
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.base_url,
            config.token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.get(url);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.post(url);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn status_error(resp: reqwest::Response) -> ApiError {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        ApiError::Status { status, message }
    }
}

/// Render a tag filter as a `tags=` query suffix, empty when absent.
fn tag_query(tags: Option<&[String]>) -> String {
    match tags {
        Some(tags) if !tags.is_empty() => {
            format!("?tags={}", urlencoding::encode(&tags.join(",")))
        }
        _ => String::new(),
    }
}

impl ReviewApi for ReviewClient {
    async fn due_counts(
        &self,
        deck_id: &str,
        tags: Option<&[String]>,
    ) -> Result<DueCounts, ApiError> {
        let url = self.endpoint(&format!(
            "decks/{}/review/count{}",
            urlencoding::encode(deck_id),
            tag_query(tags)
        ));
        let resp = self.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(Self::status_error(resp).await);
        }
        Ok(resp.json().await?)
    }

    async fn next_card(
        &self,
        deck_id: &str,
        tags: Option<&[String]>,
    ) -> Result<Option<CardToReview>, ApiError> {
        let url = self.endpoint(&format!(
            "decks/{}/review/next{}",
            urlencoding::encode(deck_id),
            tag_query(tags)
        ));
        let resp = self.get(&url).send().await?;
        // "Not found" means the queue is exhausted, not an error.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(Self::status_error(resp).await);
        }
        Ok(Some(resp.json().await?))
    }

    async fn submit_review(
        &self,
        card_id: &str,
        submission: &ReviewSubmission,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("cards/{}/review", urlencoding::encode(card_id)));
        let resp = self.post(&url).json(submission).send().await?;
        if !resp.status().is_success() {
            return Err(Self::status_error(resp).await);
        }
        Ok(())
    }

    async fn interval_previews(&self, card_id: &str) -> Result<IntervalPreviews, ApiError> {
        let url = self.endpoint(&format!("cards/{}/intervals", urlencoding::encode(card_id)));
        let resp = self.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(Self::status_error(resp).await);
        }
        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &mockito::ServerGuard) -> ReviewClient {
        ReviewClient::new(&server.url(), None, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = ReviewClient::new("not a url", None, Duration::from_secs(1));
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }

    #[test]
    fn tag_query_encoding() {
        assert_eq!(tag_query(None), "");
        assert_eq!(tag_query(Some(&[])), "");
        let tags = vec!["verbs".to_string(), "unit 2".to_string()];
        assert_eq!(tag_query(Some(&tags)), "?tags=verbs%2Cunit%202");
    }

    #[tokio::test]
    async fn due_counts_parses_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/decks/d1/review/count")
            .with_status(200)
            .with_body(r#"{"due": 7, "new": 2, "total": 31}"#)
            .create_async()
            .await;

        let counts = client(&server).due_counts("d1", None).await.unwrap();
        mock.assert_async().await;
        assert_eq!(counts.due, 7);
        assert_eq!(counts.new_cards, 2);
        assert_eq!(counts.total, 31);
    }

    #[tokio::test]
    async fn next_card_not_found_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/decks/d1/review/next")
            .with_status(404)
            .create_async()
            .await;

        let card = client(&server).next_card("d1", None).await.unwrap();
        assert!(card.is_none());
    }

    #[tokio::test]
    async fn next_card_parses_card() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/decks/d1/review/next")
            .with_status(200)
            .with_body(r#"{"id": "c9", "front": "Q", "back": "A", "is_new": true}"#)
            .create_async()
            .await;

        let card = client(&server).next_card("d1", None).await.unwrap().unwrap();
        assert_eq!(card.id, "c9");
        assert!(card.is_new);
    }

    #[tokio::test]
    async fn next_card_server_error_is_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/decks/d1/review/next")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = client(&server).next_card("d1", None).await.unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn submit_review_posts_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/cards/c1/review")
            .match_body(mockito::Matcher::Json(
                serde_json::json!({"rating": 3, "duration_ms": 4200}),
            ))
            .with_status(200)
            .create_async()
            .await;

        client(&server)
            .submit_review(
                "c1",
                &ReviewSubmission {
                    rating: 3,
                    duration_ms: 4200,
                },
            )
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn bearer_token_is_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cards/c1/intervals")
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_body(r#"{"again": "1m", "hard": "10m", "good": "1d", "easy": "4d"}"#)
            .create_async()
            .await;

        let api = ReviewClient::new(&server.url(), Some("secret".into()), Duration::from_secs(2))
            .unwrap();
        let previews = api.interval_previews("c1").await.unwrap();
        mock.assert_async().await;
        assert_eq!(previews.good, "1d");
    }
}
