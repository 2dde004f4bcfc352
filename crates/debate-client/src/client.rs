use crate::types::{DebateRequest, DebateResponse, SuggestedTopics};
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex};

pub mod config;
mod consts;
mod stats;
mod utils;

pub use stats::Stats;

/// Failures of a single HTTP round trip with the debate backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never reached the backend or no response came back.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The backend answered 2xx but the body was not the expected JSON.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid backend url {0}")]
    InvalidUrl(String),
}

// Holds the HTTP connection pool, the configuration and the request counters.
// No request timeout is configured: an exchange always runs to completion.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    config: config::Config,
    stats: Arc<Mutex<Stats>>,
}

impl Client {
    fn new(config: config::Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            stats: Arc::new(Mutex::new(Stats::new())),
        }
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// `GET /suggested-topics`
    pub async fn suggested_topics(&self) -> Result<Vec<String>, ClientError> {
        let url = utils::build_url(&self.config, consts::SUGGESTED_TOPICS_PATH)?;
        tracing::debug!("fetching suggested topics from {}", url);

        self.update_stats(|stats| stats.record_topic_fetch());
        let response = self.http.get(url).send().await?;
        let topics: SuggestedTopics = read_json(response).await?;
        Ok(topics.into_topics())
    }

    /// `POST /debate`, returning the responder's text.
    pub async fn debate(&self, request: &DebateRequest) -> Result<String, ClientError> {
        let result = self.post_debate(request).await;
        self.update_stats(|stats| stats.record_exchange(result.is_ok()));
        result
    }

    async fn post_debate(&self, request: &DebateRequest) -> Result<String, ClientError> {
        let url = utils::build_url(&self.config, consts::DEBATE_PATH)?;
        tracing::debug!(
            "posting debate exchange: topic={:?}, history_len={}",
            request.topic(),
            request.history().len()
        );

        let response = self.http.post(url).json(request).send().await?;
        let body: DebateResponse = read_json(response).await?;
        Ok(body.into_response())
    }

    // Return a copy of the counters so callers can inspect them.
    pub fn stats(&self) -> Stats {
        match self.stats.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update_stats(&self, f: impl FnOnce(&mut Stats)) {
        if let Ok(mut guard) = self.stats.lock() {
            f(&mut guard);
        } else {
            tracing::error!("failed to update stats");
        }
    }
}

// Separates "reached but failed" (status) from "reached but unreadable" (decode).
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(serde_json::from_str(&body)?)
}

// Create a client for the given config, validating the base url up front.
pub fn connect_with_config(config: config::Config) -> Result<Client, ClientError> {
    utils::build_url(&config, "")?;
    Ok(Client::new(config))
}

// Create a client for the default local backend.
pub fn connect() -> Result<Client, ClientError> {
    connect_with_config(config::Config::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Turn;
    use axum::{Json, Router, http::StatusCode, routing::get, routing::post};

    async fn spawn_backend(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(base_url: &str) -> Client {
        let config = config::Config::builder().with_base_url(base_url).build();
        connect_with_config(config).unwrap()
    }

    #[tokio::test]
    async fn test_suggested_topics_success() {
        let app = Router::new().route(
            "/suggested-topics",
            get(|| async {
                Json(SuggestedTopics::new(vec![
                    "Free Will vs. Determinism".to_string(),
                    "Climate Policy".to_string(),
                ]))
            }),
        );
        let client = client_for(&spawn_backend(app).await);

        let topics = client.suggested_topics().await.unwrap();

        assert_eq!(topics, vec!["Free Will vs. Determinism", "Climate Policy"]);
        assert_eq!(client.stats().topic_fetches(), 1);
    }

    #[tokio::test]
    async fn test_debate_posts_full_request() {
        // The fake backend echoes what it received so the wire shape can be checked.
        let app = Router::new().route(
            "/debate",
            post(|Json(request): Json<DebateRequest>| async move {
                Json(DebateResponse::new(format!(
                    "{}|{}|{}",
                    request.topic(),
                    request.initial_viewpoint(),
                    request.history().len()
                )))
            }),
        );
        let client = client_for(&spawn_backend(app).await);
        let request = DebateRequest::follow_up(
            "Climate Policy",
            "Markets solve this",
            vec![
                Turn::user("Markets solve this"),
                Turn::assistant("I disagree because..."),
                Turn::user("Rebuttal text"),
            ],
        );

        let reply = client.debate(&request).await.unwrap();

        assert_eq!(reply, "Climate Policy|Markets solve this|3");
        assert_eq!(client.stats().exchanges(), 1);
        assert_eq!(client.stats().failed_exchanges(), 0);
    }

    #[tokio::test]
    async fn test_debate_non_success_status() {
        let app = Router::new().route(
            "/debate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model unavailable") }),
        );
        let client = client_for(&spawn_backend(app).await);

        let err = client
            .debate(&DebateRequest::opening("t", "v"))
            .await
            .unwrap_err();

        match err {
            ClientError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "model unavailable");
            }
            other => panic!("Expected a status error, got {other:?}"),
        }
        assert_eq!(client.stats().failed_exchanges(), 1);
    }

    #[tokio::test]
    async fn test_debate_malformed_body() {
        let app = Router::new().route(
            "/debate",
            post(|| async { Json(serde_json::json!({ "reply": "wrong field" })) }),
        );
        let client = client_for(&spawn_backend(app).await);

        let err = client
            .debate(&DebateRequest::opening("t", "v"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_request_error() {
        // Bind then drop to get a local port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(&format!("http://{addr}"));

        let err = client.suggested_topics().await.unwrap_err();

        assert!(matches!(err, ClientError::Request(_)), "got {err:?}");
    }

    #[test]
    fn test_connect_rejects_invalid_base_url() {
        let config = config::Config::builder().with_base_url("::nope::").build();
        assert!(matches!(
            connect_with_config(config),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
