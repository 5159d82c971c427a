//! HTTP session against the management service
//!
//! One `reqwest::Client` per session; every request carries the secret in
//! the `X-Secret` header.

use crate::config::ClientConfig;
use async_trait::async_trait;
use gamectl_core::{GameCtlError, Poll, Result, Transport};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Response, StatusCode};
use tracing::{debug, info};

/// Header carrying the session secret
pub const SECRET_HEADER: &str = "X-Secret";

/// Session with the management service
pub struct HttpSession {
    /// Underlying HTTP client (one connection pool)
    client: reqwest::Client,
    /// Base URL without trailing slash
    base_url: String,
    /// Secret sent with every request
    secret: String,
}

impl HttpSession {
    /// Open a session from configuration
    pub fn open(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(transport_error)?;

        let base_url = config.server_url.trim_end_matches('/').to_string();
        info!("Session opened to {}", base_url);
        Ok(Self {
            client,
            base_url,
            secret: config.secret.clone(),
        })
    }

    /// Base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Close the session, releasing its connections
    pub fn close(self) {
        info!("Session to {} closed", self.base_url);
    }

    /// Send a request and return the raw response
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(SECRET_HEADER, &self.secret);
        if method == Method::POST {
            request = request.header(CONTENT_TYPE, "application/json");
            if let Some(body) = body {
                request = request.body(serde_json::to_vec(&body)?);
            }
        }

        let response = request.send().await.map_err(transport_error)?;
        debug!("{} {} -> {}", method, url, response.status());
        Ok(response)
    }

    /// Map a 200/204 response to its body
    async fn read_body(response: Response) -> Result<Option<String>> {
        match response.status() {
            StatusCode::NO_CONTENT => Ok(None),
            StatusCode::OK => Ok(Some(response.text().await.map_err(transport_error)?)),
            _ => Err(remote_error(response).await),
        }
    }
}

#[async_trait]
impl Transport for HttpSession {
    async fn get(&self, path: &str) -> Result<Option<String>> {
        let response = self.send(Method::GET, path, None).await?;
        Self::read_body(response).await
    }

    async fn post(&self, path: &str, body: Option<serde_json::Value>) -> Result<Option<String>> {
        let response = self.send(Method::POST, path, body).await?;
        Self::read_body(response).await
    }

    async fn poll(&self, path: &str) -> Result<Poll> {
        let response = self.send(Method::GET, path, None).await?;
        match response.status() {
            StatusCode::OK => Ok(Poll::Lines(
                response.text().await.map_err(transport_error)?,
            )),
            StatusCode::NO_CONTENT => Ok(Poll::Empty),
            StatusCode::NOT_FOUND => Ok(Poll::Gone),
            _ => Err(remote_error(response).await),
        }
    }
}

fn transport_error(err: reqwest::Error) -> GameCtlError {
    GameCtlError::Transport(err.to_string())
}

/// Build a remote error from an unexpected response.
///
/// The body is the remote-supplied reason; an empty body falls back to the
/// canonical status text.
async fn remote_error(response: Response) -> GameCtlError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let reason = match body.trim() {
        "" => status.canonical_reason().unwrap_or("Unknown").to_string(),
        text => text.to_string(),
    };
    GameCtlError::Remote {
        status: status.as_u16(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session(server: &MockServer) -> HttpSession {
        HttpSession::open(&ClientConfig::new(server.uri(), "s3cret")).unwrap()
    }

    #[tokio::test]
    async fn test_get_returns_body_on_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/instances"))
            .and(header(SECRET_HEADER, "s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"survival":{}}"#))
            .expect(1)
            .mount(&server)
            .await;

        let body = session(&server).get("/instances").await.unwrap();
        assert_eq!(body.as_deref(), Some(r#"{"survival":{}}"#));
    }

    #[tokio::test]
    async fn test_post_returns_none_on_204() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/instances/survival/world/broadcast"))
            .and(header(SECRET_HEADER, "s3cret"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({ "message": "restart in 5" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let body = session(&server)
            .post(
                "/instances/survival/world/broadcast",
                Some(serde_json::json!({ "message": "restart in 5" })),
            )
            .await
            .unwrap();
        assert_eq!(body, None);
    }

    #[tokio::test]
    async fn test_unexpected_status_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409).set_body_string("server already running"))
            .mount(&server)
            .await;

        let err = session(&server)
            .post("/instances/survival/server/start", None)
            .await
            .unwrap_err();
        match err {
            GameCtlError::Remote { status, reason } => {
                assert_eq!(status, 409);
                assert_eq!(reason, "server already running");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_error_body_uses_canonical_reason() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = session(&server).get("/instances").await.unwrap_err();
        assert!(matches!(err, GameCtlError::Remote { status: 403, ref reason } if reason == "Forbidden"));
    }

    #[tokio::test]
    async fn test_poll_classifies_statuses() {
        let server = MockServer::start().await;
        Mock::given(path("/progress/lines"))
            .respond_with(ResponseTemplate::new(200).set_body_string("10%"))
            .mount(&server)
            .await;
        Mock::given(path("/progress/empty"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(path("/progress/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(path("/progress/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let session = session(&server);
        assert_eq!(session.poll("/progress/lines").await.unwrap(), Poll::Lines("10%".into()));
        assert_eq!(session.poll("/progress/empty").await.unwrap(), Poll::Empty);
        assert_eq!(session.poll("/progress/gone").await.unwrap(), Poll::Gone);
        assert!(matches!(
            session.poll("/progress/broken").await,
            Err(GameCtlError::Remote { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_drain_follows_progress_until_gone() {
        let server = MockServer::start().await;
        let steps = [
            ResponseTemplate::new(200).set_body_string("a"),
            ResponseTemplate::new(200).set_body_string("b"),
            ResponseTemplate::new(204),
            ResponseTemplate::new(200).set_body_string("c"),
        ];
        for step in steps {
            Mock::given(method("GET"))
                .and(path("/deployment/backup-world/42"))
                .respond_with(step)
                .up_to_n_times(1)
                .mount(&server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/deployment/backup-world/42"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let lines = Mutex::new(Vec::new());
        let relay = |line: &str| lines.lock().unwrap().push(line.to_string());
        let locator = format!("{}/deployment/backup-world/42", server.uri());

        session(&server).drain(&locator, &relay).await.unwrap();

        assert_eq!(*lines.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_open_rejects_incomplete_config() {
        let err = HttpSession::open(&ClientConfig::new("http://127.0.0.1:1", "")).err().unwrap();
        assert!(matches!(err, GameCtlError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        let session = HttpSession::open(&ClientConfig::new("http://127.0.0.1:1", "s")).unwrap();
        let err = session.get("/instances").await.unwrap_err();
        assert!(matches!(err, GameCtlError::Transport(_)));
    }
}
