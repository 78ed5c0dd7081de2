use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use quiz_core::model::{QuestionSet, Unit};
use storage::repository::{QuestionSource, SourceError};

/// Fetches question files served as static resources over HTTP.
#[derive(Clone, Debug)]
pub struct HttpQuestionSource {
    client: Client,
    base_url: String,
}

impl HttpQuestionSource {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Use a preconfigured client, e.g. one with custom timeouts.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn url_for(&self, unit: &Unit) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            unit.resource().trim_start_matches('/')
        )
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn fetch(&self, unit: &Unit) -> Result<QuestionSet, SourceError> {
        let url = self.url_for(unit);
        let http_err = |err: reqwest::Error| SourceError::Http {
            resource: unit.resource().to_owned(),
            message: err.to_string(),
        };
        tracing::debug!(%url, "fetching question set");

        let response = self.client.get(&url).send().await.map_err(http_err)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound {
                resource: unit.resource().to_owned(),
            });
        }
        if !status.is_success() {
            return Err(SourceError::Http {
                resource: unit.resource().to_owned(),
                message: format!("unexpected status {status}"),
            });
        }

        let body = response.text().await.map_err(http_err)?;
        QuestionSet::from_json_str(&body).map_err(|source| SourceError::Invalid {
            resource: unit.resource().to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Catalog, QuestionSetError, SubjectId, UnitId};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn addition() -> Unit {
        Catalog::builtin()
            .unit(
                &SubjectId::new("math").unwrap(),
                &UnitId::new("addition").unwrap(),
            )
            .unwrap()
            .clone()
    }

    /// Answer a single request with a canned response and return the base URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let _ = stream.read(&mut request).await.unwrap();
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    fn source(base_url: String) -> HttpQuestionSource {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpQuestionSource::with_client(client, base_url)
    }

    #[test]
    fn joins_base_url_and_resource() {
        let catalog = Catalog::builtin();
        let unit = catalog
            .unit(
                &SubjectId::new("science").unwrap(),
                &UnitId::new("weather").unwrap(),
            )
            .unwrap();

        let source = HttpQuestionSource::new("https://quiz.example.com/static/");
        assert_eq!(
            source.url_for(unit),
            "https://quiz.example.com/static/questions/science/weather.json"
        );
    }

    #[tokio::test]
    async fn parses_successful_response() {
        let base = serve_once(
            "200 OK",
            r#"{ "questions": [ { "question": "2 + 2 = ?", "choices": ["3", "4"], "correct": 1 } ] }"#,
        )
        .await;
        let set = source(base).fetch(&addition()).await.unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.questions()[0].correct_index(), 1);
    }

    #[tokio::test]
    async fn missing_resource_is_not_found() {
        let base = serve_once("404 Not Found", "").await;
        let err = source(base).fetch(&addition()).await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::NotFound { resource } if resource == "questions/math/addition.json"
        ));
    }

    #[tokio::test]
    async fn server_error_is_http() {
        let base = serve_once("500 Internal Server Error", "").await;
        let err = source(base).fetch(&addition()).await.unwrap_err();
        match err {
            SourceError::Http { resource, message } => {
                assert_eq!(resource, "questions/math/addition.json");
                assert!(message.contains("500"), "{message}");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_body_is_invalid() {
        let base = serve_once("200 OK", r#"{ "questions": [] }"#).await;
        let err = source(base).fetch(&addition()).await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Invalid {
                source: QuestionSetError::Empty,
                ..
            }
        ));
    }
}
