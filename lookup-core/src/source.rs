use async_trait::async_trait;
use reqwest::{Client, Url};
use std::fmt::Debug;
use tracing::debug;

use crate::{
    error::LookupError,
    model::{CreatedRecord, NewWeatherRecord, WeatherRecord},
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Where weather records come from.
#[async_trait]
pub trait RecordSource: Send + Sync + Debug {
    /// Fetch the record stored under `id`. The id is used verbatim.
    async fn fetch(&self, id: &str) -> Result<WeatherRecord, LookupError>;

    /// Ask the backend to create a record, returning its id.
    async fn create(&self, request: &NewWeatherRecord) -> Result<CreatedRecord, LookupError>;
}

/// [`RecordSource`] backed by the weather record HTTP service.
#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    base_url: String,
    http: Client,
}

impl HttpRecordSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http: Client::new() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/weather/{id}` with the id substituted as-is.
    pub fn record_url(&self, id: &str) -> Result<Url, LookupError> {
        let raw = format!("{}/weather/{id}", self.base_url);
        Url::parse(&raw).map_err(|_| LookupError::Url(raw))
    }

    fn collection_url(&self) -> Result<Url, LookupError> {
        let raw = format!("{}/weather", self.base_url);
        Url::parse(&raw).map_err(|_| LookupError::Url(raw))
    }
}

impl Default for HttpRecordSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch(&self, id: &str) -> Result<WeatherRecord, LookupError> {
        let url = self.record_url(id)?;
        debug!(%url, "fetching weather record");

        let res = self.http.get(url).send().await?;

        let status = res.status();
        debug!(status = status.as_u16(), "weather record response");
        if !status.is_success() {
            return Err(LookupError::from_response(&res));
        }

        let body = res.text().await?;
        let record: WeatherRecord = serde_json::from_str(&body)?;

        Ok(record)
    }

    async fn create(&self, request: &NewWeatherRecord) -> Result<CreatedRecord, LookupError> {
        let url = self.collection_url()?;
        debug!(%url, location = %request.location, "submitting weather record");

        let res = self.http.post(url).json(request).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(LookupError::from_response(&res));
        }

        let body = res.text().await?;
        let created: CreatedRecord = serde_json::from_str(&body)?;

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    /// Answer a single HTTP request with a canned raw response.
    async fn serve_once(raw: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(raw.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{addr}")
    }

    #[test]
    fn record_url_keeps_id_verbatim() {
        let source = HttpRecordSource::new("http://localhost:8000/");
        let url = source.record_url("abc-123").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/weather/abc-123");
    }

    #[test]
    fn record_url_does_not_trim_id() {
        let source = HttpRecordSource::default();
        let url = source.record_url(" 42").unwrap();
        assert_eq!(url.path(), "/weather/%2042");
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let source = HttpRecordSource::new("not a url");
        let err = source.record_url("1").unwrap_err();
        assert!(matches!(err, LookupError::Url(_)));
    }

    #[tokio::test]
    async fn fetch_parses_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "date": "2024-01-01",
                "location": "Paris",
                "weatherData": { "current": { "temperature": 20 } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpRecordSource::new(server.uri());
        let record = source.fetch("abc").await.expect("fetch should succeed");

        assert_eq!(record.date, "2024-01-01");
        assert_eq!(record.location, "Paris");
    }

    #[tokio::test]
    async fn fetch_maps_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "detail": "Weather data not found" })),
            )
            .mount(&server)
            .await;

        let source = HttpRecordSource::new(server.uri());
        let err = source.fetch("missing").await.unwrap_err();

        assert_eq!(err.user_message(), "Error 404: Not Found");
    }

    #[tokio::test]
    async fn fetch_reports_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let source = HttpRecordSource::new(server.uri());
        let err = source.fetch("x").await.unwrap_err();

        assert!(matches!(err, LookupError::Decode(_)));
    }

    #[tokio::test]
    async fn fetch_reports_connection_failure() {
        // Port 1 is privileged and unused, so the connection is refused.
        let source = HttpRecordSource::new("http://127.0.0.1:1");
        let err = source.fetch("x").await.unwrap_err();

        assert!(matches!(err, LookupError::Transport(_)), "got {err:?}");
        assert!(!err.user_message().is_empty());
    }

    #[tokio::test]
    async fn fetch_keeps_custom_reason_phrase() {
        let base = serve_once(
            "HTTP/1.1 404 Record Gone\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        let source = HttpRecordSource::new(base);
        let err = source.fetch("abc").await.unwrap_err();

        assert_eq!(err.user_message(), "Error 404: Record Gone");
    }

    #[tokio::test]
    async fn fetch_uses_canonical_reason_when_server_sends_none() {
        let base =
            serve_once("HTTP/1.1 503 \r\ncontent-length: 0\r\nconnection: close\r\n\r\n").await;

        let source = HttpRecordSource::new(base);
        let err = source.fetch("abc").await.unwrap_err();

        assert_eq!(err.user_message(), "Error 503: Service Unavailable");
    }

    #[tokio::test]
    async fn create_posts_body_and_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/weather"))
            .and(body_json(json!({
                "date": "2024-01-01",
                "location": "Oslo",
                "notes": "windy"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "new-id" })))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpRecordSource::new(server.uri());
        let created = source
            .create(&NewWeatherRecord {
                date: "2024-01-01".into(),
                location: "Oslo".into(),
                notes: "windy".into(),
            })
            .await
            .unwrap();

        assert_eq!(created.id, "new-id");
    }

    #[tokio::test]
    async fn create_maps_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(504))
            .mount(&server)
            .await;

        let source = HttpRecordSource::new(server.uri());
        let err = source
            .create(&NewWeatherRecord {
                date: "d".into(),
                location: "l".into(),
                notes: String::new(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Error 504: Gateway Timeout");
    }
}
