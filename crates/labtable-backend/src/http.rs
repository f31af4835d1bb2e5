//! HTTP client for the acquisition daemon's table endpoints

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;

use labtable_core::prelude::*;
use labtable_core::{LogDate, RowId, SaveStatus, SettingsDocument};

use crate::store::TableBackend;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Body of a log viewer delete request.
#[derive(Debug, Serialize)]
struct DeleteRequest {
    rowid: String,
}

/// Settings store behind the daemon's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    /// Always ends in `/` so relative endpoints join under it
    base: Url,
}

impl HttpBackend {
    /// Create a client for `base_url` (e.g. `http://localhost:5000`).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidUrl`] if the URL does not parse or is not http(s).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base_url).map_err(|_| Error::invalid_url(base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::invalid_url(base_url));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::backend(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve an endpoint relative to the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|_| Error::invalid_url(format!("{}{}", self.base, path)))
    }

    async fn get_document(&self, path: &str) -> Result<SettingsDocument> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::backend(format!("GET {path}: {e}")))?;
        let body = read_body(path, response).await?;

        SettingsDocument::from_json(&body)
    }

    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<String> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::backend(format!("POST {path}: {e}")))?;

        read_body(path, response).await
    }
}

/// Fail on non-2xx, otherwise return the body text.
async fn read_body(path: &str, response: Response) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        warn!("{} answered HTTP {}", path, status.as_u16());
        return Err(Error::backend_status(path, status.as_u16()));
    }
    response
        .text()
        .await
        .map_err(|e| Error::backend(format!("Reading {path} response: {e}")))
}

/// Parse a save response.
///
/// The daemon answers `{"status": ...}` with the document echoed back, or a
/// bare error string when the write failed; the latter becomes the status.
pub fn parse_save_status(body: &str) -> SaveStatus {
    serde_json::from_str(body).unwrap_or_else(|_| SaveStatus {
        status: body.trim().to_string(),
    })
}

impl TableBackend for HttpBackend {
    async fn load(&self) -> Result<SettingsDocument> {
        self.get_document("table_load").await
    }

    async fn save(&self, document: &SettingsDocument) -> Result<SaveStatus> {
        let body = self.post_json("table_save", document).await?;
        Ok(parse_save_status(&body))
    }

    async fn load_log(&self, date: LogDate) -> Result<SettingsDocument> {
        self.get_document(&format!("{}/table_load", date.path_segment()))
            .await
    }

    async fn delete_test(&self, date: LogDate, rowid: RowId) -> Result<()> {
        let request = DeleteRequest {
            rowid: rowid.to_string(),
        };
        self.post_json(&format!("{}/del_test", date.path_segment()), &request)
            .await?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.base.as_str().trim_end_matches('/').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer one HTTP request with `status` and `body`; yields the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });

        (url, handle)
    }

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let backend = HttpBackend::new("http://lab:5000/acoustic", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            backend.endpoint("table_load").unwrap().as_str(),
            "http://lab:5000/acoustic/table_load"
        );
        assert_eq!(backend.describe(), "http://lab:5000/acoustic");
    }

    #[test]
    fn test_rejects_non_http_urls() {
        assert!(matches!(
            HttpBackend::new("ftp://lab", DEFAULT_TIMEOUT),
            Err(Error::InvalidUrl { .. })
        ));
        assert!(HttpBackend::new("not a url", DEFAULT_TIMEOUT).is_err());
    }

    #[test]
    fn test_parse_save_status_falls_back_to_body_text() {
        assert_eq!(
            parse_save_status(r#"{"status": "success!", "data": []}"#),
            SaveStatus::success()
        );
        assert_eq!(
            parse_save_status("Permission denied\n").status,
            "Permission denied"
        );
    }

    #[tokio::test]
    async fn test_load_fetches_table_load() {
        let (url, server) =
            serve_once("200 OK", r#"{"last_tid": "9", "data": [{"testid": "9"}]}"#).await;
        let backend = HttpBackend::new(&url, DEFAULT_TIMEOUT).unwrap();

        let doc = backend.load().await.unwrap();

        assert_eq!(doc.last_tid, 9);
        assert_eq!(doc.data.len(), 1);
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /table_load HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_save_posts_whole_document() {
        let (url, server) = serve_once("200 OK", r#"{"status": "success!"}"#).await;
        let backend = HttpBackend::new(&url, DEFAULT_TIMEOUT).unwrap();
        let doc = SettingsDocument {
            last_tid: 3,
            ..Default::default()
        };

        let status = backend.save(&doc).await.unwrap();

        assert_eq!(status.status, "success!");
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /table_save HTTP/1.1"));
        assert!(request.contains(r#""last_tid":3"#));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let (url, server) = serve_once("500 Internal Server Error", "boom").await;
        let backend = HttpBackend::new(&url, DEFAULT_TIMEOUT).unwrap();

        let err = backend.save(&SettingsDocument::default()).await.unwrap_err();

        assert!(matches!(err, Error::BackendStatus { status: 500, .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_test_posts_rowid_under_day() {
        let (url, server) = serve_once("200 OK", "{}").await;
        let backend = HttpBackend::new(&url, DEFAULT_TIMEOUT).unwrap();
        let date = LogDate::parse("10/19/2026").unwrap();

        backend.delete_test(date, 42).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /10/19/2026/del_test HTTP/1.1"));
        assert!(request.contains(r#"{"rowid":"42"}"#));
    }

    #[tokio::test]
    async fn test_load_log_uses_day_prefix() {
        let (url, server) = serve_once("200 OK", r#"{"data": {"4": {"testid": "4"}}}"#).await;
        let backend = HttpBackend::new(&url, DEFAULT_TIMEOUT).unwrap();
        let date = LogDate::parse("3/7/2025").unwrap();

        let doc = backend.load_log(date).await.unwrap();

        assert_eq!(doc.data.len(), 1);
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /03/07/2025/table_load HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_recoverable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let backend = HttpBackend::new(&url, Duration::from_millis(500)).unwrap();

        let err = backend.load().await.unwrap_err();

        assert!(err.is_recoverable());
    }
}
