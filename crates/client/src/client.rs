//! Storage service API client.
//!
//! Async HTTP client using `reqwest`. Metadata calls are form-encoded or
//! query-string requests answered with JSON; chunk bytes travel as a
//! multipart upload and a raw-body download.

use chunkvault_protocol::{
    DownloadChunkQuery, FileDescriptor, GetFileQuery, MakeDirectoryQuery, RegisterFileRequest,
    RegisterFileResponse,
};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;

/// Errors from the storage client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
}

/// JSON replies that may carry a service-level `error` message.
trait ServiceReply {
    fn service_error(&self) -> Option<&str>;
}

impl ServiceReply for RegisterFileResponse {
    fn service_error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl ServiceReply for FileDescriptor {
    fn service_error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Storage service API client.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a client for the service described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, base_url })
    }

    /// Service root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Registers a file's metadata. No chunk data is sent.
    ///
    /// A reply without a `fileId` is returned as-is; callers decide what a
    /// missing id means.
    pub async fn register_file(
        &self,
        request: &RegisterFileRequest,
    ) -> Result<RegisterFileResponse, Error> {
        let url = format!("{}/file", self.base_url);
        debug!(name = %request.name, size = request.size, "registering file");
        let resp = self.http.post(&url).form(request).send().await?;
        self.read_reply(resp).await
    }

    /// Looks up a file and its ordered chunk list by exact name.
    pub async fn get_file(&self, file_name: &str) -> Result<FileDescriptor, Error> {
        let url = format!("{}/file", self.base_url);
        let query = GetFileQuery {
            file_name: file_name.to_string(),
        };
        debug!(file_name, "fetching file descriptor");
        let resp = self.http.get(&url).query(&query).send().await?;
        self.read_reply(resp).await
    }

    /// Uploads one chunk's bytes and attaches them to `file_id`.
    ///
    /// `chunk_name` is sent as the part's file name; the service stores it
    /// as the chunk name reported by [`get_file`](Self::get_file).
    pub async fn upload_chunk(
        &self,
        file_id: i64,
        chunk_name: &str,
        data: Vec<u8>,
    ) -> Result<(), Error> {
        let url = format!("{}/", self.base_url);
        let size = data.len();
        let part = Part::bytes(data).file_name(chunk_name.to_string());
        let form = Form::new()
            .text("fileId", file_id.to_string())
            .part("file", part);

        debug!(file_id, chunk_name, size, "uploading chunk");
        let resp = self.http.post(&url).multipart(form).send().await?;
        check_status(resp).await?;
        Ok(())
    }

    /// Downloads one chunk's raw bytes.
    pub async fn download_chunk(&self, chunk_id: i64) -> Result<Vec<u8>, Error> {
        let url = format!("{}/download", self.base_url);
        let query = DownloadChunkQuery { chunk_id };
        debug!(chunk_id, "downloading chunk");
        let resp = self.http.get(&url).query(&query).send().await?;
        let resp = check_status(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    /// Creates a directory on the service and returns its JSON reply.
    pub async fn make_directory(&self, dir_path: &str) -> Result<serde_json::Value, Error> {
        let url = format!("{}/directory", self.base_url);
        let query = MakeDirectoryQuery {
            dir_path: dir_path.to_string(),
        };
        debug!(dir_path, "creating directory");
        let resp = self.http.post(&url).query(&query).send().await?;
        let resp = check_status(resp).await?;
        Ok(serde_json::from_slice(&resp.bytes().await?)?)
    }

    /// Parses a JSON reply.
    ///
    /// Error statuses whose body still parses with an `error` message are
    /// handed back as replies so the message reaches the caller.
    async fn read_reply<T>(&self, resp: reqwest::Response) -> Result<T, Error>
    where
        T: DeserializeOwned + ServiceReply,
    {
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            if let Ok(reply) = serde_json::from_slice::<T>(&body)
                && reply.service_error().is_some()
            {
                return Ok(reply);
            }
            return Err(Error::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Turns a non-success status into [`Error::Api`].
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Reads one full HTTP request (headers plus body) from `stream`.
    async fn read_request(stream: &mut TcpStream) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut tmp = [0u8; 8192];
        loop {
            let n = stream.read(&mut tmp).await.unwrap();
            if n == 0 {
                return buf;
            }
            buf.extend_from_slice(&tmp[..n]);

            let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok());

            match content_length {
                Some(len) if buf.len() >= header_end + 4 + len => return buf,
                Some(_) => {}
                None if head.contains("transfer-encoding: chunked") => {
                    if buf.ends_with(b"0\r\n\r\n") {
                        return buf;
                    }
                }
                None => return buf,
            }
        }
    }

    /// Starts a mock HTTP server that answers one request with `status` and
    /// `body`. The join handle yields the raw request it received.
    async fn mock_server(status: u16, body: &[u8]) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let body = body.to_vec();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;

            let head = format!(
                "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes()).await;
            let _ = stream.write_all(&body).await;
            let _ = stream.shutdown().await;
            request
        });

        (url, handle)
    }

    fn client_for(url: &str) -> Client {
        Client::new(&ClientConfig::with_base_url(url)).unwrap()
    }

    fn request_text(raw: &[u8]) -> String {
        String::from_utf8_lossy(raw).into_owned()
    }

    #[tokio::test]
    async fn register_file_sends_form_and_reads_id() {
        let (url, handle) = mock_server(200, br#"{"fileId":42}"#).await;

        let req = RegisterFileRequest {
            name: "report.pdf".into(),
            mime_type: Some("application/pdf".into()),
            size: 47185920,
            path: Some("~".into()),
        };
        let resp = client_for(&url).register_file(&req).await.unwrap();
        assert_eq!(resp.file_id, Some(42));

        let raw = request_text(&handle.await.unwrap());
        assert!(raw.starts_with("POST /file "));
        assert!(raw.contains("name=report.pdf"));
        assert!(raw.contains("mimeType=application%2Fpdf"));
        assert!(raw.contains("size=47185920"));
        assert!(raw.contains("path=%7E"));
    }

    #[tokio::test]
    async fn register_file_without_path_omits_field() {
        let (url, handle) = mock_server(200, br#"{"fileId":1}"#).await;

        let req = RegisterFileRequest {
            name: "blob".into(),
            mime_type: None,
            size: 3,
            path: None,
        };
        client_for(&url).register_file(&req).await.unwrap();

        let raw = request_text(&handle.await.unwrap());
        assert!(!raw.contains("path="));
        assert!(!raw.contains("mimeType="));
    }

    #[tokio::test]
    async fn register_file_error_body_is_returned() {
        let (url, handle) = mock_server(400, br#"{"error":"directory does not exist"}"#).await;

        let req = RegisterFileRequest {
            name: "a.txt".into(),
            mime_type: None,
            size: 1,
            path: Some("/missing".into()),
        };
        let resp = client_for(&url).register_file(&req).await.unwrap();
        assert!(resp.file_id.is_none());
        assert_eq!(resp.error.as_deref(), Some("directory does not exist"));

        handle.abort();
    }

    #[tokio::test]
    async fn register_file_plain_error_status() {
        let (url, handle) = mock_server(500, b"internal error").await;

        let req = RegisterFileRequest {
            name: "a.txt".into(),
            mime_type: None,
            size: 1,
            path: None,
        };
        let err = client_for(&url).register_file(&req).await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 500, .. }), "got {err}");

        handle.abort();
    }

    #[tokio::test]
    async fn get_file_parses_descriptor() {
        let json = br#"{"fileId":9,"fileName":"notes.txt","chunksIds":[
            {"chunkId":1,"chunkName":"notes.txt_1.bin"},
            {"chunkId":2,"chunkName":"notes.txt_2.bin"}
        ]}"#;
        let (url, handle) = mock_server(200, json).await;

        let desc = client_for(&url).get_file("notes.txt").await.unwrap();
        assert_eq!(desc.file_id, Some(9));
        assert_eq!(desc.chunks.len(), 2);
        assert_eq!(desc.chunks[1].chunk_name, "notes.txt_2.bin");

        let raw = request_text(&handle.await.unwrap());
        assert!(raw.starts_with("GET /file?fileName=notes.txt "));
    }

    #[tokio::test]
    async fn get_file_not_found_passes_message() {
        let (url, handle) = mock_server(404, br#"{"error":"file not found"}"#).await;

        let desc = client_for(&url).get_file("nope.txt").await.unwrap();
        assert!(desc.file_id.is_none());
        assert_eq!(desc.error.as_deref(), Some("file not found"));

        handle.abort();
    }

    #[tokio::test]
    async fn get_file_invalid_json() {
        let (url, handle) = mock_server(200, b"not json").await;
        let err = client_for(&url).get_file("x").await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        handle.abort();
    }

    #[tokio::test]
    async fn upload_chunk_sends_multipart() {
        let (url, handle) = mock_server(200, br#"{"chunkId":5}"#).await;

        client_for(&url)
            .upload_chunk(42, "report.pdf_1.bin", b"CHUNKDATA".to_vec())
            .await
            .unwrap();

        let raw = request_text(&handle.await.unwrap());
        assert!(raw.starts_with("POST / "));
        assert!(raw.to_lowercase().contains("content-type: multipart/form-data"));
        assert!(raw.contains("name=\"fileId\""));
        assert!(raw.contains("\r\n\r\n42\r\n"));
        assert!(raw.contains("name=\"file\"; filename=\"report.pdf_1.bin\""));
        assert!(raw.contains("CHUNKDATA"));
    }

    #[tokio::test]
    async fn upload_chunk_error_status() {
        let (url, handle) = mock_server(413, b"too large").await;

        let err = client_for(&url)
            .upload_chunk(1, "a_1.bin", vec![0u8; 16])
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("413"), "error should mention 413: {msg}");
        assert!(msg.contains("too large"));

        handle.abort();
    }

    #[tokio::test]
    async fn download_chunk_returns_raw_bytes() {
        let payload = [0u8, 159, 146, 150, 255];
        let (url, handle) = mock_server(200, &payload).await;

        let data = client_for(&url).download_chunk(101).await.unwrap();
        assert_eq!(data, payload);

        let raw = request_text(&handle.await.unwrap());
        assert!(raw.starts_with("GET /download?chunkId=101 "));
    }

    #[tokio::test]
    async fn download_chunk_error_status() {
        let (url, handle) = mock_server(404, b"no chunk").await;
        let err = client_for(&url).download_chunk(1).await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 404, .. }));
        handle.abort();
    }

    #[tokio::test]
    async fn make_directory_sends_query() {
        let (url, handle) = mock_server(200, br#"{"directoryId":3,"path":"~/docs"}"#).await;

        let reply = client_for(&url).make_directory("~/docs").await.unwrap();
        assert_eq!(reply["directoryId"], 3);

        let raw = request_text(&handle.await.unwrap());
        assert!(raw.starts_with("POST /directory?dirPath="));
    }

    #[tokio::test]
    async fn connection_refused_is_http_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = client_for(&format!("http://127.0.0.1:{port}"));
        let err = client.download_chunk(1).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }

    #[test]
    fn new_trims_trailing_slash() {
        let client = Client::new(&ClientConfig::with_base_url("http://localhost:8000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn new_rejects_invalid_url() {
        let result = Client::new(&ClientConfig::with_base_url("not a url"));
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn new_with_timeout() {
        let config = ClientConfig {
            timeout_secs: Some(5),
            ..ClientConfig::default()
        };
        assert!(Client::new(&config).is_ok());
    }
}
