#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use contacts_cli::api::{ApiError, CommitRequest, CommitResult, PreparedImport};
use contacts_cli::import::{ImportApi, SelectedFile};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// In-memory import backend with scripted responses
#[derive(Default)]
pub struct FakeImportApi {
    prepare_responses: Mutex<VecDeque<Result<PreparedImport, ApiError>>>,
    commit_responses: Mutex<VecDeque<Result<CommitResult, ApiError>>>,
    prepare_calls: AtomicUsize,
    commit_requests: Mutex<Vec<CommitRequest>>,
}

impl FakeImportApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_prepare(self, response: Result<PreparedImport, ApiError>) -> Self {
        self.prepare_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn on_commit(self, response: Result<CommitResult, ApiError>) -> Self {
        self.commit_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn prepare_calls(&self) -> usize {
        self.prepare_calls.load(Ordering::SeqCst)
    }

    pub fn commit_requests(&self) -> Vec<CommitRequest> {
        self.commit_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImportApi for FakeImportApi {
    async fn prepare_import(&self, _file: &SelectedFile) -> Result<PreparedImport, ApiError> {
        self.prepare_calls.fetch_add(1, Ordering::SeqCst);
        self.prepare_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted prepare response".to_string())))
    }

    async fn commit_import(&self, request: &CommitRequest) -> Result<CommitResult, ApiError> {
        self.commit_requests.lock().unwrap().push(request.clone());
        self.commit_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted commit response".to_string())))
    }
}

pub fn prepared(import_id: &str, total_rows: u64, headers: &[&str]) -> PreparedImport {
    PreparedImport {
        import_id: import_id.to_string(),
        total_rows,
        headers: headers.iter().map(|h| h.to_string()).collect(),
    }
}

pub fn committed(inserted: u64, updated: u64, skipped: u64) -> CommitResult {
    CommitResult {
        inserted_count: inserted,
        updated_count: updated,
        skipped_count: skipped,
        errors: Vec::new(),
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

fn request_complete(buf: &[u8]) -> bool {
    let Some(header_end) = find_header_end(buf) else {
        return false;
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let body = &buf[header_end..];

    if let Some(line) = head.lines().find(|l| l.starts_with("content-length:")) {
        let length: usize = line["content-length:".len()..].trim().parse().unwrap_or(0);
        return body.len() >= length;
    }
    if head.contains("transfer-encoding: chunked") {
        return body.ends_with(b"0\r\n\r\n");
    }
    true
}

/// Serve exactly one HTTP request with a canned response.
///
/// Returns the base URL and a handle resolving to the raw request text.
pub async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        while !request_complete(&buf) {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();

        String::from_utf8_lossy(&buf).into_owned()
    });

    (base_url, handle)
}

/// Accept one connection and never answer
pub async fn serve_silence() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    });

    (base_url, handle)
}
