//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use profile_intake::api::ApiClient;
use profile_intake::config::ApiConfig;
use profile_intake::form::{ImageFile, ProfileDraft};
use profile_intake::preprocess::{CompressionOptions, ImagePreprocessor, PreprocessError};
use profile_intake::store::{MemoryStore, RecordStore};
use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Find an available port for testing.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to free port");
    listener.local_addr().unwrap().port()
}

/// Create a temporary config file with the given TOML content.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Wait for a server to become available.
pub async fn wait_for_server(addr: SocketAddr, timeout: Duration) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

pub fn api_client(base_url: &str) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
    })
    .expect("Failed to build client")
}

pub fn memory_records() -> RecordStore {
    RecordStore::new(Arc::new(MemoryStore::new()))
}

/// Never decoded: tests that compress real pixels use the image crate directly.
pub fn png_file() -> ImageFile {
    ImageFile::new("avatar.png", "image/png", b"\x89PNG\r\n\x1a\nstub".to_vec())
}

pub fn valid_draft() -> ProfileDraft {
    ProfileDraft {
        email: "a@gmail.com".to_string(),
        name: "Bob".to_string(),
        age: "29".to_string(),
        role: "developer".to_string(),
        company: "Google".to_string(),
        image: Some(png_file()),
    }
}

/// Preprocessor that passes the file through and counts calls.
#[derive(Default)]
pub struct CountingPreprocessor {
    calls: AtomicUsize,
}

impl CountingPreprocessor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImagePreprocessor for CountingPreprocessor {
    fn process(
        &self,
        file: ImageFile,
        _options: &CompressionOptions,
    ) -> Result<ImageFile, PreprocessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ImageFile::new("avatar.jpg", "image/jpeg", file.into_bytes()))
    }
}

/// Preprocessor that always fails.
pub struct FailingPreprocessor;

impl ImagePreprocessor for FailingPreprocessor {
    fn process(
        &self,
        _file: ImageFile,
        _options: &CompressionOptions,
    ) -> Result<ImageFile, PreprocessError> {
        Err(PreprocessError::Task("boom".to_string()))
    }
}

pub fn inline_options() -> CompressionOptions {
    CompressionOptions {
        use_background_thread: false,
        ..CompressionOptions::default()
    }
}
