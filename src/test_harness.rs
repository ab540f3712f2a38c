//! Test harness for mock P3d.in servers
//!
//! Provides a mockito server standing in for both the token endpoint and
//! the upload endpoint, so tests never need the real service.

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const TOKEN_PATH: &str = "/o/token/";
pub const UPLOAD_PATH: &str = "/upload";

pub struct TestHarness {
    pub server: ServerGuard,
}

impl TestHarness {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        Self { server }
    }

    pub fn token_url(&self) -> String {
        format!("{}{}", self.server.url(), TOKEN_PATH)
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.server.url(), UPLOAD_PATH)
    }

    /// Unconfigured token endpoint mock; caller finishes and creates it
    pub fn mock_token_any(&mut self) -> Mock {
        self.server.mock("POST", TOKEN_PATH)
    }

    /// Token endpoint answering a specific grant type with a fresh bundle
    pub async fn mock_token_success(
        &mut self,
        grant_type: &str,
        access_token: &str,
        refresh_token: &str,
        expires_in: u64,
    ) -> Mock {
        self.server.mock("POST", TOKEN_PATH)
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), grant_type.into()),
                Matcher::UrlEncoded("client_id".into(), crate::settings::CLIENT_ID.into()),
                Matcher::UrlEncoded("redirect_uri".into(), crate::settings::REDIRECT_URI.into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(token_body(access_token, refresh_token, expires_in))
            .create_async()
            .await
    }

    /// Token endpoint expecting a refresh grant for `expected_refresh`
    pub async fn mock_token_refresh(
        &mut self,
        expected_refresh: &str,
        access_token: &str,
        refresh_token: &str,
        expires_in: u64,
    ) -> Mock {
        self.server.mock("POST", TOKEN_PATH)
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
                Matcher::UrlEncoded("refresh_token".into(), expected_refresh.into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(token_body(access_token, refresh_token, expires_in))
            .create_async()
            .await
    }

    /// Authorization-code exchange whose response body arrives after
    /// `delay`; caller sets expectations and creates it
    pub fn mock_token_slow(
        &mut self,
        access_token: &str,
        refresh_token: &str,
        expires_in: u64,
        delay: Duration,
    ) -> Mock {
        let body = token_body(access_token, refresh_token, expires_in);
        self.server.mock("POST", TOKEN_PATH)
            .match_body(Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_chunked_body(move |w| {
                std::thread::sleep(delay);
                w.write_all(body.as_bytes())
            })
    }

    pub async fn mock_token_failure(&mut self, status: usize, body: &str) -> Mock {
        self.server.mock("POST", TOKEN_PATH)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Unconfigured upload endpoint mock; caller finishes and creates it
    pub fn mock_upload_any(&mut self) -> Mock {
        self.server.mock("POST", UPLOAD_PATH)
    }

    /// Upload endpoint accepting a well-formed multipart request
    pub async fn mock_upload_success(&mut self, access_token: &str) -> Mock {
        self.server.mock("POST", UPLOAD_PATH)
            .match_header("authorization", format!("Bearer {}", access_token).as_str())
            .match_header("content-type", Matcher::Regex("^multipart/form-data; boundary=".to_string()))
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="model"; filename="#.to_string()),
                Matcher::Regex(r#"name="snapshot"; filename="#.to_string()),
                Matcher::Regex(r#"name="model_info""#.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "status": "ok" }).to_string())
            .create_async()
            .await
    }

    pub async fn mock_upload_status(&mut self, status: usize, body: &str) -> Mock {
        self.server.mock("POST", UPLOAD_PATH)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await
    }
}

fn token_body(access_token: &str, refresh_token: &str, expires_in: u64) -> String {
    json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "expires_in": expires_in,
        "token_type": "Bearer",
        "scope": "read write"
    })
    .to_string()
}

/// Write a small stand-in model file
pub fn create_test_model(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"glTF fake binary model").unwrap();
    path
}

/// Write a stand-in thumbnail
pub fn create_test_thumbnail(dir: &Path) -> PathBuf {
    let path = dir.join("thumb.png");
    fs::write(&path, b"fake png bytes").unwrap();
    path
}
