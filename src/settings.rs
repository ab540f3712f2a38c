//! Endpoint and client settings.
//!
//! Defaults point at the production P3d.in service. Each value can be
//! overridden at runtime through an environment variable, which is how the
//! tests and local development reach a mock server.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TOKEN_URL: &str = "https://p3d.in/o/token/";
pub const DEFAULT_UPLOAD_URL: &str = "https://uploadsrv.p3d.in";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://p3d.in/o/authorize/";
pub const CLIENT_ID: &str = "kr4V9FRckMQdxlkB0eJo0EY0ka42gO2TO4XXnahZ";
pub const REDIRECT_URI: &str = "https://blender-addon.web.app";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Snapshot sent when no thumbnail override is configured
pub const DEFAULT_THUMBNAIL: &[u8] = include_bytes!("../assets/thumb.png");
pub const DEFAULT_THUMBNAIL_NAME: &str = "thumb.png";

#[derive(Debug, Clone)]
pub struct Settings {
    pub token_url: String,
    pub upload_url: String,
    pub authorize_url: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub request_timeout: Duration,
    /// Snapshot image sent along with every model, the bundled
    /// [`DEFAULT_THUMBNAIL`] when unset
    pub thumbnail_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            client_id: CLIENT_ID.to_string(),
            redirect_uri: REDIRECT_URI.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            thumbnail_path: None,
        }
    }
}

impl Settings {
    /// Build settings from defaults plus environment overrides.
    ///
    /// Priority: runtime env var > compile-time env var > production default
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Some(url) = env_override("P3D_TOKEN_URL", option_env!("P3D_TOKEN_URL")) {
            settings.token_url = url;
        }
        if let Some(url) = env_override("P3D_UPLOAD_URL", option_env!("P3D_UPLOAD_URL")) {
            settings.upload_url = url;
        }
        if let Some(secs) = env::var("P3D_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(path) = env::var("P3D_THUMBNAIL_PATH").ok().filter(|p| !p.trim().is_empty()) {
            settings.thumbnail_path = Some(PathBuf::from(path));
        }

        settings
    }

    /// HTTP client shared by the token and upload calls
    pub fn http_client(&self) -> reqwest::Client {
        let user_agent = format!("P3dUploader/{}", env!("CARGO_PKG_VERSION"));

        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .user_agent(&user_agent)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            })
    }

    /// Browser URL where the user grants access and receives an authorization code
    pub fn authorize_url(&self) -> Result<String, String> {
        let mut url = reqwest::Url::parse(&self.authorize_url)
            .map_err(|e| format!("Invalid authorize URL: {}", e))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri);
        Ok(url.into())
    }
}

fn env_override(name: &str, compiled: Option<&'static str>) -> Option<String> {
    env::var(name)
        .ok()
        .or_else(|| compiled.map(String::from))
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let settings = Settings::default();
        assert_eq!(settings.token_url, "https://p3d.in/o/token/");
        assert_eq!(settings.upload_url, "https://uploadsrv.p3d.in");
        assert_eq!(settings.request_timeout, Duration::from_secs(60));
        assert!(settings.thumbnail_path.is_none());
    }

    #[test]
    fn test_bundled_thumbnail_is_png() {
        assert!(DEFAULT_THUMBNAIL.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[tokio::test]
    async fn test_http_client_sends_user_agent() {
        let mut harness = crate::test_harness::TestHarness::new().await;
        let mock = harness
            .mock_upload_any()
            .match_header("user-agent", format!("P3dUploader/{}", env!("CARGO_PKG_VERSION")).as_str())
            .with_status(200)
            .create_async()
            .await;

        let response = Settings::default()
            .http_client()
            .post(harness.upload_url())
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        mock.assert_async().await;
    }

    #[test]
    fn test_authorize_url_formatting() {
        let url = Settings::default().authorize_url().unwrap();
        assert_eq!(
            url,
            "https://p3d.in/o/authorize/?client_id=kr4V9FRckMQdxlkB0eJo0EY0ka42gO2TO4XXnahZ&response_type=code&redirect_uri=https%3A%2F%2Fblender-addon.web.app"
        );
    }

    #[test]
    fn test_authorize_url_rejects_garbage() {
        let settings = Settings {
            authorize_url: "not a url".to_string(),
            ..Settings::default()
        };
        assert!(settings.authorize_url().is_err());
    }

    #[test]
    fn test_env_override_ignores_blank() {
        assert_eq!(env_override("P3D_TEST_UNSET_VARIABLE", Some("  ")), None);
        assert_eq!(
            env_override("P3D_TEST_UNSET_VARIABLE", Some("http://localhost:3000")),
            Some("http://localhost:3000".to_string())
        );
    }
}
