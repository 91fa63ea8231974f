//! Configuration management for albumdav.
//!
//! Settings come from three places, in this order of priority:
//! 1. Environment variables (optionally loaded from a `.env` file)
//! 2. The two operator-provided JSON files (Google OAuth client and WebDAV target)
//! 3. Built-in defaults
//!
//! The `.env` file is looked up in the platform data directory
//! (`~/.local/share/albumdav/.env` on Linux) and then in the working directory.
//! Both are optional.

use std::{
    env, io,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, de::DeserializeOwned};

use crate::{Error, Res};

pub const DEFAULT_TOKEN_PATH: &str = "token.json";
pub const DEFAULT_OAUTH_CONFIG_PATH: &str = "googla_oauth_config.json";
pub const DEFAULT_WEBDAV_CONFIG_PATH: &str = "webdav_config.json";
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";

const DEFAULT_CALLBACK_ADDR: &str = "127.0.0.1:9527";
const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 300;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://www.googleapis.com/oauth2/v3/token";
const PHOTOS_API_URL: &str = "https://photoslibrary.googleapis.com/";

pub const PHOTOS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/photoslibrary.readonly";
pub const CALLBACK_PATH: &str = "/auth/google/callback";

/// Loads environment variables from optional `.env` files.
///
/// The data directory copy is read first so that a `.env` in the working
/// directory cannot override it. Missing files are not an error.
pub fn load_env() -> Res<()> {
    let mut path = data_dir();
    path.push(".env");
    load_env_file(&path)?;
    load_env_file(Path::new(".env"))
}

/// Loads a single `.env` file, skipping it when it does not exist.
pub fn load_env_file(path: &Path) -> Res<()> {
    match dotenv::from_path(path) {
        Err(dotenv::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        res => res.map_err(|e| Error::config(path, e)),
    }
}

/// Platform data directory for albumdav, e.g. `~/.local/share/albumdav`.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("albumdav");
    path
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub fn token_path() -> PathBuf {
    PathBuf::from(env_or("ALBUMDAV_TOKEN_PATH", DEFAULT_TOKEN_PATH))
}

pub fn oauth_config_path() -> PathBuf {
    PathBuf::from(env_or("ALBUMDAV_OAUTH_CONFIG", DEFAULT_OAUTH_CONFIG_PATH))
}

pub fn webdav_config_path() -> PathBuf {
    PathBuf::from(env_or("ALBUMDAV_WEBDAV_CONFIG", DEFAULT_WEBDAV_CONFIG_PATH))
}

/// Address the OAuth callback listener binds to.
pub fn callback_addr() -> Res<SocketAddr> {
    let raw = env_or("ALBUMDAV_CALLBACK_ADDR", DEFAULT_CALLBACK_ADDR);
    raw.parse()
        .map_err(|e| Error::config("ALBUMDAV_CALLBACK_ADDR", format!("{raw}: {e}")))
}

/// How long the first-time authorization waits for the browser redirect.
pub fn callback_timeout() -> Duration {
    let secs = env::var("ALBUMDAV_CALLBACK_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CALLBACK_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// The redirect URI registered with Google for a given callback port.
pub fn redirect_uri(port: u16) -> String {
    format!("http://localhost:{port}{CALLBACK_PATH}")
}

/// Google endpoints used by the authorizer and the Photos client.
///
/// Production code uses [`GoogleEndpoints::from_env`]; tests point every
/// field at a mock server.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub auth_url: String,
    pub token_url: String,
    pub photos_api_url: String,
}

impl GoogleEndpoints {
    pub fn from_env() -> Self {
        Self {
            auth_url: env_or("ALBUMDAV_GOOGLE_AUTH_URL", GOOGLE_AUTH_URL),
            token_url: env_or("ALBUMDAV_GOOGLE_TOKEN_URL", GOOGLE_TOKEN_URL),
            photos_api_url: env_or("ALBUMDAV_PHOTOS_API_URL", PHOTOS_API_URL),
        }
    }
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            photos_api_url: PHOTOS_API_URL.to_string(),
        }
    }
}

/// OAuth client credentials issued by the Google Cloud console.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// Connection settings of the WebDAV target.
#[derive(Debug, Clone, Deserialize)]
pub struct WebDavConfig {
    pub webdav_hostname: String,
    pub webdav_login: String,
    pub webdav_password: String,
    pub webdav_path: String,
}

impl OAuthConfig {
    pub async fn load(path: &Path) -> Res<Self> {
        load_json(path).await
    }
}

impl WebDavConfig {
    pub async fn load(path: &Path) -> Res<Self> {
        load_json(path).await
    }
}

async fn load_json<T: DeserializeOwned>(path: &Path) -> Res<T> {
    let content = async_fs::read_to_string(path)
        .await
        .map_err(|e| Error::config(path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::config(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_uri_uses_callback_route() {
        assert_eq!(
            redirect_uri(9527),
            "http://localhost:9527/auth/google/callback"
        );
    }

    #[test]
    fn missing_env_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_file(&dir.path().join(".env")).is_ok());
    }

    #[test]
    fn malformed_env_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "this line has no assignment\n").unwrap();

        let err = load_env_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains(".env"));
    }

    #[tokio::test]
    async fn webdav_config_parses_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("webdav_config.json");
        std::fs::write(
            &path,
            r#"{"webdav_hostname": "https://dav.example.com", "webdav_login": "me",
                "webdav_password": "secret", "webdav_path": "/photos/"}"#,
        )
        .unwrap();

        let config = WebDavConfig::load(&path).await.unwrap();
        assert_eq!(config.webdav_hostname, "https://dav.example.com");
        assert_eq!(config.webdav_path, "/photos/");
    }

    #[tokio::test]
    async fn missing_config_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("googla_oauth_config.json");

        let err = OAuthConfig::load(&path).await.unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("googla_oauth_config.json"));
    }

    #[tokio::test]
    async fn malformed_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("googla_oauth_config.json");
        std::fs::write(&path, r#"{"client_id": "abc"}"#).unwrap();

        assert!(OAuthConfig::load(&path).await.is_err());
    }
}
