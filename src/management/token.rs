use std::path::{Path, PathBuf};

use crate::{Res, types::TokenRecord};

/// File-backed store for the OAuth code and refresh token.
///
/// Every call reads the file again; writes merge into whatever is on disk.
/// There is no locking, the last writer wins.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load_oauth_code(&self) -> Res<String> {
        Ok(self.load().await?.oauth_code)
    }

    pub async fn save_oauth_code(&self, oauth_code: &str) -> Res<()> {
        let mut record = self.load().await?;
        record.oauth_code = oauth_code.to_string();
        self.persist(&record).await
    }

    pub async fn load_refresh_token(&self) -> Res<String> {
        Ok(self.load().await?.refresh_token)
    }

    pub async fn save_refresh_token(&self, refresh_token: &str) -> Res<()> {
        let mut record = self.load().await?;
        record.refresh_token = refresh_token.to_string();
        self.persist(&record).await
    }

    /// Reads the record, treating a missing file as an empty one.
    async fn load(&self) -> Res<TokenRecord> {
        if !self.path.is_file() {
            return Ok(TokenRecord::default());
        }
        let content = async_fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn persist(&self, record: &TokenRecord) -> Res<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(record)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}
