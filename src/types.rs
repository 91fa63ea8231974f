use std::path::{Component, Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

/// Persisted authorization state.
///
/// Both fields default to an empty string; any other keys found in the file
/// are kept as they are when the record is written back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub oauth_code: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub refresh_token: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp((self.obtained_at + self.expires_in) as i64, 0)
    }
}

/// Body returned by Google's token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub product_url: Option<String>,
    pub media_items_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub id: String,
    pub filename: String,
    pub base_url: String,
    pub mime_type: Option<String>,
}

impl MediaItem {
    pub fn is_video(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m.starts_with("video/"))
    }
}

/// True when `name` stays a single path segment, both in the scratch
/// directory and below the WebDAV folder.
pub fn is_plain_filename(name: &str) -> bool {
    !name.contains(['/', '\\', '\0'])
        && matches!(
            Path::new(name).components().collect::<Vec<_>>()[..],
            [Component::Normal(_)]
        )
}

/// One page of a listing, already reduced to its valid items.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

/// Raw album entry as sent by the Photos Library API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumEntry {
    #[serde(default)]
    pub id: String,
    pub title: Option<String>,
    pub product_url: Option<String>,
    pub media_items_count: Option<String>,
}

impl AlbumEntry {
    /// Albums without a title are not offered for syncing.
    pub fn into_album(self) -> Option<Album> {
        let title = self.title.filter(|t| !t.is_empty())?;
        Some(Album {
            id: self.id,
            title,
            product_url: self.product_url,
            media_items_count: self
                .media_items_count
                .and_then(|c| c.parse().ok())
                .unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemEntry {
    #[serde(default)]
    pub id: String,
    pub filename: Option<String>,
    #[serde(default)]
    pub base_url: String,
    pub mime_type: Option<String>,
}

impl MediaItemEntry {
    /// Items without a usable filename are skipped, including names that
    /// would leave the target directory.
    pub fn into_media_item(self) -> Option<MediaItem> {
        let filename = self.filename.filter(|f| is_plain_filename(f))?;
        Some(MediaItem {
            id: self.id,
            filename,
            base_url: self.base_url,
            mime_type: self.mime_type,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAlbumsResponse {
    #[serde(default)]
    pub albums: Vec<AlbumEntry>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSharedAlbumsResponse {
    #[serde(default)]
    pub shared_albums: Vec<AlbumEntry>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMediaItemsResponse {
    #[serde(default)]
    pub media_items: Vec<MediaItemEntry>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMediaItemsRequest {
    pub album_id: String,
    pub page_size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Tabled)]
pub struct AlbumTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub title: String,
    pub items: u64,
}
