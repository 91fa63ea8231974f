use std::{
    future::Future,
    path::{Path, PathBuf},
};

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{
    Error, Res,
    config::GoogleEndpoints,
    types::{
        Album, ListAlbumsResponse, ListSharedAlbumsResponse, MediaItem, Page,
        SearchMediaItemsRequest, SearchMediaItemsResponse, is_plain_filename,
    },
};

pub const MEDIA_PAGE_SIZE: u32 = 100;

/// Client for the Photos Library REST API.
///
/// The access token travels as the `access_token` query parameter on every
/// request, including media downloads.
pub struct PhotosClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl PhotosClient {
    pub fn new(access_token: impl Into<String>, endpoints: &GoogleEndpoints) -> Self {
        Self {
            http: Client::new(),
            api_url: endpoints.photos_api_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Lists albums owned by the account.
    pub async fn list_albums(&self, page_token: Option<String>) -> Res<Page<Album>> {
        let res: ListAlbumsResponse = self.get_page("v1/albums", page_token).await?;
        Ok(Page {
            items: res.albums.into_iter().filter_map(|a| a.into_album()).collect(),
            next_page_token: res.next_page_token,
        })
    }

    /// Lists albums other owners shared with the account.
    pub async fn list_shared_albums(&self, page_token: Option<String>) -> Res<Page<Album>> {
        let res: ListSharedAlbumsResponse = self.get_page("v1/sharedAlbums", page_token).await?;
        Ok(Page {
            items: res
                .shared_albums
                .into_iter()
                .filter_map(|a| a.into_album())
                .collect(),
            next_page_token: res.next_page_token,
        })
    }

    /// Lists media of one album, [`MEDIA_PAGE_SIZE`] entries per request.
    pub async fn list_album_media(
        &self,
        album_id: &str,
        page_token: Option<String>,
    ) -> Res<Page<MediaItem>> {
        let endpoint = self.endpoint("v1/mediaItems:search");
        let body = SearchMediaItemsRequest {
            album_id: album_id.to_string(),
            page_size: MEDIA_PAGE_SIZE.to_string(),
            page_token,
        };

        let req = self.authorized(self.http.post(&endpoint)).json(&body);
        let res: SearchMediaItemsResponse = check_status(&endpoint, req.send().await?)
            .await?
            .json()
            .await?;

        Ok(Page {
            items: res
                .media_items
                .into_iter()
                .filter_map(|m| m.into_media_item())
                .collect(),
            next_page_token: res.next_page_token,
        })
    }

    /// Downloads the original bytes of `item` into `dir/<filename>`.
    ///
    /// An existing file of the same name is overwritten. Filenames that are
    /// not a single path segment are refused before anything is fetched.
    pub async fn download_media(&self, item: &MediaItem, dir: &Path) -> Res<PathBuf> {
        if !is_plain_filename(&item.filename) {
            return Err(Error::UnsafeFilename(item.filename.clone()));
        }

        let suffix = if item.is_video() { "=dv" } else { "=d" };
        let url = format!("{}{}", item.base_url, suffix);

        let res = check_status(&url, self.authorized(self.http.get(&url)).send().await?).await?;
        let bytes = res.bytes().await?;

        let path = dir.join(&item.filename);
        async_fs::write(&path, &bytes).await?;
        Ok(path)
    }

    async fn get_page<R: DeserializeOwned>(
        &self,
        path: &str,
        page_token: Option<String>,
    ) -> Res<R> {
        let endpoint = self.endpoint(path);
        let mut req = self.authorized(self.http.get(&endpoint));
        if let Some(token) = page_token.filter(|t| !t.is_empty()) {
            req = req.query(&[("pageToken", token)]);
        }

        Ok(check_status(&endpoint, req.send().await?)
            .await?
            .json()
            .await?)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.query(&[("access_token", self.access_token.as_str())])
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }
}

async fn check_status(endpoint: &str, res: Response) -> Res<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    Err(Error::Api {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body: res.text().await.unwrap_or_default(),
    })
}

/// Follows continuation tokens until the listing is exhausted.
///
/// `fetch` receives `None` for the first page and the previous page's token
/// afterwards. An absent or empty token ends the loop.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Res<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Res<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page_token = None;

    loop {
        let page = fetch(page_token.take()).await?;
        items.extend(page.items);

        match page.next_page_token.filter(|t| !t.is_empty()) {
            Some(next) => page_token = Some(next),
            None => return Ok(items),
        }
    }
}
