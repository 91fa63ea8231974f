use std::path::Path;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};

use crate::{Error, Res, config::WebDavConfig};

use super::response::parse_multistatus;

const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:"><d:prop><d:resourcetype/></d:prop></d:propfind>"#;

/// Minimal WebDAV client: flat directory listing and file upload.
#[derive(Debug, Clone)]
pub struct WebDavClient {
    http: Client,
    config: WebDavConfig,
}

impl WebDavClient {
    pub fn new(config: WebDavConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// The configured remote directory.
    pub fn root(&self) -> &str {
        &self.config.webdav_path
    }

    /// Remote path a local file named `filename` is uploaded to.
    pub fn remote_path_for(&self, filename: &str) -> String {
        let dir = &self.config.webdav_path;
        if dir.ends_with('/') {
            format!("{dir}{filename}")
        } else {
            format!("{dir}/{filename}")
        }
    }

    /// Names of the entries directly inside `path`.
    ///
    /// Collections keep a trailing `/`; the directory itself is left out.
    pub async fn list(&self, path: &str) -> Res<Vec<String>> {
        let url = self.url_for(path);
        let method = Method::from_bytes(b"PROPFIND")
            .map_err(|e| Error::WebDav(format!("invalid method: {e}")))?;

        let req = self
            .request(method, &url)
            .header("Depth", "1")
            .header("Content-Type", "application/xml; charset=utf-8")
            .body(PROPFIND_BODY);
        let xml = execute(req).await?.text().await?;

        let own_path = href_path(&url);
        let names = parse_multistatus(&xml)?
            .into_iter()
            .filter_map(|entry| {
                let path = href_path(&entry.href);
                if path.trim_end_matches('/') == own_path.trim_end_matches('/') {
                    return None;
                }
                let name = path.trim_end_matches('/').rsplit('/').next()?.to_string();
                if name.is_empty() {
                    None
                } else if entry.is_collection {
                    Some(format!("{name}/"))
                } else {
                    Some(name)
                }
            })
            .collect();

        Ok(names)
    }

    /// Uploads `local_path` to `remote_path`, replacing any existing file.
    pub async fn upload(&self, remote_path: &str, local_path: &Path) -> Res<()> {
        let bytes = async_fs::read(local_path).await?;
        let url = self.url_for(remote_path);
        execute(self.request(Method::PUT, &url).body(bytes)).await?;
        Ok(())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.config.webdav_login, Some(&self.config.webdav_password))
    }

    fn url_for(&self, path: &str) -> String {
        let encoded = path
            .trim_start_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/{}",
            self.config.webdav_hostname.trim_end_matches('/'),
            encoded
        )
    }
}

async fn execute(req: RequestBuilder) -> Res<Response> {
    let res = req.send().await?;

    match res.status() {
        StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT | StatusCode::MULTI_STATUS => {
            Ok(res)
        }
        status => {
            let text = res
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            Err(Error::WebDav(format!("{status}: {text}")))
        }
    }
}

/// Decoded path part of an href, which servers send either absolute or as a path.
fn href_path(href: &str) -> String {
    let path = match Url::parse(href) {
        Ok(url) => url.path().to_string(),
        Err(_) => href.to_string(),
    };
    urlencoding::decode(&path)
        .map(|p| p.into_owned())
        .unwrap_or(path)
}
