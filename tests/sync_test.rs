//! End-to-end sync runs against mocked Photos and WebDAV servers.

use std::io::Cursor;
use std::path::PathBuf;

use albumdav::cli::{SyncOptions, run};
use albumdav::config::{GoogleEndpoints, WebDavConfig};
use albumdav::google::photos::PhotosClient;
use albumdav::webdav::WebDavClient;
use albumdav::Error;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Fixture {
    google: MockServer,
    dav: MockServer,
    scratch: tempfile::TempDir,
}

impl Fixture {
    async fn new() -> Self {
        Self {
            google: MockServer::start().await,
            dav: MockServer::start().await,
            scratch: tempfile::tempdir().unwrap(),
        }
    }

    fn photos(&self) -> PhotosClient {
        let endpoints = GoogleEndpoints {
            photos_api_url: self.google.uri(),
            ..Default::default()
        };
        PhotosClient::new("ya29.token", &endpoints)
    }

    fn webdav(&self) -> WebDavClient {
        WebDavClient::new(WebDavConfig {
            webdav_hostname: self.dav.uri(),
            webdav_login: "me".to_string(),
            webdav_password: "secret".to_string(),
            webdav_path: "/Photos/".to_string(),
        })
    }

    fn options(&self, dry_run: bool, album: Option<usize>) -> SyncOptions {
        SyncOptions {
            dry_run,
            album,
            download_dir: self.download_dir(),
        }
    }

    fn download_dir(&self) -> PathBuf {
        self.scratch.path().join("downloads")
    }

    async fn shared_albums(&self, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/v1/sharedAlbums"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.google)
            .await;
    }

    async fn album_media(&self) {
        let base = self.google.uri();
        Mock::given(method("POST"))
            .and(path("/v1/mediaItems:search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "mediaItems": [
                    {"id": "m1", "filename": "a.jpg", "baseUrl": format!("{base}/media/a"), "mimeType": "image/jpeg"},
                    {"id": "m2", "filename": "b.jpg", "baseUrl": format!("{base}/media/b"), "mimeType": "image/jpeg"},
                    {"id": "m3", "baseUrl": format!("{base}/media/c")}
                ]
            })))
            .mount(&self.google)
            .await;

        for name in ["a", "b"] {
            Mock::given(method("GET"))
                .and(path(format!("/media/{name}=d")))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(name.as_bytes().to_vec()))
                .mount(&self.google)
                .await;
        }
    }

    async fn remote_listing(&self, names: &[&str]) {
        let mut xml = String::from(
            r#"<?xml version="1.0"?><d:multistatus xmlns:d="DAV:"><d:response><d:href>/Photos/</d:href><d:propstat><d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop></d:propstat></d:response>"#,
        );
        for name in names {
            xml.push_str(&format!(
                "<d:response><d:href>/Photos/{name}</d:href><d:propstat><d:prop><d:resourcetype/></d:prop></d:propstat></d:response>"
            ));
        }
        xml.push_str("</d:multistatus>");

        Mock::given(method("PROPFIND"))
            .and(path("/Photos/"))
            .respond_with(ResponseTemplate::new(207).set_body_raw(xml, "application/xml"))
            .mount(&self.dav)
            .await;
    }
}

fn two_albums() -> serde_json::Value {
    json!({
        "sharedAlbums": [
            {"id": "a1", "title": "Holiday"},
            {"id": "a2", "title": "Wedding"}
        ]
    })
}

#[tokio::test]
async fn uploads_only_missing_files() {
    let fx = Fixture::new().await;
    fx.shared_albums(two_albums()).await;
    fx.album_media().await;
    fx.remote_listing(&["a.jpg"]).await;

    Mock::given(method("PUT"))
        .and(path("/Photos/b.jpg"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&fx.dav)
        .await;
    Mock::given(method("PUT"))
        .and(path("/Photos/a.jpg"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&fx.dav)
        .await;

    let mut input = Cursor::new("2\n");
    let mut output = Vec::new();
    let report = run(
        &fx.photos(),
        &fx.webdav(),
        &fx.options(false, None),
        &mut input,
        &mut output,
    )
    .await
    .unwrap();

    assert_eq!(report.album.as_deref(), Some("Wedding"));
    assert_eq!(report.media_count, 2);
    assert_eq!(report.missing, vec!["b.jpg"]);
    assert_eq!(report.uploaded, 1);

    // scratch copy is removed after upload
    assert!(!fx.download_dir().join("b.jpg").exists());
}

#[tokio::test]
async fn second_run_uploads_nothing() {
    let fx = Fixture::new().await;
    fx.shared_albums(two_albums()).await;
    fx.album_media().await;
    fx.remote_listing(&["a.jpg", "b.jpg"]).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&fx.dav)
        .await;

    let report = run(
        &fx.photos(),
        &fx.webdav(),
        &fx.options(false, Some(1)),
        &mut Cursor::new(""),
        &mut Vec::new(),
    )
    .await
    .unwrap();

    assert!(report.missing.is_empty());
    assert_eq!(report.uploaded, 0);
}

#[tokio::test]
async fn dry_run_transfers_nothing() {
    let fx = Fixture::new().await;
    fx.shared_albums(two_albums()).await;
    fx.album_media().await;
    fx.remote_listing(&[]).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&fx.dav)
        .await;

    let report = run(
        &fx.photos(),
        &fx.webdav(),
        &fx.options(true, Some(1)),
        &mut Cursor::new(""),
        &mut Vec::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.missing, vec!["a.jpg", "b.jpg"]);
    assert_eq!(report.uploaded, 0);
    assert!(!fx.download_dir().exists());
}

#[tokio::test]
async fn no_shared_albums_returns_without_prompting() {
    let fx = Fixture::new().await;
    fx.shared_albums(json!({})).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&fx.google)
        .await;

    let mut output = Vec::new();
    let report = run(
        &fx.photos(),
        &fx.webdav(),
        &fx.options(false, None),
        &mut Cursor::new("1\n"),
        &mut output,
    )
    .await
    .unwrap();

    assert!(report.album.is_none());
    assert!(output.is_empty());
}

#[tokio::test]
async fn preselected_album_out_of_range_is_an_error() {
    let fx = Fixture::new().await;
    fx.shared_albums(two_albums()).await;

    let err = run(
        &fx.photos(),
        &fx.webdav(),
        &fx.options(false, Some(3)),
        &mut Cursor::new(""),
        &mut Vec::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::OutOfRange { index: 3, count: 2 }));
}

#[tokio::test]
async fn failed_upload_aborts_the_run() {
    let fx = Fixture::new().await;
    fx.shared_albums(two_albums()).await;
    fx.album_media().await;
    fx.remote_listing(&[]).await;

    Mock::given(method("PUT"))
        .and(path("/Photos/a.jpg"))
        .respond_with(ResponseTemplate::new(507).set_body_string("Insufficient Storage"))
        .expect(1)
        .mount(&fx.dav)
        .await;
    Mock::given(method("PUT"))
        .and(path("/Photos/b.jpg"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&fx.dav)
        .await;

    let err = run(
        &fx.photos(),
        &fx.webdav(),
        &fx.options(false, Some(1)),
        &mut Cursor::new(""),
        &mut Vec::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::WebDav(_)));
    assert!(!fx.download_dir().join("a.jpg").exists());
}
