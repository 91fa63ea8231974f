//! WebDAV client tests against a wiremock server.

use albumdav::Error;
use albumdav::config::WebDavConfig;
use albumdav::webdav::WebDavClient;
use wiremock::matchers::{body_bytes, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:multistatus xmlns:d="DAV:">
  <d:response>
    <d:href>/dav/Photos/</d:href>
    <d:propstat>
      <d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/dav/Photos/IMG_0001.JPG</d:href>
    <d:propstat>
      <d:prop><d:resourcetype/></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/dav/Photos/Beach%20Day.jpg</d:href>
    <d:propstat>
      <d:prop><d:resourcetype/></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/dav/Photos/older/</d:href>
    <d:propstat>
      <d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;

fn client(server: &MockServer) -> WebDavClient {
    WebDavClient::new(WebDavConfig {
        webdav_hostname: format!("{}/dav", server.uri()),
        webdav_login: "me".to_string(),
        webdav_password: "secret".to_string(),
        webdav_path: "/Photos/".to_string(),
    })
}

#[tokio::test]
async fn list_returns_entry_names_without_the_folder_itself() {
    let server = MockServer::start().await;

    Mock::given(method("PROPFIND"))
        .and(path("/dav/Photos/"))
        .and(header("Depth", "1"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(LISTING, "application/xml"))
        .expect(1)
        .mount(&server)
        .await;

    let webdav = client(&server);
    let names = webdav.list(webdav.root()).await.unwrap();

    assert_eq!(names, vec!["IMG_0001.JPG", "Beach Day.jpg", "older/"]);
}

#[tokio::test]
async fn list_surfaces_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("PROPFIND"))
        .and(path("/dav/Photos/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let webdav = client(&server);
    let err = webdav.list(webdav.root()).await.unwrap_err();
    assert!(matches!(err, Error::WebDav(ref msg) if msg.contains("401")));
}

#[tokio::test]
async fn upload_puts_file_contents() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("Beach Day.jpg");
    std::fs::write(&local, b"jpeg-bytes").unwrap();

    Mock::given(method("PUT"))
        .and(path("/dav/Photos/Beach%20Day.jpg"))
        .and(body_bytes(b"jpeg-bytes".to_vec()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let webdav = client(&server);
    webdav
        .upload(&webdav.remote_path_for("Beach Day.jpg"), &local)
        .await
        .unwrap();
}

#[tokio::test]
async fn upload_of_missing_local_file_fails_before_request() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let webdav = client(&server);
    let err = webdav
        .upload("/Photos/none.jpg", std::path::Path::new("/nonexistent/none.jpg"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
