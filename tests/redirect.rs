//! Plaintext listener behaviour.

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request, StatusCode};
use ranney_server::http::server::serve_redirect;
use tokio::net::TcpListener;
use tower::ServiceExt;

mod common;

use common::{empty, request, server_with_root};

#[tokio::test]
async fn redirects_to_https_with_path_and_query() {
    let root = tempfile::tempdir().unwrap();
    let (server, sink) = server_with_root(root.path());

    let response = server
        .redirect_router()
        .oneshot(empty(request("GET", "/foo?x=1", None)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://ranney.com/foo?x=1"
    );
    assert_eq!(
        sink.lines(),
        vec![
            "method=GET url=/foo?x=1 proto=1.1 host=ranney.com remote=192.0.2.10:50000 code=301"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn host_header_is_reflected_verbatim() {
    let root = tempfile::tempdir().unwrap();
    let (server, _sink) = server_with_root(root.path());

    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .header("Host", "evil.example:1234")
        .extension(ConnectInfo(
            common::REMOTE.parse::<std::net::SocketAddr>().unwrap(),
        ))
        .body(Body::from("user=mjr"))
        .unwrap();
    let response = server.redirect_router().oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://evil.example:1234/login"
    );
}

#[tokio::test]
async fn redirect_over_real_socket() {
    let root = tempfile::tempdir().unwrap();
    let (server, sink) = server_with_root(root.path());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve_redirect(listener, server.redirect_router()));

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap();
    let res = client
        .get(format!("http://{addr}/a/b.html?q=1"))
        .send()
        .await
        .expect("redirect listener unreachable");

    assert_eq!(res.status(), 301);
    assert_eq!(
        res.headers()["location"],
        format!("https://{addr}/a/b.html?q=1").as_str()
    );
    let body = res.text().await.unwrap();
    assert_eq!(
        body,
        format!("<a href=\"https://{addr}/a/b.html?q=1\">Moved Permanently</a>.\n\n")
    );

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with(&format!(
        "method=GET url=/a/b.html?q=1 proto=1.1 host={addr} remote=127.0.0.1:"
    )));
    assert!(lines[0].ends_with(" code=301"));
}
