//! Process-level failure handling.

use std::time::Duration;

use ranney_server::config::loader::load_config;
use ranney_server::net::TlsError;
use ranney_server::{HttpServer, ServerConfig, ServerError};

#[tokio::test]
async fn missing_certificate_stops_the_server() {
    let dir = tempfile::tempdir().unwrap();

    let mut config = ServerConfig::default();
    config.listener.http_address = "127.0.0.1:0".into();
    config.listener.https_address = "127.0.0.1:0".into();
    config.tls.cert_path = dir.path().join("fullchain.pem").to_string_lossy().into_owned();
    config.tls.key_path = dir.path().join("privkey.pem").to_string_lossy().into_owned();
    config.files.root = dir.path().to_string_lossy().into_owned();

    let server = HttpServer::new(config).unwrap();
    let err = tokio::time::timeout(Duration::from_secs(5), server.run())
        .await
        .expect("run should fail fast");

    assert!(matches!(err, ServerError::Tls(TlsError::MissingFile { .. })));
}

#[tokio::test]
async fn embedder_config_file_drives_the_listeners() {
    let dir = tempfile::tempdir().unwrap();
    let missing_cert = dir.path().join("cert.pem");
    let path = dir.path().join("ranney.toml");
    std::fs::write(
        &path,
        format!(
            r#"
            [listener]
            http_address = "127.0.0.1:0"
            https_address = "127.0.0.1:0"

            [tls]
            cert_path = "{cert}"
            key_path = "{cert}"

            [files]
            root = "{root}"
            server_header = "example"
            "#,
            cert = missing_cert.display(),
            root = dir.path().display(),
        ),
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.files.server_header, "example");

    let server = HttpServer::new(config).unwrap();
    let err = tokio::time::timeout(Duration::from_secs(5), server.run())
        .await
        .expect("run should fail fast");

    assert!(matches!(
        err,
        ServerError::Tls(TlsError::MissingFile { ref path, .. }) if *path == missing_cert
    ));
}
