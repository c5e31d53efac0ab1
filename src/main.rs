use ranney_server::observability::init_logging;
use ranney_server::{HttpServer, ServerConfig};

#[tokio::main]
async fn main() {
    init_logging();

    tracing::info!("ranney-server v{} starting", env!("CARGO_PKG_VERSION"));

    let server = match HttpServer::new(ServerConfig::default()) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let config = server.config();
    tracing::info!(
        http_address = %config.listener.http_address,
        https_address = %config.listener.https_address,
        root = %config.files.root,
        "Configuration loaded"
    );

    let err = server.run().await;
    tracing::error!(error = %err, "Listener failed");
    std::process::exit(1);
}
