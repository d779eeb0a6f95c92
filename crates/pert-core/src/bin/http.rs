#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::net::SocketAddr;

    use anyhow::Context;
    use pert_cpm::{EngineConfig, http_api, logging};

    logging::init_tracing();

    let addr: SocketAddr = std::env::var("PERT_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()
        .context("PERT_HTTP_ADDR is not a socket address")?;

    let config = match std::env::var("PERT_CONFIG") {
        Ok(path) => EngineConfig::load(&path).with_context(|| format!("loading {path}"))?,
        Err(_) => EngineConfig::default(),
    };

    eprintln!("pert HTTP API listening on http://{addr}");
    http_api::serve(addr, config).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
