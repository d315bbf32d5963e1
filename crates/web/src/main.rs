use tracing::info;

use calcweb_web::{logging, WebConfig, WebServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = WebConfig::from_env()?;

    let _log_guard = logging::init(&cfg)?;

    info!("Starting calcweb v{} on http://{}", calcweb_common::VERSION, cfg.addr);
    if cfg.log_to_file {
        info!("Writing logs to {}", cfg.log_dir.display());
    }

    WebServer::new(cfg).serve().await
}
