use std::net::SocketAddr;
use std::sync::Arc;

use yoklamad::config::Config;
use yoklamad::db;
use yoklamad::http::{build_router, AppState};
use yoklamad::media::MediaStore;
use yoklamad::speech::HttpRecognizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::load()?;

    // Schema creation is idempotent; this connection only exists to run it.
    db::open_db(&config.db_path)?;

    let media = MediaStore::new(&config.upload_dir);
    media.ensure_root()?;

    let recognizer = Arc::new(HttpRecognizer::from_config(&config.speech));
    let addr: SocketAddr = config.bind_addr.parse()?;

    let state = Arc::new(AppState {
        config,
        media,
        recognizer,
    });
    let app = build_router(state);

    log::info!("starting yoklamad on http://{}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
