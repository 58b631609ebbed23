use std::sync::Arc;

use workload_backend::config::Config;
use workload_backend::routes::{router, AppState};
use workload_backend::store::{JsonFileStore, MemoryStore, PredictionStore, WorkRecordStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = Config::from_env()?;

    let (records, predictions): (Arc<dyn WorkRecordStore>, Arc<dyn PredictionStore>) =
        match &cfg.data_dir {
            Some(dir) => {
                let store = Arc::new(JsonFileStore::new(dir)?);
                tracing::info!("using JSON file store under {}", dir);
                (store.clone(), store)
            }
            None => {
                let store = Arc::new(MemoryStore::new());
                tracing::info!("DATA_DIR not set; using in-memory store");
                (store.clone(), store)
            }
        };

    let state = AppState {
        records,
        predictions,
        history_limit: cfg.history_limit,
    };
    let app = router(state);

    tracing::info!("listening on {}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
