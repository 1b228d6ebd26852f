use bookshelf::store::SqliteBookStore;
use bookshelf::{BookController, Server, ServerOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting `{}`...", env!("CARGO_BIN_NAME"));

    let options = ServerOptions::from_env()?;

    let store = SqliteBookStore::connect(&options.database_url, options.max_connections).await?;
    store.migrate().await?;

    let server = Server::bind(options.listen_addr)
        .await?
        .with_ctrl_c_graceful_shutdown()
        .build();

    server
        .serve(BookController::new(store))
        .await
        .map_err(Into::into)
}
