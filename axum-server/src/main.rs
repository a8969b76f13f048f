use dotenvy::dotenv;
use matching_axum_server::router;
use matching_core::{Config, DynamoStore, MemoryStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

type GenericError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), GenericError> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().with_local_defaults();

    let app = match std::env::var("MATCHING_STORE").as_deref() {
        Ok("memory") => {
            info!("using in-memory store");
            router(MemoryStore::new(), &config)
        }
        Ok("dynamo") | Err(_) => {
            info!(endpoint = ?config.dynamodb_endpoint, "using DynamoDB store");
            router(DynamoStore::from_env(config.clone()).await, &config)
        }
        Ok(other) => return Err(format!("unknown MATCHING_STORE {other:?}").into()),
    };

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
