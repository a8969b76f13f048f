use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, Response};
use matching_core::lambda::respond;
use matching_core::{service, Config, DynamoStore, MatchingStore, Table};

async fn function_handler<S: MatchingStore>(
    store: &S,
    config: &Config,
    _event: Request,
) -> Result<Response<Body>, Error> {
    respond(service::list_matchings(store).await, config.expose_trace)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env();
    config.require(&[Table::Matching])?;
    let store = DynamoStore::from_env(config.clone()).await;

    run(service_fn(|event| function_handler(&store, &config, event))).await
}
