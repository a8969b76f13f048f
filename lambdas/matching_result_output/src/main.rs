use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, Response};
use matching_core::lambda::respond;
use matching_core::model::{parse_body, ResultOutputRequest, ResultOutputResponse};
use matching_core::{service, Config, DynamoStore, MatchingError, MatchingStore, Table};

async fn handle<S: MatchingStore>(
    store: &S,
    event: &Request,
) -> Result<ResultOutputResponse, MatchingError> {
    let request: ResultOutputRequest = parse_body(event.body())?;
    service::result_output(store, request).await
}

async fn function_handler<S: MatchingStore>(
    store: &S,
    config: &Config,
    event: Request,
) -> Result<Response<Body>, Error> {
    respond(handle(store, &event).await, config.expose_trace)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env();
    config.require(&[Table::Matching, Table::Recommend])?;
    let store = DynamoStore::from_env(config.clone()).await;

    run(service_fn(|event| function_handler(&store, &config, event))).await
}
