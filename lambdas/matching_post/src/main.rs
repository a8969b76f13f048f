use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, Response};
use matching_core::lambda::respond;
use matching_core::model::{parse_body, CreateMatchingRequest, CreateMatchingResponse};
use matching_core::{service, Config, DynamoStore, MatchingError, MatchingStore, Table};

async fn handle<S: MatchingStore>(
    store: &S,
    event: &Request,
) -> Result<CreateMatchingResponse, MatchingError> {
    let request: CreateMatchingRequest = parse_body(event.body())?;
    service::create_matching(store, request).await
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
    config.require(&[Table::Matching, Table::Question, Table::Recommend])?;
    let store = DynamoStore::from_env(config.clone()).await;

    run(service_fn(|event| function_handler(&store, &config, event))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use matching_core::MemoryStore;

    const BODY: &str = r#"{
        "title": "Bikes",
        "parameters": ["speed", "comfort"],
        "questions": [{
            "questionText": "Fast or comfy?",
            "choices": [
                {"choiceText": "Fast", "choiceName": "speed", "value": 5},
                {"choiceText": "Comfy", "choiceName": "comfort", "value": 5}
            ]
        }],
        "recommends": [
            {"recommendText": "Road bike", "url": "https://example.com/road",
             "recommendParams": [{"paramsName": "speed", "value": "5"}]}
        ]
    }"#;

    #[tokio::test]
    async fn creates_matching_and_returns_id() {
        let store = MemoryStore::new();
        let resp = function_handler(&store, &Config::default(), Request::new(Body::from(BODY)))
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(resp.body().as_ref()).unwrap();

        assert_eq!(resp.status(), 200);
        let id = body["matchingId"].as_str().unwrap();
        let stored = store.get_matching(id).await.unwrap().unwrap();
        assert_eq!(stored.parameters, vec!["speed", "comfort"]);
        assert_eq!(stored.question_ids.len(), 1);
        assert_eq!(stored.recommend_ids.len(), 1);
    }

    #[tokio::test]
    async fn missing_parameters_is_bad_request() {
        let store = MemoryStore::new();
        let resp = function_handler(
            &store,
            &Config::default(),
            Request::new(Body::from(r#"{"title":"Bikes"}"#)),
        )
        .await
        .unwrap();
        let body: serde_json::Value = serde_json::from_slice(resp.body().as_ref()).unwrap();

        assert_eq!(resp.status(), 400);
        assert_eq!(body["error"], "parameters is required");
    }

    #[tokio::test]
    async fn empty_body_is_bad_request() {
        let resp = function_handler(&MemoryStore::new(), &Config::default(), Request::default())
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
    }
}
