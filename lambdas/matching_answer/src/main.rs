use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, Response};
use matching_core::lambda::respond;
use matching_core::model::{parse_body, RecordAnswerRequest, RecordAnswerResponse};
use matching_core::{service, Config, DynamoStore, MatchingError, MatchingStore, Table};

async fn handle<S: MatchingStore>(
    store: &S,
    event: &Request,
) -> Result<RecordAnswerResponse, MatchingError> {
    let request: RecordAnswerRequest = parse_body(event.body())?;
    service::record_answer(store, request).await
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
    config.require(&[Table::Matching, Table::Answer])?;
    let store = DynamoStore::from_env(config.clone()).await;

    run(service_fn(|event| function_handler(&store, &config, event))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use matching_core::model::Matching;
    use matching_core::MemoryStore;

    async fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .put_matching(&Matching {
                matching_id: "m1".into(),
                created_at: 1,
                title: "Bikes".into(),
                description: None,
                parameters: vec!["speed".into()],
                question_ids: vec![],
                recommend_ids: vec!["r1".into()],
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn records_answer() {
        let store = store().await;
        let event = Request::new(Body::from(
            r#"{"matchingId":"m1","choiceParams":[{"choiceName":"speed","value":3}],"recommendId":"r1"}"#,
        ));

        let resp = function_handler(&store, &Config::default(), event)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(resp.body().as_ref()).unwrap();

        assert_eq!(resp.status(), 200);
        let answers = store.answers().await;
        assert_eq!(answers.len(), 1);
        assert_eq!(body["answerId"], answers[0].answer_id.as_str());
    }

    #[tokio::test]
    async fn missing_choices_is_bad_request() {
        let store = store().await;
        let event = Request::new(Body::from(r#"{"matchingId":"m1"}"#));

        let resp = function_handler(&store, &Config::default(), event)
            .await
            .unwrap();

        assert_eq!(resp.status(), 400);
        assert!(store.answers().await.is_empty());
    }
}
