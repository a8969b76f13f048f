use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, Response};
use matching_core::lambda::{query_param, respond};
use matching_core::{service, Config, DynamoStore, MatchingStore, Table};

async fn function_handler<S: MatchingStore>(
    store: &S,
    config: &Config,
    event: Request,
) -> Result<Response<Body>, Error> {
    let id = query_param(&event, "id");
    respond(
        service::get_matching_detail(store, id.as_deref()).await,
        config.expose_trace,
    )
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env();
    config.require(&[Table::Matching, Table::Question])?;
    let store = DynamoStore::from_env(config.clone()).await;

    run(service_fn(|event| function_handler(&store, &config, event))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_http::RequestExt;
    use matching_core::model::{Choice, Matching, Question};
    use matching_core::MemoryStore;
    use std::collections::HashMap;

    async fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .put_question(&Question {
                question_id: "q1".into(),
                matching_id: "m1".into(),
                question_text: "Fast or comfy?".into(),
                choices: vec![Choice {
                    choice_text: "Fast".into(),
                    choice_name: "speed".into(),
                    value: 5.0,
                }],
            })
            .await
            .unwrap();
        store
            .put_matching(&Matching {
                matching_id: "m1".into(),
                created_at: 1,
                title: "Bikes".into(),
                description: None,
                parameters: vec!["speed".into()],
                question_ids: vec!["q-missing".into(), "q1".into()],
                recommend_ids: vec![],
            })
            .await
            .unwrap();
        store
    }

    fn with_id(id: &str) -> Request {
        Request::default()
            .with_query_string_parameters(HashMap::from([("id".to_string(), id.to_string())]))
    }

    #[tokio::test]
    async fn returns_matching_with_resolvable_questions() {
        let store = store().await;
        let resp = function_handler(&store, &Config::default(), with_id("m1"))
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(resp.body().as_ref()).unwrap();

        assert_eq!(resp.status(), 200);
        assert_eq!(body["matching"]["matchingId"], "m1");
        assert_eq!(body["questions"].as_array().unwrap().len(), 1);
        assert_eq!(body["questions"][0]["choices"][0]["choiceName"], "speed");
    }

    #[tokio::test]
    async fn missing_id_is_bad_request() {
        let store = store().await;
        let resp = function_handler(&store, &Config::default(), Request::default())
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(resp.body().as_ref()).unwrap();

        assert_eq!(resp.status(), 400);
        assert_eq!(body["error"], "id is required");
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = store().await;
        let resp = function_handler(&store, &Config::default(), with_id("m2"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }
}
