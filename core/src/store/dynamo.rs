use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_dynamo::{from_item, from_items, to_item};

use super::MatchingStore;
use crate::config::{Config, Table};
use crate::error::MatchingError;
use crate::model::{Answer, Matching, Question, Recommendation};

type Item = HashMap<String, AttributeValue>;

/// DynamoDB-backed store. The matching table is keyed by
/// (`matchingId`, `createdAt`); the others by their id alone.
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
    config: Config,
}

impl DynamoStore {
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    /// Loads AWS credentials and region from the environment.
    pub async fn from_env(config: Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(url) = &config.dynamodb_endpoint {
            loader = loader.endpoint_url(url);
        }
        let sdk_config = loader.load().await;

        Self::new(Client::new(&sdk_config), config)
    }

    fn table(&self, table: Table) -> Result<&str, MatchingError> {
        self.config.tables.get(table)
    }

    async fn get_by_key<T: DeserializeOwned>(
        &self,
        table: Table,
        key: &str,
        id: &str,
    ) -> Result<Option<T>, MatchingError> {
        let output = self
            .client
            .get_item()
            .table_name(self.table(table)?)
            .key(key, AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(store_error)?;

        Ok(output.item.map(from_item).transpose()?)
    }

    async fn put<T: Serialize>(&self, table: Table, value: &T) -> Result<(), MatchingError> {
        let item: Item = to_item(value)?;

        self.client
            .put_item()
            .table_name(self.table(table)?)
            .set_item(Some(item))
            .send()
            .await
            .map_err(store_error)?;

        Ok(())
    }
}

fn store_error(err: impl std::error::Error) -> MatchingError {
    MatchingError::Store(DisplayErrorContext(&err).to_string())
}

#[async_trait]
impl MatchingStore for DynamoStore {
    async fn get_matching(&self, matching_id: &str) -> Result<Option<Matching>, MatchingError> {
        // partition lookup; newest createdAt first
        let output = self
            .client
            .query()
            .table_name(self.table(Table::Matching)?)
            .key_condition_expression("matchingId = :id")
            .expression_attribute_values(":id", AttributeValue::S(matching_id.to_string()))
            .scan_index_forward(false)
            .limit(1)
            .send()
            .await
            .map_err(store_error)?;

        Ok(output
            .items
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(from_item)
            .transpose()?)
    }

    async fn list_matchings(&self) -> Result<Vec<Matching>, MatchingError> {
        let output = self
            .client
            .scan()
            .table_name(self.table(Table::Matching)?)
            .send()
            .await
            .map_err(store_error)?;

        Ok(from_items(output.items.unwrap_or_default())?)
    }

    async fn put_matching(&self, matching: &Matching) -> Result<(), MatchingError> {
        self.put(Table::Matching, matching).await
    }

    async fn get_question(&self, question_id: &str) -> Result<Option<Question>, MatchingError> {
        self.get_by_key(Table::Question, "questionId", question_id).await
    }

    async fn put_question(&self, question: &Question) -> Result<(), MatchingError> {
        self.put(Table::Question, question).await
    }

    async fn get_recommendation(
        &self,
        recommend_id: &str,
    ) -> Result<Option<Recommendation>, MatchingError> {
        self.get_by_key(Table::Recommend, "recommendId", recommend_id).await
    }

    async fn put_recommendation(&self, recommendation: &Recommendation) -> Result<(), MatchingError> {
        self.put(Table::Recommend, recommendation).await
    }

    async fn put_answer(&self, answer: &Answer) -> Result<(), MatchingError> {
        self.put(Table::Answer, answer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParamValue, RecommendParam};

    #[test]
    fn matching_item_uses_table_key_names() {
        let matching = Matching {
            matching_id: "m1".into(),
            created_at: 1_730_000_000,
            title: "Which bike?".into(),
            description: None,
            parameters: vec!["speed".into(), "comfort".into()],
            question_ids: vec!["q1".into()],
            recommend_ids: vec!["r1".into()],
        };

        let item: Item = to_item(&matching).unwrap();

        assert_eq!(item.get("matchingId"), Some(&AttributeValue::S("m1".into())));
        assert_eq!(
            item.get("createdAt"),
            Some(&AttributeValue::N("1730000000".into()))
        );
        assert!(!item.contains_key("description"));

        let back: Matching = from_item(item).unwrap();
        assert_eq!(back, matching);
    }

    #[test]
    fn stored_string_and_number_params_both_decode() {
        let mut speed = HashMap::new();
        speed.insert("paramsName".to_string(), AttributeValue::S("speed".into()));
        speed.insert("value".to_string(), AttributeValue::S("1".into()));
        let mut comfort = HashMap::new();
        comfort.insert("paramsName".to_string(), AttributeValue::S("comfort".into()));
        comfort.insert("value".to_string(), AttributeValue::N("4".into()));

        let mut item: Item = HashMap::new();
        item.insert("recommendId".into(), AttributeValue::S("r1".into()));
        item.insert("matchingId".into(), AttributeValue::S("m1".into()));
        item.insert("recommendText".into(), AttributeValue::S("City bike".into()));
        item.insert("url".into(), AttributeValue::S("https://example.com".into()));
        item.insert(
            "recommendParams".into(),
            AttributeValue::L(vec![AttributeValue::M(speed), AttributeValue::M(comfort)]),
        );

        let rec: Recommendation = from_item(item).unwrap();

        assert_eq!(
            rec.recommend_params,
            vec![
                RecommendParam {
                    params_name: "speed".into(),
                    value: ParamValue::Text("1".into()),
                },
                RecommendParam {
                    params_name: "comfort".into(),
                    value: ParamValue::Number(4.0),
                },
            ]
        );
    }
}
