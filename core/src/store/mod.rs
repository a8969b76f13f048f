use async_trait::async_trait;

use crate::error::MatchingError;
use crate::model::{Answer, Matching, Question, Recommendation};

mod dynamo;
mod memory;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

/// Key-value access to the matching, question, recommend and answer tables.
///
/// Lookups return `Ok(None)` for a missing record. Every call reaches the
/// backend exactly once; there is no retry or caching at this layer.
#[async_trait]
pub trait MatchingStore: Send + Sync {
    async fn get_matching(&self, matching_id: &str) -> Result<Option<Matching>, MatchingError>;
    async fn list_matchings(&self) -> Result<Vec<Matching>, MatchingError>;
    async fn put_matching(&self, matching: &Matching) -> Result<(), MatchingError>;

    async fn get_question(&self, question_id: &str) -> Result<Option<Question>, MatchingError>;
    async fn put_question(&self, question: &Question) -> Result<(), MatchingError>;

    async fn get_recommendation(
        &self,
        recommend_id: &str,
    ) -> Result<Option<Recommendation>, MatchingError>;
    async fn put_recommendation(&self, recommendation: &Recommendation) -> Result<(), MatchingError>;

    async fn put_answer(&self, answer: &Answer) -> Result<(), MatchingError>;
}
