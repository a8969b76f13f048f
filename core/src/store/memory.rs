use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::MatchingStore;
use crate::error::MatchingError;
use crate::model::{Answer, Matching, Question, Recommendation};

#[derive(Debug, Default)]
struct Tables {
    // matchingId -> every version written under that partition
    matchings: HashMap<String, Vec<Matching>>,
    questions: HashMap<String, Question>,
    recommendations: HashMap<String, Recommendation>,
    answers: Vec<Answer>,
}

/// In-process store for tests and local runs. Cloning shares the data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn answers(&self) -> Vec<Answer> {
        self.tables.lock().await.answers.clone()
    }

    pub async fn remove_recommendation(&self, recommend_id: &str) -> Option<Recommendation> {
        self.tables.lock().await.recommendations.remove(recommend_id)
    }
}

#[async_trait]
impl MatchingStore for MemoryStore {
    async fn get_matching(&self, matching_id: &str) -> Result<Option<Matching>, MatchingError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .matchings
            .get(matching_id)
            .and_then(|versions| versions.iter().max_by_key(|m| m.created_at))
            .cloned())
    }

    async fn list_matchings(&self) -> Result<Vec<Matching>, MatchingError> {
        let tables = self.tables.lock().await;
        Ok(tables.matchings.values().flatten().cloned().collect())
    }

    async fn put_matching(&self, matching: &Matching) -> Result<(), MatchingError> {
        let mut tables = self.tables.lock().await;
        let versions = tables
            .matchings
            .entry(matching.matching_id.clone())
            .or_default();

        // same (matchingId, createdAt) key overwrites, like PutItem
        versions.retain(|m| m.created_at != matching.created_at);
        versions.push(matching.clone());
        Ok(())
    }

    async fn get_question(&self, question_id: &str) -> Result<Option<Question>, MatchingError> {
        Ok(self.tables.lock().await.questions.get(question_id).cloned())
    }

    async fn put_question(&self, question: &Question) -> Result<(), MatchingError> {
        self.tables
            .lock()
            .await
            .questions
            .insert(question.question_id.clone(), question.clone());
        Ok(())
    }

    async fn get_recommendation(
        &self,
        recommend_id: &str,
    ) -> Result<Option<Recommendation>, MatchingError> {
        Ok(self
            .tables
            .lock()
            .await
            .recommendations
            .get(recommend_id)
            .cloned())
    }

    async fn put_recommendation(&self, recommendation: &Recommendation) -> Result<(), MatchingError> {
        self.tables.lock().await.recommendations.insert(
            recommendation.recommend_id.clone(),
            recommendation.clone(),
        );
        Ok(())
    }

    async fn put_answer(&self, answer: &Answer) -> Result<(), MatchingError> {
        self.tables.lock().await.answers.push(answer.clone());
        Ok(())
    }
}
