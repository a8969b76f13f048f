//! Request-level operations behind each API route.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::MatchingError;
use crate::model::{
    required, required_id, Answer, ChoiceParam, CreateMatchingRequest, CreateMatchingResponse,
    Matching, MatchingDetailResponse, MatchingListResponse, MatchingSummary, Question, Recommendation,
    RecordAnswerRequest, RecordAnswerResponse, ResultOutputRequest, ResultOutputResponse,
};
use crate::nearest::nearest;
use crate::store::MatchingStore;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

async fn load_matching<S: MatchingStore + ?Sized>(
    store: &S,
    matching_id: &str,
) -> Result<Matching, MatchingError> {
    store
        .get_matching(matching_id)
        .await?
        .ok_or_else(|| MatchingError::not_found(format!("matching {matching_id} not found")))
}

fn validate_parameters(parameters: Option<Vec<String>>) -> Result<Vec<String>, MatchingError> {
    let parameters = parameters.ok_or_else(|| MatchingError::invalid("parameters is required"))?;
    if parameters.is_empty() {
        return Err(MatchingError::invalid("parameters must not be empty"));
    }

    let mut seen = HashSet::with_capacity(parameters.len());
    let mut cleaned = Vec::with_capacity(parameters.len());
    for name in parameters {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(MatchingError::invalid("parameter names must not be blank"));
        }
        if !seen.insert(name.clone()) {
            return Err(MatchingError::invalid(format!("duplicate parameter {name:?}")));
        }
        cleaned.push(name);
    }
    Ok(cleaned)
}

fn check_known(parameters: &[String], name: &str, context: &str) -> Result<(), MatchingError> {
    if parameters.iter().any(|p| p == name) {
        Ok(())
    } else {
        Err(MatchingError::invalid(format!(
            "{context} refers to unknown parameter {name:?}"
        )))
    }
}

/// Validates and stores a new matching together with its questions and
/// recommendations. The matching record goes in last so that a readable
/// matching only references ids that were written.
pub async fn create_matching<S: MatchingStore + ?Sized>(
    store: &S,
    request: CreateMatchingRequest,
) -> Result<CreateMatchingResponse, MatchingError> {
    let title = required("title", request.title.as_deref())?;
    let parameters = validate_parameters(request.parameters)?;

    for (i, q) in request.questions.iter().enumerate() {
        if q.question_text.trim().is_empty() {
            return Err(MatchingError::invalid(format!(
                "questions[{i}].questionText is required"
            )));
        }
        for choice in &q.choices {
            check_known(&parameters, &choice.choice_name, &format!("questions[{i}]"))?;
        }
    }

    for (i, r) in request.recommends.iter().enumerate() {
        if r.recommend_text.trim().is_empty() {
            return Err(MatchingError::invalid(format!(
                "recommends[{i}].recommendText is required"
            )));
        }
        for p in &r.recommend_params {
            check_known(&parameters, &p.params_name, &format!("recommends[{i}]"))?;
            p.value
                .as_f64(&p.params_name)
                .map_err(|e| MatchingError::invalid(format!("recommends[{i}]: {e}")))?;
        }
    }

    let matching_id = new_id();

    let mut question_ids = Vec::with_capacity(request.questions.len());
    for q in request.questions {
        let question = Question {
            question_id: new_id(),
            matching_id: matching_id.clone(),
            question_text: q.question_text,
            choices: q.choices,
        };
        store.put_question(&question).await?;
        question_ids.push(question.question_id);
    }

    let mut recommend_ids = Vec::with_capacity(request.recommends.len());
    for r in request.recommends {
        let recommendation = Recommendation {
            recommend_id: new_id(),
            matching_id: matching_id.clone(),
            recommend_text: r.recommend_text,
            url: r.url,
            recommend_params: r.recommend_params,
        };
        store.put_recommendation(&recommendation).await?;
        recommend_ids.push(recommendation.recommend_id);
    }

    let matching = Matching {
        matching_id: matching_id.clone(),
        created_at: Utc::now().timestamp(),
        title,
        description: request.description.filter(|d| !d.trim().is_empty()),
        parameters,
        question_ids,
        recommend_ids,
    };
    store.put_matching(&matching).await?;

    info!(
        matching_id = %matching.matching_id,
        questions = matching.question_ids.len(),
        recommends = matching.recommend_ids.len(),
        "matching created"
    );

    Ok(CreateMatchingResponse {
        message: format!("Data {matching_id} saved successfully!"),
        matching_id,
    })
}

pub async fn list_matchings<S: MatchingStore + ?Sized>(
    store: &S,
) -> Result<MatchingListResponse, MatchingError> {
    // the table keeps one row per (matchingId, createdAt); list the newest
    let mut newest: HashMap<String, Matching> = HashMap::new();
    for matching in store.list_matchings().await? {
        match newest.get(&matching.matching_id) {
            Some(kept) if kept.created_at >= matching.created_at => {}
            _ => {
                newest.insert(matching.matching_id.clone(), matching);
            }
        }
    }

    let mut items: Vec<MatchingSummary> = newest.values().map(MatchingSummary::from).collect();

    items.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.matching_id.cmp(&b.matching_id))
    });

    Ok(MatchingListResponse { items })
}

/// Fetches a matching and its questions, in stored question order. Question
/// ids that no longer resolve are left out.
pub async fn get_matching_detail<S: MatchingStore + ?Sized>(
    store: &S,
    matching_id: Option<&str>,
) -> Result<MatchingDetailResponse, MatchingError> {
    let matching_id = required_id("id", matching_id)?;
    let matching = load_matching(store, &matching_id).await?;

    let mut questions = Vec::with_capacity(matching.question_ids.len());
    for question_id in &matching.question_ids {
        match store.get_question(question_id).await? {
            Some(q) => questions.push(q),
            None => warn!(%matching_id, %question_id, "skipping unresolvable question"),
        }
    }

    Ok(MatchingDetailResponse {
        matching,
        questions,
    })
}

fn required_choices(
    choice_params: Option<Vec<ChoiceParam>>,
) -> Result<Vec<ChoiceParam>, MatchingError> {
    choice_params.ok_or_else(|| MatchingError::invalid("choiceParams is required"))
}

pub async fn record_answer<S: MatchingStore + ?Sized>(
    store: &S,
    request: RecordAnswerRequest,
) -> Result<RecordAnswerResponse, MatchingError> {
    let matching_id = required_id("matchingId", request.matching_id.as_deref())?;
    let choice_params = required_choices(request.choice_params)?;
    let matching = load_matching(store, &matching_id).await?;

    let recommend_id = request.recommend_id.filter(|id| !id.trim().is_empty());
    if let Some(id) = &recommend_id {
        if !matching.recommend_ids.contains(id) {
            return Err(MatchingError::invalid(format!(
                "recommendId {id} does not belong to matching {matching_id}"
            )));
        }
    }

    let answer = Answer {
        answer_id: new_id(),
        matching_id,
        choice_params,
        recommend_id,
        created_at: Utc::now().timestamp(),
    };
    store.put_answer(&answer).await?;

    info!(answer_id = %answer.answer_id, matching_id = %answer.matching_id, "answer recorded");

    Ok(RecordAnswerResponse {
        message: format!("Answer {} saved successfully!", answer.answer_id),
        answer_id: answer.answer_id,
    })
}

/// Resolves the matching, gathers its recommendations and returns the one
/// nearest to the submitted choices. Recommendation ids that no longer
/// resolve are skipped.
pub async fn result_output<S: MatchingStore + ?Sized>(
    store: &S,
    request: ResultOutputRequest,
) -> Result<ResultOutputResponse, MatchingError> {
    let matching_id = required_id("matchingId", request.matching_id.as_deref())?;
    let choice_params = required_choices(request.choice_params)?;
    let matching = load_matching(store, &matching_id).await?;

    let mut candidates = Vec::with_capacity(matching.recommend_ids.len());
    for recommend_id in &matching.recommend_ids {
        match store.get_recommendation(recommend_id).await? {
            Some(r) => candidates.push(r),
            None => warn!(%matching_id, %recommend_id, "skipping unresolvable recommendation"),
        }
    }

    let best = nearest(&matching.parameters, &choice_params, &candidates)?
        .ok_or_else(|| MatchingError::NoRecommendation(matching_id.clone()))?;

    info!(
        %matching_id,
        recommend_id = %best.recommendation.recommend_id,
        distance = best.distance,
        candidates = candidates.len(),
        "nearest recommendation selected"
    );

    Ok(ResultOutputResponse {
        recommend: best.recommendation.recommend_text.clone(),
        url: best.recommendation.url.clone(),
    })
}
