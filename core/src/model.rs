use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::MatchingError;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Matching {
    pub matching_id: String,
    pub created_at: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Dimension names; their order fixes the axis order of every vector.
    pub parameters: Vec<String>,
    #[serde(default)]
    pub question_ids: Vec<String>,
    #[serde(default)]
    pub recommend_ids: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchingSummary {
    pub matching_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: i64,
}

impl From<&Matching> for MatchingSummary {
    fn from(m: &Matching) -> Self {
        Self {
            matching_id: m.matching_id.clone(),
            title: m.title.clone(),
            description: m.description.clone(),
            created_at: m.created_at,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: String,
    pub matching_id: String,
    pub question_text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One selectable answer. Picking it contributes `value` to the parameter
/// named by `choice_name`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub choice_text: String,
    pub choice_name: String,
    pub value: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub recommend_id: String,
    pub matching_id: String,
    pub recommend_text: String,
    pub url: String,
    #[serde(default)]
    pub recommend_params: Vec<RecommendParam>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendParam {
    pub params_name: String,
    pub value: ParamValue,
}

/// Stored parameter values show up both as numbers and as numeric strings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_f64(&self, name: &str) -> Result<f64, MatchingError> {
        let parsed = match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(s) => s.trim().parse::<f64>().ok(),
        };

        match parsed {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(MatchingError::InvalidParamValue {
                name: name.to_string(),
                value: match self {
                    ParamValue::Number(n) => n.to_string(),
                    ParamValue::Text(s) => s.clone(),
                },
            }),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceParam {
    pub choice_name: String,
    pub value: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub answer_id: String,
    pub matching_id: String,
    pub choice_params: Vec<ChoiceParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommend_id: Option<String>,
    pub created_at: i64,
}

// request bodies

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub parameters: Option<Vec<String>>,
    #[serde(default)]
    pub questions: Vec<NewQuestion>,
    #[serde(default)]
    pub recommends: Vec<NewRecommendation>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub question_text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewRecommendation {
    pub recommend_text: String,
    pub url: String,
    #[serde(default)]
    pub recommend_params: Vec<RecommendParam>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecordAnswerRequest {
    pub matching_id: Option<String>,
    pub choice_params: Option<Vec<ChoiceParam>>,
    pub recommend_id: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResultOutputRequest {
    pub matching_id: Option<String>,
    pub choice_params: Option<Vec<ChoiceParam>>,
}

// response bodies

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchingResponse {
    pub matching_id: String,
    pub message: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MatchingListResponse {
    pub items: Vec<MatchingSummary>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MatchingDetailResponse {
    pub matching: Matching,
    pub questions: Vec<Question>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordAnswerResponse {
    pub answer_id: String,
    pub message: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResultOutputResponse {
    pub recommend: String,
    pub url: String,
}

/// Decodes a JSON request body. A missing or malformed body is the caller's
/// fault, so both map to invalid input rather than an internal error.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, MatchingError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(MatchingError::invalid("request body is missing"));
    }
    serde_json::from_slice(body)
        .map_err(|e| MatchingError::invalid(format!("invalid JSON format in request body: {e}")))
}

/// Returns the value of a required identifier. Blank values are rejected, but
/// the key itself is passed through untouched.
pub(crate) fn required_id(field: &str, value: Option<&str>) -> Result<String, MatchingError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(MatchingError::invalid(format!("{field} is required"))),
    }
}

/// Returns the trimmed value of a required text field.
pub(crate) fn required(field: &str, value: Option<&str>) -> Result<String, MatchingError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(MatchingError::invalid(format!("{field} is required"))),
    }
}
