use serde::Serialize;

#[derive(thiserror::Error, Debug)]
pub enum MatchingError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("no recommendation available for matching {0}")]
    NoRecommendation(String),
    #[error("recommend param {name} has non-numeric value {value:?}")]
    InvalidParamValue { name: String, value: String },
    #[error("store error: {0}")]
    Store(String),
    #[error("item conversion failed: {0}")]
    Item(#[from] serde_dynamo::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

impl MatchingError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// HTTP status code the boundary layers answer with.
    pub fn status(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) | Self::NoRecommendation(_) => 404,
            Self::InvalidParamValue { .. }
            | Self::Store(_)
            | Self::Item(_)
            | Self::Serialization(_)
            | Self::Config(_) => 500,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status() >= 500
    }

    /// Builds the JSON error body. The `trace` field is only filled for
    /// internal failures and only when the deployment opts in.
    pub fn to_body(&self, expose_trace: bool) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
            trace: (expose_trace && self.is_internal()).then(|| format!("{self:?}")),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_error_kind() {
        assert_eq!(MatchingError::invalid("matchingId is required").status(), 400);
        assert_eq!(MatchingError::not_found("matching m1 not found").status(), 404);
        assert_eq!(MatchingError::NoRecommendation("m1".into()).status(), 404);
        assert_eq!(MatchingError::Store("timeout".into()).status(), 500);
        assert_eq!(
            MatchingError::InvalidParamValue {
                name: "speed".into(),
                value: "fast".into()
            }
            .status(),
            500
        );
    }

    #[test]
    fn trace_only_for_internal_errors_when_enabled() {
        let internal = MatchingError::Store("throttled".into());
        assert!(internal.to_body(true).trace.is_some());
        assert!(internal.to_body(false).trace.is_none());

        let client = MatchingError::invalid("bad body");
        assert!(client.to_body(true).trace.is_none());
    }

    #[test]
    fn body_without_trace_serializes_error_only() {
        let body = MatchingError::not_found("matching m9 not found").to_body(false);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json, serde_json::json!({ "error": "matching m9 not found" }));
    }
}
