//! Nearest-recommendation matching over parameter vectors.
//!
//! Both the user's choices and every candidate are projected onto the
//! matching's `parameters`, in stored order. Names absent from a sparse
//! mapping contribute `0.0`; names outside `parameters` are ignored.

use std::collections::HashMap;

use crate::error::MatchingError;
use crate::model::{ChoiceParam, RecommendParam, Recommendation};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a> {
    pub recommendation: &'a Recommendation,
    pub distance: f64,
}

pub fn choice_vector(parameters: &[String], choices: &[ChoiceParam]) -> Vec<f64> {
    // later entries overwrite earlier ones on duplicate names
    let by_name: HashMap<&str, f64> = choices
        .iter()
        .map(|c| (c.choice_name.as_str(), c.value))
        .collect();

    project(parameters, &by_name)
}

pub fn recommend_vector(
    parameters: &[String],
    params: &[RecommendParam],
) -> Result<Vec<f64>, MatchingError> {
    let mut by_name = HashMap::with_capacity(params.len());
    for p in params {
        by_name.insert(p.params_name.as_str(), p.value.as_f64(&p.params_name)?);
    }

    Ok(project(parameters, &by_name))
}

fn project(parameters: &[String], by_name: &HashMap<&str, f64>) -> Vec<f64> {
    parameters
        .iter()
        .map(|name| by_name.get(name.as_str()).copied().unwrap_or(0.0))
        .collect()
}

/// Accumulated with `hypot`, so large finite components do not overflow the
/// intermediate squares.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "vectors must share dimensionality");

    a.iter()
        .zip(b.iter())
        .fold(0.0_f64, |acc, (x, y)| acc.hypot(x - y))
}

/// Picks the candidate closest to `choices`. On equal distances the earlier
/// candidate wins. Returns `Ok(None)` only when there are no candidates; the
/// first candidate is kept even if its distance is not finite.
pub fn nearest<'a, I>(
    parameters: &[String],
    choices: &[ChoiceParam],
    candidates: I,
) -> Result<Option<Nearest<'a>>, MatchingError>
where
    I: IntoIterator<Item = &'a Recommendation>,
{
    let choice = choice_vector(parameters, choices);

    let mut best: Option<Nearest<'a>> = None;

    for recommendation in candidates {
        let candidate = recommend_vector(parameters, &recommendation.recommend_params)?;
        let distance = euclidean_distance(&choice, &candidate);

        tracing::debug!(
            recommend_id = %recommendation.recommend_id,
            distance,
            "scored candidate"
        );

        if best.map_or(true, |b| distance < b.distance) {
            best = Some(Nearest {
                recommendation,
                distance,
            });
        }
    }

    Ok(best)
}
