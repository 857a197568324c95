//! The similarity oracle seam.
//!
//! The matcher never scores names itself. It hands each source name and the
//! country's candidate list to an oracle together with a fixed instruction
//! describing the containment relation being tested.

use serde::{Deserialize, Serialize};

use crate::error::OracleError;

/// Record type announced to the oracle.
pub const RECORD_TYPE: &str = "electoral constituency";

/// Instruction sent with every query; `{country}` is replaced per partition.
pub const INSTRUCTIONS_TEMPLATE: &str = "The first name is a historical electoral district in \
{country}. The second name is an ISO 3166-2 subdivision of {country}. Decide whether the \
first electoral district lies within, or coincides with, the second subdivision.";

/// Context passed to the oracle with each query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleContext {
    pub record_type: String,
    pub instructions: String,
}

impl OracleContext {
    pub fn for_country(country: &str) -> Self {
        Self {
            record_type: RECORD_TYPE.to_string(),
            instructions: INSTRUCTIONS_TEMPLATE.replace("{country}", country),
        }
    }
}

/// One candidate the oracle considers a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OracleCandidate {
    /// Position in the candidate list that was sent.
    pub index: usize,
    pub probability: f64,
}

/// Black-box scorer deciding which candidate subdivisions contain a district.
pub trait SimilarityOracle {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns zero or more candidates for `source_name`, each with a
    /// probability in `[0, 1]`.
    fn match_candidates(
        &self,
        source_name: &str,
        candidates: &[String],
        context: &OracleContext,
    ) -> Result<Vec<OracleCandidate>, OracleError>;
}

impl<O: SimilarityOracle + ?Sized> SimilarityOracle for Box<O> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn match_candidates(
        &self,
        source_name: &str,
        candidates: &[String],
        context: &OracleContext,
    ) -> Result<Vec<OracleCandidate>, OracleError> {
        (**self).match_candidates(source_name, candidates, context)
    }
}

/// Checks an oracle answer against the candidate list.
///
/// Out-of-range indices and probabilities are errors. Repeated indices keep
/// their highest probability. The result is ordered by descending probability,
/// then index.
pub fn validate_candidates(
    raw: Vec<OracleCandidate>,
    candidate_count: usize,
) -> Result<Vec<OracleCandidate>, OracleError> {
    let mut best: Vec<Option<f64>> = vec![None; candidate_count];
    for candidate in raw {
        if candidate.index >= candidate_count {
            return Err(OracleError::IndexOutOfRange {
                index: candidate.index,
                candidates: candidate_count,
            });
        }
        if !(0.0..=1.0).contains(&candidate.probability) {
            return Err(OracleError::InvalidProbability {
                index: candidate.index,
                probability: candidate.probability,
            });
        }
        let slot = &mut best[candidate.index];
        if slot.is_none_or(|current| candidate.probability > current) {
            *slot = Some(candidate.probability);
        }
    }

    let mut validated: Vec<OracleCandidate> = best
        .into_iter()
        .enumerate()
        .filter_map(|(index, probability)| {
            probability.map(|probability| OracleCandidate { index, probability })
        })
        .collect();
    validated.sort_by(|a, b| {
        b.probability
            .total_cmp(&a.probability)
            .then_with(|| a.index.cmp(&b.index))
    });
    Ok(validated)
}
