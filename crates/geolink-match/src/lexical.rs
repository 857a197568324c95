//! Offline oracle built on string similarity.
//!
//! Scores each candidate with Jaro-Winkler similarity on normalized names,
//! plus a containment rule: when the subdivision name appears as a whole
//! token run inside the district label, the district is taken to lie within
//! it. Used when no remote oracle is configured, and in tests.

use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;

use crate::error::OracleError;
use crate::oracle::{OracleCandidate, OracleContext, SimilarityOracle};
use crate::utils::{contains_tokens, normalize_text};

/// Score for a subdivision name found verbatim inside the district label.
const CONTAINMENT_SCORE: f64 = 0.95;
/// Weight applied to the best token-window similarity.
const WINDOW_WEIGHT: f64 = 0.9;

pub const DEFAULT_MIN_PROBABILITY: f64 = 0.6;
pub const DEFAULT_MAX_CANDIDATES: usize = 3;

#[derive(Debug, Clone)]
pub struct LexicalOracle {
    min_probability: f64,
    max_candidates: usize,
}

impl Default for LexicalOracle {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PROBABILITY, DEFAULT_MAX_CANDIDATES)
    }
}

impl LexicalOracle {
    /// `min_probability` is clamped to `[0, 1]`; `max_candidates` of zero
    /// means no limit.
    pub fn new(min_probability: f64, max_candidates: usize) -> Self {
        Self {
            min_probability: min_probability.clamp(0.0, 1.0),
            max_candidates,
        }
    }

    /// Probability that `source` lies within `candidate`.
    pub fn score(&self, source: &str, candidate: &str) -> f64 {
        let source = normalize_text(source);
        let candidate = normalize_text(candidate);
        if source.is_empty() || candidate.is_empty() {
            return 0.0;
        }
        let source_tokens: Vec<&str> = source.split(' ').collect();
        let candidate_tokens: Vec<&str> = candidate.split(' ').collect();
        if contains_tokens(&source_tokens, &candidate_tokens) {
            return if source == candidate { 1.0 } else { CONTAINMENT_SCORE };
        }

        let whole = jaro_similarity(source.chars(), candidate.chars());
        let window = if candidate_tokens.len() < source_tokens.len() {
            source_tokens
                .windows(candidate_tokens.len())
                .map(|window| jaro_similarity(window.join(" ").chars(), candidate.chars()))
                .fold(0.0_f64, f64::max)
                * WINDOW_WEIGHT
        } else {
            0.0
        };
        whole.max(window).clamp(0.0, 1.0)
    }
}

impl SimilarityOracle for LexicalOracle {
    fn name(&self) -> &'static str {
        "lexical"
    }

    fn match_candidates(
        &self,
        source_name: &str,
        candidates: &[String],
        _context: &OracleContext,
    ) -> Result<Vec<OracleCandidate>, OracleError> {
        let mut scored: Vec<OracleCandidate> = candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| OracleCandidate {
                index,
                probability: self.score(source_name, candidate),
            })
            .filter(|candidate| candidate.probability >= self.min_probability)
            .collect();
        scored.sort_by(|a, b| {
            b.probability
                .total_cmp(&a.probability)
                .then_with(|| a.index.cmp(&b.index))
        });
        if self.max_candidates > 0 {
            scored.truncate(self.max_candidates);
        }
        Ok(scored)
    }
}
