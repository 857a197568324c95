//! Per-country matching.
//!
//! Both sides are blocked by country before any comparison. Within a
//! country, every distinct comparison name is sent to the oracle once against
//! the full candidate list, and every archive row carrying that name receives
//! the same answer.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use geolink_model::{MatchRecord, ReferenceRecord, SourceRecord, SubdivisionTarget};

use crate::error::MatchError;
use crate::flag::flag_matches;
use crate::normalize::comparison_name;
use crate::oracle::{OracleCandidate, OracleContext, SimilarityOracle, validate_candidates};

/// Outcome of matching one country.
#[derive(Debug, Clone, PartialEq)]
pub enum CountryMatch {
    /// The standard has no rows for the country; nothing to match against.
    NoReference,
    /// Flagged match rows, one or more per archive row.
    Matched(Vec<MatchRecord>),
}

/// Groups rows by country name, keeping each group's input order.
pub fn partition_by_country<T, F>(rows: &[T], country_of: F) -> BTreeMap<String, Vec<T>>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    let mut partitions: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for row in rows {
        partitions
            .entry(country_of(row).to_string())
            .or_default()
            .push(row.clone());
    }
    partitions
}

/// Distinct country names of the archive, sorted.
pub fn countries_in(sources: &[SourceRecord]) -> Vec<String> {
    sources
        .iter()
        .map(|source| source.country_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Runs the oracle over one country partition at a time.
pub struct Matcher<'o> {
    oracle: &'o dyn SimilarityOracle,
}

impl<'o> Matcher<'o> {
    pub fn new(oracle: &'o dyn SimilarityOracle) -> Self {
        Self { oracle }
    }

    pub fn oracle_name(&self) -> &'static str {
        self.oracle.name()
    }

    /// Matches one country's archive rows against its reference rows.
    ///
    /// Any oracle error fails the whole country; no partial rows are returned.
    pub fn match_country(
        &self,
        country: &str,
        sources: &[SourceRecord],
        references: &[ReferenceRecord],
    ) -> Result<CountryMatch, MatchError> {
        if references.is_empty() {
            tracing::warn!(country, "no reference subdivisions for country; skipping");
            return Ok(CountryMatch::NoReference);
        }

        let start = Instant::now();
        let context = OracleContext::for_country(country);
        let candidates: Vec<String> = references
            .iter()
            .map(|reference| reference.comparison_name().to_string())
            .collect();

        let mut answers: BTreeMap<String, Vec<OracleCandidate>> = BTreeMap::new();
        let mut rows = Vec::with_capacity(sources.len());
        for (source_row, source) in sources.iter().enumerate() {
            let mut source = source.clone();
            if source.comparison_name.is_empty() {
                source.comparison_name = comparison_name(&source);
            }

            if !answers.contains_key(&source.comparison_name) {
                let answer = self
                    .oracle
                    .match_candidates(&source.comparison_name, &candidates, &context)
                    .and_then(|raw| validate_candidates(raw, candidates.len()))
                    .map_err(|source_err| MatchError::Oracle {
                        country: country.to_string(),
                        query: source.comparison_name.clone(),
                        source: source_err,
                    })?;
                answers.insert(source.comparison_name.clone(), answer);
            }
            let answer = &answers[&source.comparison_name];

            if answer.is_empty() {
                rows.push(MatchRecord::unmatched(source, source_row));
                continue;
            }
            for candidate in answer {
                let target = SubdivisionTarget::from(&references[candidate.index]);
                rows.push(MatchRecord::matched(
                    source.clone(),
                    source_row,
                    target,
                    candidate.probability,
                ));
            }
        }

        flag_matches(&mut rows);
        tracing::info!(
            country,
            oracle = self.oracle.name(),
            sources = sources.len(),
            queries = answers.len(),
            candidates = candidates.len(),
            rows = rows.len(),
            flagged = rows.iter().filter(|row| row.review_flag).count(),
            duration_ms = start.elapsed().as_millis(),
            "country matched"
        );
        Ok(CountryMatch::Matched(rows))
    }
}
