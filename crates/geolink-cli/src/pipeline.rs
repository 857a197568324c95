//! Pipeline stages behind the `clean`, `link`, `validate` and `status`
//! commands.
//!
//! Every stage reads its inputs from disk and writes its outputs to the work
//! directory, so stages can run in separate invocations.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::ProgressBar;

use geolink_ingest::{load_archive, load_override_table, load_reference};
use geolink_match::{
    CountryMatch, Matcher, SimilarityOracle, countries_in, dedupe_reference, normalize_sources,
    partition_by_country, sort_reference_for_dedup,
};
use geolink_model::{OverrideTable, ReferenceRecord, SourceRecord};
use geolink_store::{
    KeyLayout, WorkDir, read_json, write_json, write_validated_csv, write_work_queue_csv,
};
use geolink_validate::{IntegrityWarning, ReviewSummary, validate_partitions};

use crate::config::GeolinkConfig;

/// Counts reported by [`clean`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOutcome {
    pub sources: usize,
    pub countries: usize,
    pub before_min_year: usize,
    pub duplicates: usize,
    pub reference_rows: usize,
    pub subdivisions: usize,
}

/// Loads both raw tables, normalizes and deduplicates them, and writes the
/// clean tables to the work directory.
pub fn clean(config: &GeolinkConfig) -> Result<CleanOutcome> {
    let start = Instant::now();
    let work = WorkDir::new(&config.paths.work_dir);

    let archive = load_archive(&config.paths.archive)?;
    let mut sources = archive.records;
    normalize_sources(&mut sources);

    let mut references = load_reference(&config.paths.reference, &config.reference.encoding)?;
    let reference_rows = references.len();
    if config.reference.sort_before_dedup {
        sort_reference_for_dedup(&mut references);
    }
    let references = dedupe_reference(references);

    write_json(&work.source_table(), &sources)?;
    write_json(&work.reference_table(), &references)?;

    let outcome = CleanOutcome {
        sources: sources.len(),
        countries: countries_in(&sources).len(),
        before_min_year: archive.before_min_year,
        duplicates: archive.duplicates,
        reference_rows,
        subdivisions: references.len(),
    };
    tracing::info!(
        sources = outcome.sources,
        countries = outcome.countries,
        subdivisions = outcome.subdivisions,
        duration_ms = start.elapsed().as_millis(),
        "clean tables written"
    );
    Ok(outcome)
}

/// Which countries to link and how.
#[derive(Debug, Clone, Default)]
pub struct LinkRequest {
    /// Countries to process, in order. Empty means every archive country.
    pub countries: Vec<String>,
    /// Recompute countries that already have a stored partition.
    pub overwrite: bool,
    pub layout: KeyLayout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryStatus {
    Linked { rows: usize, flagged: usize },
    /// A partition already existed and `overwrite` was off.
    Skipped,
    /// The standard has no subdivisions for the country.
    NoReference,
    /// The archive has no rows for a requested country.
    Unknown,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryOutcome {
    pub country: String,
    pub status: CountryStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOutcome {
    pub countries: Vec<CountryOutcome>,
    /// Countries whose oracle calls failed, in processing order. Rerun these.
    pub failed: Vec<String>,
}

impl LinkOutcome {
    pub fn count(&self, matches: impl Fn(&CountryStatus) -> bool) -> usize {
        self.countries
            .iter()
            .filter(|outcome| matches(&outcome.status))
            .count()
    }
}

/// Matches and flags each requested country, one at a time, persisting each
/// completed country before moving on.
///
/// An oracle failure only fails its own country; the country is reported in
/// [`LinkOutcome::failed`] and nothing is written for it.
pub fn link(
    config: &GeolinkConfig,
    oracle: &dyn SimilarityOracle,
    request: &LinkRequest,
    progress: &ProgressBar,
) -> Result<LinkOutcome> {
    let work = WorkDir::new(&config.paths.work_dir);
    let sources: Vec<SourceRecord> = read_json(&work.source_table())
        .context("clean tables are missing; run `geolink clean` first")?;
    let references: Vec<ReferenceRecord> = read_json(&work.reference_table())
        .context("clean tables are missing; run `geolink clean` first")?;

    let source_partitions = partition_by_country(&sources, |row| row.country_name.as_str());
    let reference_partitions = partition_by_country(&references, |row| row.country_name.as_str());
    let countries = select_countries(&request.countries, &sources);

    let store = work.partitions();
    let matcher = Matcher::new(oracle);
    let mut outcome = LinkOutcome::default();
    progress.set_length(countries.len() as u64);

    for country in countries {
        progress.set_message(country.clone());
        let span = tracing::info_span!("country", country = %country);
        let _entered = span.enter();

        let status = match source_partitions.get(&country) {
            None => {
                tracing::warn!("country not present in the archive");
                CountryStatus::Unknown
            }
            Some(_) if store.exists(&country) && !request.overwrite => {
                tracing::info!("partition exists; skipping");
                CountryStatus::Skipped
            }
            Some(country_sources) => {
                let country_references = reference_partitions
                    .get(&country)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                match matcher.match_country(&country, country_sources, country_references) {
                    Ok(CountryMatch::NoReference) => CountryStatus::NoReference,
                    Ok(CountryMatch::Matched(rows)) => {
                        store.save(&country, request.layout, &rows)?;
                        CountryStatus::Linked {
                            rows: rows.len(),
                            flagged: rows.iter().filter(|row| row.review_flag).count(),
                        }
                    }
                    Err(error) => {
                        tracing::warn!(%error, "country failed");
                        outcome.failed.push(country.clone());
                        CountryStatus::Failed {
                            reason: error.to_string(),
                        }
                    }
                }
            }
        };
        outcome.countries.push(CountryOutcome { country, status });
        progress.inc(1);
    }
    progress.finish_and_clear();

    tracing::info!(
        countries = outcome.countries.len(),
        failed = outcome.failed.len(),
        oracle = matcher.oracle_name(),
        "link finished"
    );
    Ok(outcome)
}

fn select_countries(requested: &[String], sources: &[SourceRecord]) -> Vec<String> {
    if requested.is_empty() {
        return countries_in(sources);
    }
    let mut seen = BTreeSet::new();
    requested
        .iter()
        .map(|country| country.trim().to_string())
        .filter(|country| !country.is_empty() && seen.insert(country.clone()))
        .collect()
}

/// Result of [`validate`] plus where it was written.
#[derive(Debug, Clone)]
pub struct ValidateOutcome {
    pub summary: ReviewSummary,
    pub warnings: Vec<IntegrityWarning>,
    pub partitions: usize,
    pub validated_json: PathBuf,
    pub validated_csv: PathBuf,
    pub work_queue_csv: PathBuf,
}

/// Unions every stored partition, applies the override table and writes the
/// validated outputs.
pub fn validate(config: &GeolinkConfig) -> Result<ValidateOutcome> {
    let work = WorkDir::new(&config.paths.work_dir);
    let references: Vec<ReferenceRecord> = read_json(&work.reference_table())
        .context("clean tables are missing; run `geolink clean` first")?;
    let overrides = if config.paths.overrides.is_file() {
        load_override_table(&config.paths.overrides)?
    } else {
        tracing::warn!(
            path = %config.paths.overrides.display(),
            "override table not found; continuing without overrides"
        );
        OverrideTable::default()
    };

    let partitions = work.partitions().load_all()?;
    let validation = validate_partitions(&partitions, &overrides, &references)?;

    write_json(&work.validated_json(), &validation.records)?;
    write_validated_csv(&work.validated_csv(), &validation.records)?;
    let queued = write_work_queue_csv(&work.work_queue_csv(), &validation.records)?;
    tracing::debug!(queued, "work queue written");

    Ok(ValidateOutcome {
        summary: validation.summary,
        warnings: validation.warnings,
        partitions: partitions.len(),
        validated_json: work.validated_json(),
        validated_csv: work.validated_csv(),
        work_queue_csv: work.work_queue_csv(),
    })
}

/// Link state of one country for `geolink status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub country: String,
    pub sources: usize,
    /// `None` until a partition is stored.
    pub stored: Option<StoredCounts>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCounts {
    pub rows: usize,
    pub flagged: usize,
    pub layout: KeyLayout,
    pub saved_at: String,
}

/// Lists archive countries and stored partitions side by side.
pub fn status(config: &GeolinkConfig) -> Result<Vec<StatusRow>> {
    let work = WorkDir::new(&config.paths.work_dir);
    let sources: Vec<SourceRecord> = if work.source_table().is_file() {
        read_json(&work.source_table())?
    } else {
        Vec::new()
    };
    let source_partitions = partition_by_country(&sources, |row| row.country_name.as_str());
    let stored = work.partitions().list()?;

    let mut countries: BTreeSet<String> = source_partitions.keys().cloned().collect();
    countries.extend(stored.iter().map(|info| info.country.clone()));

    Ok(countries
        .into_iter()
        .map(|country| StatusRow {
            sources: source_partitions.get(&country).map_or(0, Vec::len),
            stored: stored
                .iter()
                .find(|info| info.country == country)
                .map(|info| StoredCounts {
                    rows: info.rows,
                    flagged: info.flagged,
                    layout: info.layout,
                    saved_at: info.saved_at.clone(),
                }),
            country,
        })
        .collect())
}
