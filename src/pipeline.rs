use std::sync::mpsc;
use std::thread;
use anyhow::{anyhow, Result};
use log::{info, warn};
use crate::aggregate::run_aggregate;
use crate::calculate::run_calculate;
use crate::config::{check_cities, worker_count, Config};
use crate::fetch::{run_fetch, WorkItem};
use crate::manager_forecast::ForecastSource;
use crate::models::exclusion::Exclusion;
use crate::storage::Storage;

/// What came out of one pipeline run
pub struct RunSummary {
    pub fetched: usize,
    pub normalized: usize,
    pub ranking: Vec<(String, usize)>,
    pub excluded: Vec<Exclusion>,
}

/// Runs fetch, calculate and aggregate and leaves only the report behind.
///
/// The calculate stage consumes the work queue while fetching is still going on,
/// both have drained before aggregation starts. Transient documents are removed
/// only when the whole run succeeds.
///
/// # Arguments
///
/// * 'config' - the configuration
/// * 'source' - where forecasts come from
/// * 'storage' - artifact storage
pub fn run<S: ForecastSource>(config: &Config, source: &S, storage: &Storage) -> Result<RunSummary> {
    check_cities(&config.cities)?;

    let (tx, rx) = mpsc::channel::<WorkItem>();
    let fetch_workers = worker_count(config.fetch.workers);
    info!("fetching forecasts for {} cities with {} workers", config.cities.len(), fetch_workers);

    let (fetch_report, calculate_report) = thread::scope(|s| {
        let consumer = s.spawn(move || run_calculate(rx, storage));
        let fetch_report = run_fetch(source, &config.cities, storage, fetch_workers, tx);

        (fetch_report, consumer.join())
    });
    let calculate_report = calculate_report.map_err(|_| anyhow!("calculate stage panicked"))?;
    let fetch_report = fetch_report?;

    let aggregate_report = run_aggregate(storage, &config.cities, worker_count(config.aggregate.workers))?;

    let mut excluded = fetch_report.excluded;
    excluded.extend(calculate_report.excluded);
    excluded.extend(aggregate_report.excluded);
    for exclusion in &excluded {
        warn!("{}", exclusion);
    }

    storage.remove_transient()?;

    Ok(RunSummary {
        fetched: fetch_report.fetched.len(),
        normalized: calculate_report.normalized.len(),
        ranking: aggregate_report.ranking,
        excluded,
    })
}
