use std::sync::mpsc::Sender;
use log::{info, warn};
use rayon::prelude::*;
use crate::errors::PoolError;
use crate::manager_forecast::{check_not_empty, ForecastSource};
use crate::models::city::City;
use crate::models::exclusion::{Exclusion, Stage};
use crate::pool::worker_pool;
use crate::storage::Storage;

/// Items passed from the fetch stage to the calculate stage
#[derive(Clone, Debug, PartialEq)]
pub enum WorkItem {
    /// The raw forecast of the city is saved and ready for normalization
    Ready(City),
    /// No more items will follow
    Done,
}

/// Outcome of the fetch stage
#[derive(Default)]
pub struct FetchReport {
    pub fetched: Vec<String>,
    pub excluded: Vec<Exclusion>,
}

/// Fetches the raw forecast of every city on a pool of workers.
///
/// Each saved forecast is announced on the queue as soon as it is on disk. A city
/// that fails in any way is logged and left out, it is never retried. When all
/// cities have been tried a single Done item is sent, also if the pool could not
/// be built.
///
/// # Arguments
///
/// * 'source' - where forecasts come from
/// * 'cities' - the cities to fetch
/// * 'storage' - artifact storage
/// * 'workers' - number of worker threads
/// * 'queue' - sending half of the work queue
pub fn run_fetch<S: ForecastSource>(
    source: &S,
    cities: &[City],
    storage: &Storage,
    workers: usize,
    queue: Sender<WorkItem>) -> Result<FetchReport, PoolError> {

    let outcome = worker_pool("fetch", workers).map(|pool| {
        pool.install(|| {
            cities.par_iter()
                .map_with(queue.clone(), |queue, city| {
                    (city, fetch_city(source, city, storage, queue))
                })
                .collect::<Vec<(&City, Result<(), String>)>>()
        })
    });

    if queue.send(WorkItem::Done).is_err() {
        warn!("work queue closed before the done signal could be sent");
    }

    let mut report = FetchReport::default();
    for (city, result) in outcome? {
        match result {
            Ok(()) => report.fetched.push(city.name.clone()),
            Err(reason) => report.excluded.push(Exclusion::new(&city.name, Stage::Fetch, reason)),
        }
    }
    info!("fetch done: {} fetched, {} failed", report.fetched.len(), report.excluded.len());

    Ok(report)
}

/// Fetches, saves and announces one city
///
/// # Arguments
///
/// * 'source' - where forecasts come from
/// * 'city' - the city to fetch
/// * 'storage' - artifact storage
/// * 'queue' - sending half of the work queue
fn fetch_city<S: ForecastSource>(source: &S, city: &City, storage: &Storage, queue: &Sender<WorkItem>) -> Result<(), String> {
    let document = source.fetch(city)
        .and_then(check_not_empty)
        .map_err(|e| format!("problem getting forecast: {}", e))?;

    storage.save_raw(&city.id, &document)
        .map_err(|e| format!("problem saving forecast: {}", e))?;
    info!("forecast for {} downloaded", city.name);

    queue.send(WorkItem::Ready(city.clone()))
        .map_err(|_| "work queue closed".to_string())
}
