use std::sync::mpsc::Receiver;
use log::{info, warn};
use crate::analyzer::analyze;
use crate::errors::AnalyzeError;
use crate::fetch::WorkItem;
use crate::models::city::City;
use crate::models::exclusion::{Exclusion, Stage};
use crate::storage::Storage;

/// Outcome of the calculate stage
#[derive(Default)]
pub struct CalculateReport {
    pub normalized: Vec<String>,
    pub excluded: Vec<Exclusion>,
}

/// Drains the work queue, normalizing one city at a time until the Done item arrives.
///
/// Blocks while the queue is empty. A city that fails is logged and left out,
/// the loop carries on with the next item.
///
/// # Arguments
///
/// * 'queue' - receiving half of the work queue
/// * 'storage' - artifact storage
pub fn run_calculate(queue: Receiver<WorkItem>, storage: &Storage) -> CalculateReport {
    let mut report = CalculateReport::default();

    loop {
        match queue.recv() {
            Ok(WorkItem::Ready(city)) => match process_city(&city, storage) {
                Ok(()) => {
                    info!("forecast for {} normalized", city.name);
                    report.normalized.push(city.name);
                },
                Err(e) => report.excluded.push(Exclusion::new(&city.name, Stage::Calculate, e)),
            },
            Ok(WorkItem::Done) => break,
            Err(_) => {
                warn!("work queue closed without a done signal");
                break;
            },
        }
    }

    report
}

/// Normalizes the saved raw forecast of a city and saves the result
///
/// # Arguments
///
/// * 'city' - the city to process
/// * 'storage' - artifact storage
fn process_city(city: &City, storage: &Storage) -> Result<(), AnalyzeError> {
    let raw = storage.load_raw(&city.id)?;
    let document = analyze(&raw)?;
    storage.save_normalized(&city.id, &document)?;

    Ok(())
}
