use log::{error, info};
use crate::initialization::init;
use crate::query::run_query;

mod aggregate;
mod analyzer;
mod calculate;
mod config;
mod errors;
mod fetch;
mod initialization;
mod logging;
mod manager_forecast;
mod models;
mod pipeline;
mod pool;
mod query;
mod report;
mod storage;

fn main() -> anyhow::Result<()> {
    let mgr = init()?;

    let summary = pipeline::run(&mgr.config, &mgr.client, &mgr.storage)
        .inspect_err(|e| error!("pipeline failed: {}", e))?;
    info!("run done: {} fetched, {} normalized, {} ranked, {} excluded",
          summary.fetched, summary.normalized, summary.ranking.len(), summary.excluded.len());

    let best = run_query(mgr.storage.report_path())
        .inspect_err(|e| error!("reading report failed: {}", e))?;
    for city in best {
        println!("{}", city);
    }

    Ok(())
}
