use std::path::Path;
use log::info;
use crate::errors::ReportError;
use crate::report::read_report;

/// A ranked city as read back from the report
#[derive(Clone, Debug, PartialEq)]
pub struct RankedCity {
    pub city: String,
    pub avg_temp: f64,
    pub avg_clear_hours: f64,
    pub rank: usize,
}

/// Collects the ranked cities from report records, ordered by rank.
///
/// Every ranked row is a temperature row and the row right after it holds the
/// clear hours of the same city.
///
/// # Arguments
///
/// * 'records' - report records, header first
pub fn ranked_cities(records: &[Vec<String>]) -> Result<Vec<RankedCity>, ReportError> {
    let mut ranked: Vec<RankedCity> = Vec::new();

    for (idx, row) in records.iter().enumerate().skip(1) {
        let rank_cell = row.last().map(|c| c.as_str()).unwrap_or("");
        if rank_cell.is_empty() {
            continue;
        }

        let next = records.get(idx + 1)
            .ok_or(ReportError::Malformed(format!("no clear hours row after row {}", idx)))?;

        let rank = rank_cell.parse::<usize>()
            .map_err(|e| ReportError::Malformed(format!("rank '{}' on row {}: {}", rank_cell, idx, e)))?;

        ranked.push(RankedCity {
            city: row[0].clone(),
            avg_temp: average_cell(row, idx)?,
            avg_clear_hours: average_cell(next, idx + 1)?,
            rank,
        });
    }

    ranked.sort_by_key(|r| r.rank);

    Ok(ranked)
}

fn average_cell(row: &[String], idx: usize) -> Result<f64, ReportError> {
    let cell = row.len().checked_sub(2)
        .and_then(|i| row.get(i))
        .ok_or(ReportError::Malformed(format!("row {} is too short", idx)))?;

    cell.parse::<f64>()
        .map_err(|e| ReportError::Malformed(format!("average '{}' on row {}: {}", cell, idx, e)))
}

/// Returns the best ranked city and every following city with exactly the same
/// average temperature
///
/// # Arguments
///
/// * 'ranked' - cities ordered by rank
pub fn best_cities(ranked: &[RankedCity]) -> Vec<String> {
    let mut best: Vec<String> = Vec::new();

    for (i, city) in ranked.iter().enumerate() {
        if i > 0 && city.avg_temp != ranked[i - 1].avg_temp {
            break;
        }
        best.push(city.city.clone());
    }

    best
}

/// Reads the report and returns the name of the best city, or of all cities tied for best
///
/// # Arguments
///
/// * 'report_path' - path to the report
pub fn run_query(report_path: &Path) -> Result<Vec<String>, ReportError> {
    let records = read_report(report_path)?;
    let ranked = ranked_cities(&records)?;
    info!("{} ranked cities read from {}", ranked.len(), report_path.display());

    Ok(best_cities(&ranked))
}
