use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::mpsc;
use log::{info, warn};
use rayon::prelude::*;
use crate::analyzer::{DAY_HOURS_END, DAY_HOURS_START};
use crate::errors::{AggregateError, PoolError};
use crate::models::city::City;
use crate::models::exclusion::{Exclusion, Stage};
use crate::models::forecast::NormalizedDocument;
use crate::pool::worker_pool;
use crate::report::{write_report, ReportRow, ReportTable, HOURS_LABEL, TEMP_LABEL};
use crate::storage::{city_id_of, Storage};

/// Daytime averages of one city
#[derive(Clone, Debug, PartialEq)]
pub struct CitySummary {
    pub city_name: String,
    pub avg_temp: f64,
    pub avg_clear_hours: f64,
}

/// Summary and report row pair produced for one city
pub struct CityResult {
    pub summary: CitySummary,
    pub temp_row: ReportRow,
    pub hours_row: ReportRow,
}

/// Merged outcome of the summarize step
#[derive(Default)]
pub struct Aggregation {
    pub summaries: BTreeMap<String, CitySummary>,
    pub table: ReportTable,
    pub excluded: Vec<Exclusion>,
}

/// Summarizes one normalized document.
///
/// Only days spanning the full daytime window count, and the averages are taken
/// over however many such days there are. A document without any such day
/// gives no summary at all.
///
/// # Arguments
///
/// * 'city_name' - display name of the city
/// * 'document' - the normalized document of the city
pub fn summarize(city_name: &str, document: &NormalizedDocument) -> Result<CityResult, AggregateError> {
    let days = document.days
        .iter()
        .filter(|d| d.hours_start == Some(DAY_HOURS_START) && d.hours_end == Some(DAY_HOURS_END))
        .filter_map(|d| d.temp_avg.map(|t| (t, d.relevant_cond_hours as f64)))
        .collect::<Vec<(f64, f64)>>();

    if days.is_empty() {
        return Err(AggregateError::NoDaytimeData);
    }

    let count = days.len() as f64;
    let avg_temp = days.iter().map(|(t, _)| t).sum::<f64>() / count;
    let avg_clear_hours = days.iter().map(|(_, h)| h).sum::<f64>() / count;

    let temp_row = ReportRow {
        city: city_name.to_string(),
        unit: TEMP_LABEL.to_string(),
        days: days.iter().map(|(t, _)| t.to_string()).collect(),
        average: avg_temp.to_string(),
        rank: String::new(),
    };
    let hours_row = ReportRow {
        city: city_name.to_string(),
        unit: HOURS_LABEL.to_string(),
        days: days.iter().map(|(_, h)| h.to_string()).collect(),
        average: avg_clear_hours.to_string(),
        rank: String::new(),
    };

    Ok(CityResult {
        summary: CitySummary { city_name: city_name.to_string(), avg_temp, avg_clear_hours },
        temp_row,
        hours_row,
    })
}

/// Loads and summarizes the document at the given path
///
/// # Arguments
///
/// * 'path' - path to a normalized document
/// * 'cities' - the known cities
fn summarize_file(path: &PathBuf, cities: &[City]) -> (String, Result<CityResult, AggregateError>) {
    let city_id = city_id_of(path).unwrap_or_default();

    let city = match cities.iter().find(|c| c.id == city_id) {
        Some(c) => c,
        None => return (city_id.clone(), Err(AggregateError::UnknownCity(city_id))),
    };

    let result = Storage::load_normalized(path)
        .map_err(AggregateError::from)
        .and_then(|doc| summarize(&city.name, &doc));

    (city.name.clone(), result)
}

/// Summarizes all given documents on a pool of workers and merges the results.
///
/// Row pairs enter the table in completion order. Cities that cannot be summarized
/// are reported as excluded and leave no rows behind.
///
/// # Arguments
///
/// * 'paths' - normalized documents to summarize
/// * 'cities' - the known cities
/// * 'workers' - number of worker threads
pub fn summarize_all(paths: &[PathBuf], cities: &[City], workers: usize) -> Result<Aggregation, PoolError> {
    let pool = worker_pool("summarize", workers)?;
    let (tx, rx) = mpsc::channel::<(String, Result<CityResult, AggregateError>)>();

    pool.install(|| {
        paths.par_iter().for_each_with(tx, |tx, path| {
            let _ = tx.send(summarize_file(path, cities));
        });
    });

    let mut aggregation = Aggregation::default();
    for (city, result) in rx {
        match result {
            Ok(r) => {
                info!("summarized {}: avg temp {}, avg clear hours {}",
                      city, r.summary.avg_temp, r.summary.avg_clear_hours);
                aggregation.table.push_city(r.temp_row, r.hours_row);
                aggregation.summaries.insert(city, r.summary);
            },
            Err(e) => aggregation.excluded.push(Exclusion::new(&city, Stage::Aggregate, e)),
        }
    }

    Ok(aggregation)
}

/// Ranks the summarized cities and writes each rank into the report table.
///
/// Cities are ordered by average temperature, then by average clear hours, both
/// descending. Ranks run 1..=N in that order, also across equal keys.
///
/// # Arguments
///
/// * 'summaries' - the merged city summaries
/// * 'table' - the report table to attach ranks to
pub fn rank(summaries: &BTreeMap<String, CitySummary>, table: &mut ReportTable) -> Vec<(String, usize)> {
    let mut sorted = summaries.values().collect::<Vec<&CitySummary>>();
    sorted.sort_by(|a, b| {
        b.avg_temp.total_cmp(&a.avg_temp)
            .then(b.avg_clear_hours.total_cmp(&a.avg_clear_hours))
    });

    let mut ranking: Vec<(String, usize)> = Vec::with_capacity(sorted.len());
    for (i, summary) in sorted.iter().enumerate() {
        let rank = i + 1;
        if table.set_rank(&summary.city_name, rank) {
            ranking.push((summary.city_name.clone(), rank));
        } else {
            warn!("no report rows for {}, rank {} not attached", summary.city_name, rank);
        }
    }

    ranking
}

/// Outcome of the aggregate stage
pub struct AggregateReport {
    pub ranking: Vec<(String, usize)>,
    pub excluded: Vec<Exclusion>,
}

/// Summarizes every normalized document present, ranks the cities and writes the report
///
/// # Arguments
///
/// * 'storage' - artifact storage
/// * 'cities' - the known cities
/// * 'workers' - number of worker threads for the summarize step
pub fn run_aggregate(storage: &Storage, cities: &[City], workers: usize) -> anyhow::Result<AggregateReport> {
    let paths = storage.list_normalized()?;
    info!("aggregating {} normalized documents", paths.len());

    let mut aggregation = summarize_all(&paths, cities, workers)?;
    let ranking = rank(&aggregation.summaries, &mut aggregation.table);

    let report_path = storage.prepare_report()?;
    write_report(report_path, &aggregation.table)?;
    info!("report with {} ranked cities written to {}", ranking.len(), report_path.display());

    Ok(AggregateReport { ranking, excluded: aggregation.excluded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use crate::models::forecast::DayRecord;

    fn day(start: Option<u32>, end: Option<u32>, temp: Option<f64>, hours: u32) -> DayRecord {
        DayRecord {
            date: NaiveDate::from_ymd_opt(2022, 5, 26).unwrap(),
            hours_start: start,
            hours_end: end,
            hours_count: 11,
            temp_avg: temp,
            relevant_cond_hours: hours,
        }
    }

    fn full_day(temp: f64, hours: u32) -> DayRecord {
        day(Some(9), Some(19), Some(temp), hours)
    }

    fn summary(name: &str, temp: f64, hours: f64) -> CitySummary {
        CitySummary { city_name: name.to_string(), avg_temp: temp, avg_clear_hours: hours }
    }

    fn table_for(summaries: &BTreeMap<String, CitySummary>) -> ReportTable {
        let mut table = ReportTable::default();
        for s in summaries.values() {
            let doc = NormalizedDocument { days: vec![full_day(s.avg_temp, s.avg_clear_hours as u32)] };
            let r = summarize(&s.city_name, &doc).unwrap();
            table.push_city(r.temp_row, r.hours_row);
        }
        table
    }

    #[test]
    fn only_full_daytime_days_are_averaged() {
        let doc = NormalizedDocument {
            days: vec![
                full_day(20.0, 10),
                day(Some(12), Some(19), Some(40.0), 8),
                full_day(16.0, 4),
                day(None, None, None, 0),
            ],
        };

        let r = summarize("Paris", &doc).unwrap();
        assert_eq!(r.summary.avg_temp, 18.0);
        assert_eq!(r.summary.avg_clear_hours, 7.0);
        assert_eq!(r.temp_row.days, vec!["20", "16"]);
        assert_eq!(r.hours_row.average, "7");
    }

    #[test]
    fn five_days_are_all_averaged() {
        let doc = NormalizedDocument {
            days: vec![full_day(10.0, 1), full_day(12.0, 2), full_day(14.0, 3), full_day(16.0, 4), full_day(18.0, 5)],
        };

        let r = summarize("Rome", &doc).unwrap();
        assert_eq!(r.summary.avg_temp, 14.0);
        assert_eq!(r.summary.avg_clear_hours, 3.0);
        assert_eq!(r.temp_row.days.len(), 5);
    }

    #[test]
    fn no_daytime_days_gives_no_summary() {
        let doc = NormalizedDocument { days: vec![day(Some(12), Some(19), Some(20.0), 3)] };
        assert!(matches!(summarize("Cairo", &doc), Err(AggregateError::NoDaytimeData)));

        let empty = NormalizedDocument { days: vec![] };
        assert!(matches!(summarize("Cairo", &empty), Err(AggregateError::NoDaytimeData)));
    }

    #[test]
    fn ranks_are_dense_and_ordered_by_temp_then_hours() {
        let mut summaries = BTreeMap::new();
        for s in [summary("A", 25.0, 5.0), summary("B", 25.0, 7.0), summary("C", 20.0, 11.0), summary("D", 22.5, 0.0)] {
            summaries.insert(s.city_name.clone(), s);
        }
        let mut table = table_for(&summaries);

        let ranking = rank(&summaries, &mut table);
        assert_eq!(ranking, vec![
            ("B".to_string(), 1), ("A".to_string(), 2), ("D".to_string(), 3), ("C".to_string(), 4),
        ]);

        let (temp, hours) = table.city_rows("A").unwrap();
        assert_eq!(temp.rank, "2");
        assert_eq!(hours.rank, "");
    }

    #[test]
    fn equal_keys_still_get_distinct_ranks() {
        let mut summaries = BTreeMap::new();
        for s in [summary("A", 25.0, 5.0), summary("B", 25.0, 5.0)] {
            summaries.insert(s.city_name.clone(), s);
        }
        let mut table = table_for(&summaries);

        let mut ranks = rank(&summaries, &mut table).into_iter().map(|(_, r)| r).collect::<Vec<usize>>();
        ranks.sort();
        assert_eq!(ranks, vec![1, 2]);
    }

    #[test]
    fn unknown_and_broken_documents_are_excluded() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::under(tmp.path());
        let cities = vec![City::new("paris", "Paris"), City::new("roma", "Rome"), City::new("cairo", "Cairo")];

        storage.save_normalized("paris", &NormalizedDocument { days: vec![full_day(18.0, 6)] }).unwrap();
        storage.save_normalized("roma", &NormalizedDocument { days: vec![full_day(24.0, 9)] }).unwrap();
        storage.save_normalized("cairo", &NormalizedDocument { days: vec![day(None, None, None, 0)] }).unwrap();
        storage.save_normalized("atlantis", &NormalizedDocument { days: vec![full_day(30.0, 11)] }).unwrap();

        let report = run_aggregate(&storage, &cities, 3).unwrap();

        assert_eq!(report.ranking, vec![("Rome".to_string(), 1), ("Paris".to_string(), 2)]);
        let mut excluded = report.excluded.iter().map(|e| e.city.as_str()).collect::<Vec<&str>>();
        excluded.sort();
        assert_eq!(excluded, vec!["Cairo", "atlantis"]);
        assert!(report.excluded.iter().all(|e| e.stage == Stage::Aggregate));

        let text = std::fs::read_to_string(storage.report_path()).unwrap();
        assert!(!text.contains("Cairo"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn repeated_aggregation_gives_same_ranks() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::under(tmp.path());
        let cities = vec![City::new("a", "A"), City::new("b", "B"), City::new("c", "C")];
        storage.save_normalized("a", &NormalizedDocument { days: vec![full_day(25.0, 5)] }).unwrap();
        storage.save_normalized("b", &NormalizedDocument { days: vec![full_day(25.0, 5)] }).unwrap();
        storage.save_normalized("c", &NormalizedDocument { days: vec![full_day(20.0, 5)] }).unwrap();

        let first = run_aggregate(&storage, &cities, 4).unwrap().ranking;
        let second = run_aggregate(&storage, &cities, 1).unwrap().ranking;
        assert_eq!(first, second);
    }
}
