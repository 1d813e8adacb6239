use serde_json::Value;
use crate::errors::AnalyzeError;
use crate::models::forecast::{DayRecord, NormalizedDocument, RawDay, RawForecast};

/// First hour of the daytime window
pub const DAY_HOURS_START: u32 = 9;

/// Last hour of the daytime window (inclusive)
pub const DAY_HOURS_END: u32 = 19;

/// Weather conditions counted as free from precipitation
const RELEVANT_CONDITIONS: [&str; 4] = ["clear", "partly-cloudy", "cloudy", "overcast"];

/// Turns a raw forecast document into per day metrics over the daytime window.
///
/// Every forecast day yields one record. A day without any hour inside the window
/// gets no window and no temperature average.
///
/// # Arguments
///
/// * 'raw' - the raw forecast document as fetched
pub fn analyze(raw: &Value) -> Result<NormalizedDocument, AnalyzeError> {
    let forecast: RawForecast = serde_json::from_value(raw.clone())?;

    let days = forecast.forecasts
        .iter()
        .map(analyze_day)
        .collect::<Vec<DayRecord>>();

    Ok(NormalizedDocument { days })
}

fn analyze_day(day: &RawDay) -> DayRecord {
    let hours = day.hours
        .iter()
        .filter(|h| (DAY_HOURS_START..=DAY_HOURS_END).contains(&h.hour))
        .collect::<Vec<_>>();

    if hours.is_empty() {
        return DayRecord {
            date: day.date,
            hours_start: None,
            hours_end: None,
            hours_count: 0,
            temp_avg: None,
            relevant_cond_hours: 0,
        };
    }

    let temp_sum: f64 = hours.iter().map(|h| h.temp).sum();
    let temp_avg = (temp_sum / hours.len() as f64 * 1000.0).round() / 1000.0;
    let relevant = hours
        .iter()
        .filter(|h| RELEVANT_CONDITIONS.contains(&h.condition.as_str()))
        .count();

    DayRecord {
        date: day.date,
        hours_start: hours.iter().map(|h| h.hour).min(),
        hours_end: hours.iter().map(|h| h.hour).max(),
        hours_count: hours.len() as u32,
        temp_avg: Some(temp_avg),
        relevant_cond_hours: relevant as u32,
    }
}
