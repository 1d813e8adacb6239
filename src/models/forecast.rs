use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
pub struct RawHour {
    #[serde(deserialize_with = "hour_from_str_or_int")]
    pub hour: u32,
    pub temp: f64,
    pub condition: String,
}

#[derive(Deserialize)]
pub struct RawDay {
    pub date: NaiveDate,
    pub hours: Vec<RawHour>,
}

#[derive(Deserialize)]
pub struct RawForecast {
    pub forecasts: Vec<RawDay>,
}

/// One day of normalized metrics, limited to the daytime hours found in the raw forecast
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub hours_start: Option<u32>,
    pub hours_end: Option<u32>,
    pub hours_count: u32,
    pub temp_avg: Option<f64>,
    pub relevant_cond_hours: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NormalizedDocument {
    pub days: Vec<DayRecord>,
}

/// The forecast service reports hours as strings while other sources use integers
fn hour_from_str_or_int<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Hour {
        Int(u32),
        Str(String),
    }

    match Hour::deserialize(deserializer)? {
        Hour::Int(h) => Ok(h),
        Hour::Str(s) => s.trim().parse::<u32>().map_err(serde::de::Error::custom),
    }
}
