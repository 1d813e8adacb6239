use std::collections::HashSet;
use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;
use crate::models::city::{City, default_cities};

#[derive(Deserialize)]
#[serde(default)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_console: bool,
}

impl Default for General {
    fn default() -> Self {
        Self {
            log_path: "cityrank.log".to_string(),
            log_level: LevelFilter::Info,
            log_to_console: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Files {
    pub raw_dir: String,
    pub analyzed_dir: String,
    pub report_dir: String,
    pub report_file: String,
}

impl Default for Files {
    fn default() -> Self {
        Self {
            raw_dir: "output_data".to_string(),
            analyzed_dir: "analyzed_data".to_string(),
            report_dir: "results".to_string(),
            report_file: "result.csv".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct FetchParameters {
    pub base_url: String,
    pub timeout_secs: u64,
    pub workers: usize,
}

impl Default for FetchParameters {
    fn default() -> Self {
        Self {
            base_url: "https://code.s3.yandex.net/async-module/{city}-response.json".to_string(),
            timeout_secs: 30,
            workers: 0,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct AggregateParameters {
    pub workers: usize,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub files: Files,
    pub fetch: FetchParameters,
    pub aggregate: AggregateParameters,
    pub cities: Vec<City>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: General::default(),
            files: Files::default(),
            fetch: FetchParameters::default(),
            aggregate: AggregateParameters::default(),
            cities: default_cities(),
        }
    }
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let toml = fs::read_to_string(config_path)?;
    parse_config(&toml)
}

/// Parses configuration from a toml document.
/// An empty or missing city list falls back to the built-in city set.
///
/// # Arguments
///
/// * 'toml' - the toml document
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(toml)?;

    if config.cities.is_empty() {
        config.cities = default_cities();
    }
    if !config.fetch.base_url.contains("{city}") {
        return Err(ConfigError::from("fetch.base_url must contain a {city} placeholder"));
    }
    check_cities(&config.cities)?;

    Ok(config)
}

/// Checks that no two cities share an id or a display name.
///
/// Ids name the per city documents and names key the ranking, so either kind
/// of duplicate would let two cities overwrite each other
///
/// # Arguments
///
/// * 'cities' - the cities to check
pub fn check_cities(cities: &[City]) -> Result<(), ConfigError> {
    let mut ids: HashSet<&str> = HashSet::new();
    let mut names: HashSet<&str> = HashSet::new();

    for city in cities {
        if !ids.insert(city.id.as_str()) {
            return Err(ConfigError(format!("duplicate city id: {}", city.id)));
        }
        if !names.insert(city.name.as_str()) {
            return Err(ConfigError(format!("duplicate city name: {}", city.name)));
        }
    }

    Ok(())
}

/// Resolves a configured worker count, where zero means one worker per available core
///
/// # Arguments
///
/// * 'configured' - the worker count from configuration
pub fn worker_count(configured: usize) -> usize {
    if configured > 0 {
        configured
    } else {
        std::thread::available_parallelism().map_or(4, |n| n.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.general.log_level, LevelFilter::Info);
        assert_eq!(config.files.report_file, "result.csv");
        assert_eq!(config.cities.len(), default_cities().len());
    }

    #[test]
    fn sections_override_defaults() {
        let toml = r#"
            [general]
            log_path = "/tmp/x.log"
            log_level = "debug"
            log_to_console = false

            [fetch]
            base_url = "http://localhost/{city}.json"
            workers = 3

            [[cities]]
            id = "paris"
            name = "Paris"
        "#;
        let config = parse_config(toml).unwrap();
        assert_eq!(config.general.log_level, LevelFilter::Debug);
        assert!(!config.general.log_to_console);
        assert_eq!(config.fetch.workers, 3);
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.cities.len(), 1);
        assert_eq!(config.cities[0].name, "Paris");
    }

    #[test]
    fn base_url_without_placeholder_is_rejected() {
        let toml = "[fetch]\nbase_url = \"http://localhost/data.json\"\n";
        assert!(parse_config(toml).is_err());
    }

    #[test]
    fn duplicate_cities_are_rejected() {
        let same_name = r#"
            [[cities]]
            id = "a"
            name = "X"

            [[cities]]
            id = "b"
            name = "X"
        "#;
        let err = parse_config(same_name).err().unwrap();
        assert!(err.to_string().contains("duplicate city name: X"));

        let same_id = r#"
            [[cities]]
            id = "a"
            name = "X"

            [[cities]]
            id = "a"
            name = "Y"
        "#;
        let err = parse_config(same_id).err().unwrap();
        assert!(err.to_string().contains("duplicate city id: a"));

        assert!(check_cities(&default_cities()).is_ok());
    }

    #[test]
    fn zero_workers_resolves_to_parallelism() {
        assert_eq!(worker_count(2), 2);
        assert!(worker_count(0) >= 1);
    }
}
