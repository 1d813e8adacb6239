use std::fs;
use std::path::{Path, PathBuf};
use glob::glob;
use log::warn;
use serde_json::Value;
use crate::config::Files;
use crate::errors::StorageError;
use crate::models::forecast::NormalizedDocument;

/// Directory layout for the artifacts of one pipeline run.
///
/// Raw and normalized documents are written once per city and removed after a
/// successful run, the report survives until the next run overwrites it
#[derive(Clone)]
pub struct Storage {
    raw_dir: PathBuf,
    analyzed_dir: PathBuf,
    report_path: PathBuf,
}

impl Storage {
    pub fn new(files: &Files) -> Self {
        Self {
            raw_dir: PathBuf::from(&files.raw_dir),
            analyzed_dir: PathBuf::from(&files.analyzed_dir),
            report_path: Path::new(&files.report_dir).join(&files.report_file),
        }
    }

    /// Storage rooted in one base directory
    ///
    /// # Arguments
    ///
    /// * 'base' - directory holding all artifacts
    #[cfg(test)]
    pub fn under(base: &Path) -> Self {
        Self {
            raw_dir: base.join("output_data"),
            analyzed_dir: base.join("analyzed_data"),
            report_path: base.join("results").join("result.csv"),
        }
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Saves a raw forecast document for a city
    ///
    /// # Arguments
    ///
    /// * 'city_id' - key of the city the document belongs to
    /// * 'document' - the raw document
    pub fn save_raw(&self, city_id: &str, document: &Value) -> Result<(), StorageError> {
        fs::create_dir_all(&self.raw_dir)?;
        let json = serde_json::to_string_pretty(document)?;
        fs::write(self.raw_dir.join(format!("{}.json", city_id)), json)?;

        Ok(())
    }

    /// Loads a previously saved raw forecast document
    ///
    /// # Arguments
    ///
    /// * 'city_id' - key of the city to load the document for
    pub fn load_raw(&self, city_id: &str) -> Result<Value, StorageError> {
        let json = fs::read_to_string(self.raw_dir.join(format!("{}.json", city_id)))?;

        Ok(serde_json::from_str(&json)?)
    }

    /// Saves a normalized document for a city
    ///
    /// # Arguments
    ///
    /// * 'city_id' - key of the city the document belongs to
    /// * 'document' - the normalized document
    pub fn save_normalized(&self, city_id: &str, document: &NormalizedDocument) -> Result<(), StorageError> {
        fs::create_dir_all(&self.analyzed_dir)?;
        let json = serde_json::to_string_pretty(document)?;
        fs::write(self.analyzed_dir.join(format!("{}.json", city_id)), json)?;

        Ok(())
    }

    /// Loads a normalized document from the given path
    ///
    /// # Arguments
    ///
    /// * 'path' - path to the document
    pub fn load_normalized(path: &Path) -> Result<NormalizedDocument, StorageError> {
        let json = fs::read_to_string(path)?;

        Ok(serde_json::from_str(&json)?)
    }

    /// Lists all normalized documents currently present
    ///
    pub fn list_normalized(&self) -> Result<Vec<PathBuf>, StorageError> {
        let pattern = format!("{}/*.json", self.analyzed_dir.display());

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in glob(&pattern)? {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => warn!("skipping unreadable entry: {}", e),
            }
        }

        Ok(paths)
    }

    /// Creates the report directory if missing and returns the report path
    ///
    pub fn prepare_report(&self) -> Result<&Path, StorageError> {
        if let Some(dir) = self.report_path.parent() {
            fs::create_dir_all(dir)?;
        }

        Ok(&self.report_path)
    }

    /// Removes raw and normalized documents, i.e. everything but the report
    ///
    pub fn remove_transient(&self) -> Result<(), StorageError> {
        for dir in [&self.raw_dir, &self.analyzed_dir] {
            if dir.exists() {
                fs::remove_dir_all(dir)?;
            }
        }

        Ok(())
    }
}

/// Returns the city key a document path was saved under
///
/// # Arguments
///
/// * 'path' - path to a raw or normalized document
pub fn city_id_of(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use tempfile::TempDir;
    use crate::models::forecast::DayRecord;

    #[test]
    fn raw_documents_survive_a_round_trip() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::under(tmp.path());

        storage.save_raw("paris", &json!({"forecasts": []})).unwrap();
        assert_eq!(storage.load_raw("paris").unwrap(), json!({"forecasts": []}));
        assert!(storage.load_raw("london").is_err());
    }

    #[test]
    fn normalized_documents_are_listed_and_removed() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::under(tmp.path());
        let doc = NormalizedDocument {
            days: vec![DayRecord {
                date: NaiveDate::from_ymd_opt(2022, 5, 26).unwrap(),
                hours_start: Some(9),
                hours_end: Some(19),
                hours_count: 11,
                temp_avg: Some(17.5),
                relevant_cond_hours: 4,
            }],
        };

        storage.save_normalized("paris", &doc).unwrap();
        storage.save_normalized("cairo", &doc).unwrap();
        storage.save_raw("paris", &json!({"a": 1})).unwrap();

        let mut ids = storage.list_normalized().unwrap()
            .iter()
            .filter_map(|p| city_id_of(p))
            .collect::<Vec<String>>();
        ids.sort();
        assert_eq!(ids, vec!["cairo", "paris"]);

        let path = storage.list_normalized().unwrap().remove(0);
        assert_eq!(Storage::load_normalized(&path).unwrap(), doc);

        storage.remove_transient().unwrap();
        assert!(storage.list_normalized().unwrap().is_empty());
        assert!(storage.load_raw("paris").is_err());
    }

    #[test]
    fn listing_without_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(Storage::under(tmp.path()).list_normalized().unwrap().is_empty());
    }
}
