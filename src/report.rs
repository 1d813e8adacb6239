use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use crate::errors::ReportError;

/// Unit label of the temperature row
pub const TEMP_LABEL: &str = "Temperature, avg";

/// Unit label of the clear weather hours row
pub const HOURS_LABEL: &str = "Clear hours";

/// Fewest day columns the header will carry
const MIN_DAY_COLUMNS: usize = 3;

/// One data row of the report
#[derive(Clone, Debug, PartialEq)]
pub struct ReportRow {
    pub city: String,
    pub unit: String,
    pub days: Vec<String>,
    pub average: String,
    pub rank: String,
}

/// The report table, two rows per city, temperature row first.
///
/// Rows are kept in insertion order and indexed by city name so that a rank
/// can be attached without searching the rows
#[derive(Default)]
pub struct ReportTable {
    rows: Vec<ReportRow>,
    index: HashMap<String, (usize, usize)>,
}

impl ReportTable {
    /// Appends the row pair of one city
    ///
    /// # Arguments
    ///
    /// * 'temp_row' - the temperature row
    /// * 'hours_row' - the clear weather hours row
    pub fn push_city(&mut self, temp_row: ReportRow, hours_row: ReportRow) {
        let temp_idx = self.rows.len();
        self.index.insert(temp_row.city.clone(), (temp_idx, temp_idx + 1));
        self.rows.push(temp_row);
        self.rows.push(hours_row);
    }

    /// Sets the rank of a city on its temperature row, returns false if the city is unknown
    ///
    /// # Arguments
    ///
    /// * 'city' - name of the city
    /// * 'rank' - the rank to set
    pub fn set_rank(&mut self, city: &str, rank: usize) -> bool {
        match self.index.get(city) {
            Some(&(temp_idx, _)) => {
                self.rows[temp_idx].rank = rank.to_string();
                true
            },
            None => false,
        }
    }

    /// Returns the temperature and clear hours rows of a city
    ///
    /// # Arguments
    ///
    /// * 'city' - name of the city
    #[cfg(test)]
    pub fn city_rows(&self, city: &str) -> Option<(&ReportRow, &ReportRow)> {
        self.index.get(city).map(|&(t, h)| (&self.rows[t], &self.rows[h]))
    }

    /// Number of day columns needed to hold the widest row
    ///
    fn day_columns(&self) -> usize {
        self.rows.iter().map(|r| r.days.len()).max().unwrap_or(0).max(MIN_DAY_COLUMNS)
    }

    /// Returns the header row
    ///
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["City".to_string(), "Unit".to_string()];
        header.extend((1..=self.day_columns()).map(|d| format!("Day{}", d)));
        header.push("Average".to_string());
        header.push("Rank".to_string());

        header
    }

    /// Returns header and rows as plain records, day cells padded to equal width
    ///
    pub fn to_records(&self) -> Vec<Vec<String>> {
        let width = self.day_columns();
        let mut records = vec![self.header()];

        for row in &self.rows {
            let mut record = vec![row.city.clone(), row.unit.clone()];
            record.extend(row.days.iter().cloned());
            record.resize(2 + width, String::new());
            record.push(row.average.clone());
            record.push(row.rank.clone());
            records.push(record);
        }

        records
    }
}

/// Writes the report as comma delimited UTF-8 text, replacing any earlier report
///
/// # Arguments
///
/// * 'path' - path of the report file
/// * 'table' - the table to write
pub fn write_report(path: &Path, table: &ReportTable) -> Result<(), ReportError> {
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file);

    for record in table.to_records() {
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Reads a report back as plain records, header included
///
/// # Arguments
///
/// * 'path' - path of the report file
pub fn read_report(path: &Path) -> Result<Vec<Vec<String>>, ReportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        records.push(record?.iter().map(|c| c.to_string()).collect());
    }

    if records.is_empty() {
        return Err(ReportError::Malformed(format!("empty report: {}", path.display())));
    }

    Ok(records)
}
