use chrono::Local;
use csv::Writer;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{prelude::*, Result};

use crate::types::WordEntry;

#[derive(Debug, Clone, Copy)]
pub enum FileFormat {
    Json,
    Csv,
}

/// Flat row shape for CSV output; the raw entries nest sequences the csv
/// writer cannot represent.
#[derive(Serialize)]
struct CsvWordRow {
    word: String,
    score: Option<u64>,
    num_syllables: Option<u32>,
    tags: String,
    defs: String,
}

impl From<&WordEntry> for CsvWordRow {
    fn from(entry: &WordEntry) -> Self {
        CsvWordRow {
            word: entry.word.clone(),
            score: entry.score,
            num_syllables: entry.num_syllables,
            tags: entry.tags.as_deref().unwrap_or_default().join(";"),
            defs: entry.defs.as_deref().unwrap_or_default().join("|"),
        }
    }
}

pub struct FileHandler;

impl FileHandler {
    ///
    /// # save
    /// Save fetched word entries to a file in the data directory.
    ///
    /// ## Arguments
    /// * `entries` - Word entries to save
    /// * `format` - File format to save as
    /// * `filename_prefix` - Prefix for the filename
    ///
    /// ## Returns
    /// * `Result<String>` - Filename of the saved file
    pub fn save(
        entries: &[WordEntry],
        format: FileFormat,
        filename_prefix: &str,
    ) -> Result<String> {
        // Create data directory if it doesn't exist
        fs::create_dir_all("data")?;

        // Generate timestamp
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");

        // Create filename with timestamp
        let filename = format!(
            "data/{}_{}.{}",
            filename_prefix,
            timestamp,
            match format {
                FileFormat::Json => "json",
                FileFormat::Csv => "csv",
            }
        );

        match format {
            FileFormat::Json => Self::save_as_json(entries, &filename),
            FileFormat::Csv => Self::save_as_csv(entries, &filename),
        }?;

        Ok(filename)
    }

    ///
    /// # save_as_json
    /// Save word entries to a JSON file.
    ///
    /// ## Arguments
    /// * `entries` - Word entries to save
    /// * `filename` - Filename to save as
    fn save_as_json(entries: &[WordEntry], filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let mut file = File::create(filename)?;

        file.write_all(json.as_bytes())?;

        Ok(())
    }

    ///
    /// # save_as_csv
    /// Save word entries to a CSV file, one flattened row per entry.
    ///
    /// ## Arguments
    /// * `entries` - Word entries to save
    /// * `filename` - Filename to save as
    fn save_as_csv(entries: &[WordEntry], filename: &str) -> Result<()> {
        let mut writer = Writer::from_path(filename)?;

        for entry in entries {
            writer.serialize(CsvWordRow::from(entry))?;
        }

        writer.flush()?;
        Ok(())
    }
}
