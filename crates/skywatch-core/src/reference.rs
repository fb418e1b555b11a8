//! Aircraft reference table loaded once from CSV.
//!
//! The table is read-only after load. Lookups scan every row; there is no index.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use regex::Regex;
use thiserror::Error;

use crate::models::AircraftReferenceRow;

/// Maximum number of models returned by [`ReferenceTable::match_keywords`].
pub const MAX_MATCHES: usize = 3;

const REQUIRED_HEADERS: [&str; 5] = [
    "Aircraft Model",
    "Engine Configuration",
    "Tail Configuration",
    "Wing Configuration",
    "Distinctive Features",
];

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to open reference table {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed reference table: {0}")]
    Csv(#[from] csv::Error),
    #[error("reference table is missing column {0:?}")]
    MissingColumn(&'static str),
    #[error("invalid clue word {word:?}: {source}")]
    Pattern {
        word: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("aircraft model {0:?} not found")]
pub struct ModelNotFound(pub String);

#[derive(Debug)]
struct Entry {
    row: AircraftReferenceRow,
    /// One whole-word pattern per clue word, duplicates kept.
    clue_patterns: Vec<Regex>,
}

/// Immutable visual-identification dataset.
#[derive(Debug)]
pub struct ReferenceTable {
    entries: Vec<Entry>,
}

impl ReferenceTable {
    /// Load the table from a CSV file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ReferenceError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            rows = table.len(),
            "Loaded aircraft reference table"
        );
        Ok(table)
    }

    /// Parse the table from any CSV source with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReferenceError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = rdr.headers()?.clone();
        for required in REQUIRED_HEADERS {
            if !headers.iter().any(|h| h == required) {
                return Err(ReferenceError::MissingColumn(required));
            }
        }

        let mut entries = Vec::new();
        for record in rdr.deserialize::<AircraftReferenceRow>() {
            let row = record?;
            let clue_patterns = compile_clues(&row.clue_text())?;
            entries.push(Entry { row, clue_patterns });
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AircraftReferenceRow> {
        self.entries.iter().map(|entry| &entry.row)
    }

    /// Row whose model name equals `model`, ignoring case.
    pub fn find_model(&self, model: &str) -> Result<&AircraftReferenceRow, ModelNotFound> {
        let wanted = model.trim().to_lowercase();
        self.iter()
            .find(|row| row.model.trim().to_lowercase() == wanted)
            .ok_or_else(|| ModelNotFound(model.to_string()))
    }

    /// Score every row by clue-word overlap with `description`.
    ///
    /// Returns at most [`MAX_MATCHES`] model names with a nonzero score, best first.
    /// Equal scores keep table order.
    pub fn match_keywords(&self, description: &str) -> Vec<String> {
        let description = description.to_lowercase();

        let mut scored: Vec<(usize, &str)> = self
            .entries
            .iter()
            .map(|entry| {
                let score = entry
                    .clue_patterns
                    .iter()
                    .filter(|pattern| pattern.is_match(&description))
                    .count();
                (score, entry.row.model.as_str())
            })
            .filter(|(score, _)| *score > 0)
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(MAX_MATCHES)
            .map(|(_, model)| model.to_string())
            .collect()
    }
}

/// Split clue text into lowercase words and build a whole-word pattern for each.
fn compile_clues(clue_text: &str) -> Result<Vec<Regex>, ReferenceError> {
    clue_text
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .map(|word| {
            Regex::new(&format!(r"\b{}\b", regex::escape(&word)))
                .map_err(|source| ReferenceError::Pattern { word, source })
        })
        .collect()
}
