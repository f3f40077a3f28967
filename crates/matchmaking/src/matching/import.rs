use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{ProfileDraft, ProfileSubmission};
use super::validation::{self, ValidationError};

const PICTURE_SEPARATOR: char = '|';

#[derive(Debug)]
pub enum ProfileImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row {
        line: u64,
        source: ValidationError,
    },
}

impl std::fmt::Display for ProfileImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileImportError::Io(err) => write!(f, "failed to read profile seed file: {}", err),
            ProfileImportError::Csv(err) => write!(f, "invalid profile CSV data: {}", err),
            ProfileImportError::Row { line, source } => {
                write!(f, "profile on line {} rejected: {}", line, source)
            }
        }
    }
}

impl std::error::Error for ProfileImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProfileImportError::Io(err) => Some(err),
            ProfileImportError::Csv(err) => Some(err),
            ProfileImportError::Row { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for ProfileImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ProfileImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads unowned seed profiles from CSV with the header
/// `name,age,pictures,latitude,longitude,bio,city`.
///
/// Pictures are `|`-separated. Empty cells read as absent values. Every row
/// passes the same validation as an API submission.
pub struct ProfileImporter;

impl ProfileImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ProfileDraft>, ProfileImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ProfileDraft>, ProfileImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut drafts = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            let row: SeedRow = record.deserialize(Some(&headers))?;
            let draft = validation::profile_draft(row.into_submission())
                .map_err(|source| ProfileImportError::Row { line, source })?;
            drafts.push(draft);
        }

        Ok(drafts)
    }
}

#[derive(Debug, Deserialize)]
struct SeedRow {
    name: String,
    age: u8,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pictures: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    bio: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
}

impl SeedRow {
    fn into_submission(self) -> ProfileSubmission {
        let pictures = self
            .pictures
            .map(|raw| {
                raw.split(PICTURE_SEPARATOR)
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        ProfileSubmission {
            name: self.name,
            age: self.age,
            pictures,
            latitude: self.latitude,
            longitude: self.longitude,
            bio: self.bio,
            city: self.city,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
