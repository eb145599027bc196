//! CSV-file record store
//!
//! New submissions go to one append-only file. An optional read-only seed
//! file (the historical dataset the dashboard launched with) is loaded
//! ahead of it but never written.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::{RecordStore, StoreBackend};
use crate::normalize::{normalize, RawRow};
use crate::record::{Field, SalaryRecord};
use crate::{time, Error, Result};

pub struct CsvStore {
    path: PathBuf,
    seed_path: Option<PathBuf>,
    /// Serializes appends; readers never take it. The guard travels into the
    /// blocking write so a dropped caller cannot release it early.
    write_lock: Arc<Mutex<()>>,
    /// Submission date given to rows whose date is missing or unparseable
    load_fallback: DateTime<Utc>,
}

impl CsvStore {
    /// Open (creating with a header row if needed) the submissions file
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        ensure_csv_exists(&path)?;
        Ok(Self {
            path,
            seed_path: None,
            write_lock: Arc::new(Mutex::new(())),
            load_fallback: time::now(),
        })
    }

    /// Also load rows from a read-only seed file
    pub fn with_seed(mut self, seed_path: impl Into<PathBuf>) -> Self {
        self.seed_path = Some(seed_path.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for CsvStore {
    async fn load_all(&self) -> Result<Vec<SalaryRecord>> {
        let mut paths = Vec::with_capacity(2);
        if let Some(seed) = &self.seed_path {
            paths.push(seed.clone());
        }
        paths.push(self.path.clone());
        let fallback = self.load_fallback;

        tokio::task::spawn_blocking(move || -> Result<Vec<SalaryRecord>> {
            let mut records = Vec::new();
            for path in &paths {
                records.extend(read_records(path, fallback)?);
            }
            Ok(records)
        })
        .await
        .map_err(|e| Error::Internal(format!("CSV load task failed: {}", e)))?
    }

    async fn append(&self, record: &SalaryRecord) -> Result<()> {
        let row = encode_row(record)?;
        let guard = self.write_lock.clone().lock_owned().await;

        let path = self.path.clone();
        let result = tokio::task::spawn_blocking(move || {
            let result = append_row(&path, &row);
            drop(guard);
            result
        })
        .await
        .map_err(|e| Error::Internal(format!("CSV append task failed: {}", e)))?;

        match result {
            Ok(()) => {
                debug!("Appended record to {}", self.path.display());
                Ok(())
            }
            Err(e) => {
                error!("Failed to append to {}: {}", self.path.display(), e);
                Err(Error::Persistence(e.to_string()))
            }
        }
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Csv
    }
}

fn header_row() -> Vec<&'static str> {
    Field::ALL.iter().map(|f| f.header()).collect()
}

fn writer_builder() -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'));
    builder
}

fn encode<I, T>(fields: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut wtr = writer_builder().from_writer(Vec::new());
    wtr.write_record(fields)?;
    wtr.into_inner()
        .map_err(|e| Error::Internal(format!("CSV buffer flush failed: {}", e)))
}

/// Serialize one record in header order
fn encode_row(record: &SalaryRecord) -> Result<Vec<u8>> {
    fn opt<T: ToString>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    let fields: Vec<String> = Field::ALL
        .iter()
        .map(|field| match field {
            Field::Role => record.role.clone(),
            Field::CompanyLocation => record.company_location.clone(),
            Field::MonthlyGrossSalary => opt(record.monthly_gross_salary),
            Field::SalaryGrossUsd => opt(record.salary_gross_usd),
            Field::YearsOfExperience => opt(record.years_of_experience),
            Field::Degree => opt(record.degree),
            Field::CompanySize => opt(record.company_size),
            Field::YourLocation => record.your_location.clone(),
            Field::Nationality => record.nationality.clone(),
            Field::Industry => record.industry.clone(),
            Field::SubmissionDate => time::format_csv_date(&record.submission_date),
            Field::ExchangeRate => opt(record.exchange_rate),
        })
        .collect();

    encode(&fields)
}

/// Create the file with its header row if it does not exist
fn ensure_csv_exists(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        fs::write(path, encode(header_row())?)?;
        info!("Created submissions file: {}", path.display());
    }
    Ok(())
}

fn append_row(path: &Path, row: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?;

    let len = file.metadata()?.len();
    if len == 0 {
        file.write_all(&encode(header_row())?)?;
    } else {
        // A hand-edited file may lack its trailing newline
        let mut last = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1))?;
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            file.write_all(b"\n")?;
        }
    }

    file.write_all(row)?;
    file.sync_data()?;
    Ok(())
}

/// Read and normalize every row of `path`; a missing file reads as empty
fn read_records(path: &Path, fallback: DateTime<Utc>) -> Result<Vec<SalaryRecord>> {
    if !path.exists() {
        debug!("CSV file not present, skipping: {}", path.display());
        return Ok(Vec::new());
    }

    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| lossy(h).trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (line, result) in rdr.byte_records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping undecodable row {} in {}: {}", line + 2, path.display(), e);
                continue;
            }
        };

        let values: Vec<String> = row.iter().map(lossy).collect();
        if values.iter().all(|v| v.trim().is_empty()) {
            continue;
        }

        let raw: RawRow = headers.iter().cloned().zip(values).collect();
        records.push(normalize(&raw, fallback));
    }

    debug!("Loaded {} rows from {}", records.len(), path.display());
    Ok(records)
}

/// Decode a field, replacing invalid UTF-8 rather than dropping the row
fn lossy(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}
