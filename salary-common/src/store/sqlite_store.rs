//! SQLite record store
//!
//! One `salary_records` table with an autoincrement identity. Rows are read
//! back value by value as text and passed through the normalizer, so values
//! written by other tools (a stray `'N/A'` in a REAL column) degrade to
//! `None` instead of failing the load.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqlitePoolOptions, SqliteRow},
    Row, SqlitePool,
};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::{RecordStore, StoreBackend};
use crate::normalize::{normalize, RawRow};
use crate::record::{Field, SalaryRecord};
use crate::{time, Error, Result};

pub struct SqliteStore {
    pool: SqlitePool,
    /// Serializes appends; readers never take it
    write_lock: Mutex<()>,
    /// Submission date given to rows whose date is missing or unparseable
    load_fallback: DateTime<Utc>,
}

impl SqliteStore {
    /// Open (creating if needed) the database file and its schema
    pub async fn open(db_path: &Path) -> Result<Self> {
        let newly_created = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        if newly_created {
            info!("Initialized new database: {}", db_path.display());
        } else {
            info!("Opened existing database: {}", db_path.display());
        }

        // WAL lets dashboard reads proceed while a submission is written
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;

        sqlx::query("PRAGMA busy_timeout = 5000")
            .execute(&pool)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the schema if needed
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        create_salary_records_table(&pool).await?;
        Ok(Self {
            pool,
            write_lock: Mutex::new(()),
            load_fallback: time::now(),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn insert(&self, record: &SalaryRecord) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO salary_records (
                role, company_location, monthly_gross_salary, salary_gross_usd,
                years_of_experience, degree, company_size, your_location,
                nationality, industry, submission_date, exchange_rate
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.role)
        .bind(&record.company_location)
        .bind(record.monthly_gross_salary)
        .bind(record.salary_gross_usd)
        .bind(record.years_of_experience.map(i64::from))
        .bind(record.degree.map(|d| d.as_str()))
        .bind(record.company_size.map(i64::from))
        .bind(&record.your_location)
        .bind(&record.nationality)
        .bind(&record.industry)
        .bind(record.submission_date.to_rfc3339())
        .bind(record.exchange_rate)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;
        Ok(id)
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn load_all(&self) -> Result<Vec<SalaryRecord>> {
        let select = Field::ALL
            .iter()
            .map(|f| f.column())
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("SELECT {} FROM salary_records ORDER BY id", select);

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let records: Vec<SalaryRecord> = rows
            .iter()
            .map(|row| {
                let raw: RawRow = Field::ALL
                    .iter()
                    .filter_map(|field| {
                        column_text(row, field.column())
                            .map(|value| (field.column().to_string(), value))
                    })
                    .collect();
                normalize(&raw, self.load_fallback)
            })
            .collect();

        debug!("Loaded {} rows from salary_records", records.len());
        Ok(records)
    }

    async fn append(&self, record: &SalaryRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        match self.insert(record).await {
            Ok(id) => {
                debug!("Inserted salary record {}", id);
                Ok(())
            }
            Err(e) => {
                error!("Failed to insert salary record: {}", e);
                Err(Error::Persistence(e.to_string()))
            }
        }
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Sqlite
    }
}

/// Render one column as text whatever its storage class
///
/// REAL values use the shortest representation that parses back to the same
/// `f64`; SQLite's own text conversion keeps only 15 significant digits.
fn column_text(row: &SqliteRow, column: &str) -> Option<String> {
    if let Ok(value) = row.try_get::<Option<String>, _>(column) {
        return value;
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(column) {
        return value.map(|v| v.to_string());
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(column) {
        return value.map(|v| v.to_string());
    }
    debug!("Unreadable value in column {}", column);
    None
}

/// Create the salary_records table
pub async fn create_salary_records_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS salary_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            role TEXT NOT NULL,
            company_location TEXT NOT NULL,
            monthly_gross_salary REAL,
            salary_gross_usd REAL,
            years_of_experience INTEGER,
            degree TEXT,
            company_size INTEGER,
            your_location TEXT NOT NULL,
            nationality TEXT NOT NULL,
            industry TEXT NOT NULL,
            submission_date TEXT NOT NULL,
            exchange_rate REAL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_salary_records_company_location ON salary_records(company_location)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_salary_records_industry ON salary_records(industry)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_salary_records_submission_date ON salary_records(submission_date)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
