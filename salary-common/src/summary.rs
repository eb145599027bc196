//! Dashboard filtering and summary metrics
//!
//! Pure functions over an in-memory slice of normalized records. Salary
//! statistics only consider records with a monthly salary; everything else
//! counts every record in the slice.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::normalize::coerce;
use crate::record::{Degree, SalaryRecord};
use crate::{Error, Result};

/// Country option meaning "no country filter"
pub const ALL_COUNTRIES: &str = "All Countries";

/// Display label for records without a company location
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Number of industries and roles shown in ranked charts
pub const TOP_N: usize = 10;

pub const HISTOGRAM_BINS: usize = 10;

/// Record filter parsed from the dashboard query string
///
/// Unset fields do not filter. Range bounds exclude records missing the
/// bounded attribute.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecordFilter {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub min_experience: Option<u32>,
    #[serde(default)]
    pub max_experience: Option<u32>,
    #[serde(default)]
    pub min_salary: Option<f64>,
    #[serde(default)]
    pub max_salary: Option<f64>,
}

fn selected(value: &Option<String>, wildcards: &[&str]) -> Option<String> {
    let value = value.as_deref()?.trim();
    if value.is_empty() || wildcards.iter().any(|w| value.eq_ignore_ascii_case(w)) {
        None
    } else {
        Some(value.to_string())
    }
}

impl RecordFilter {
    /// Reject contradictory or unparseable criteria
    pub fn validate(&self) -> Result<()> {
        self.degree_filter()?;

        if let (Some(min), Some(max)) = (self.min_experience, self.max_experience) {
            if min > max {
                return Err(Error::InvalidInput(format!(
                    "min_experience ({}) exceeds max_experience ({})",
                    min, max
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_salary, self.max_salary) {
            if min > max {
                return Err(Error::InvalidInput(format!(
                    "min_salary ({}) exceeds max_salary ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }

    fn country_filter(&self) -> Option<String> {
        selected(&self.country, &[ALL_COUNTRIES, UNKNOWN_COUNTRY])
    }

    fn industry_filter(&self) -> Option<String> {
        selected(&self.industry, &["All Industries", "All"])
    }

    fn degree_filter(&self) -> Result<Option<Degree>> {
        match selected(&self.degree, &["All"]) {
            None => Ok(None),
            Some(value) => coerce::degree(&value)
                .map(Some)
                .map_err(|e| Error::InvalidInput(format!("degree: {}", e))),
        }
    }

    /// Whether `record` passes every set criterion
    ///
    /// An unparseable degree filter is ignored here; call [`validate`]
    /// first to reject it.
    ///
    /// [`validate`]: RecordFilter::validate
    pub fn matches(&self, record: &SalaryRecord) -> bool {
        if let Some(country) = self.country_filter() {
            if !record.company_location.eq_ignore_ascii_case(&country) {
                return false;
            }
        }

        if let Some(industry) = self.industry_filter() {
            if !record.industry.eq_ignore_ascii_case(&industry) {
                return false;
            }
        }

        if let Ok(Some(degree)) = self.degree_filter() {
            if record.degree != Some(degree) {
                return false;
            }
        }

        if self.min_experience.is_some() || self.max_experience.is_some() {
            let Some(years) = record.years_of_experience else {
                return false;
            };
            if self.min_experience.is_some_and(|min| years < min)
                || self.max_experience.is_some_and(|max| years > max)
            {
                return false;
            }
        }

        if self.min_salary.is_some() || self.max_salary.is_some() {
            let Some(salary) = record.monthly_gross_salary else {
                return false;
            };
            if self.min_salary.is_some_and(|min| salary < min)
                || self.max_salary.is_some_and(|max| salary > max)
            {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, records: Vec<SalaryRecord>) -> Vec<SalaryRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Newest submissions first; ties keep their load order
pub fn sort_newest_first(records: &mut [SalaryRecord]) {
    records.sort_by(|a, b| b.submission_date.cmp(&a.submission_date));
}

/// Choices for the dashboard filter controls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub countries: Vec<String>,
    pub industries: Vec<String>,
    pub degrees: Vec<String>,
}

pub fn filter_options(records: &[SalaryRecord]) -> FilterOptions {
    let countries: BTreeSet<&str> = records
        .iter()
        .map(|r| {
            if r.company_location.is_empty() {
                UNKNOWN_COUNTRY
            } else {
                r.company_location.as_str()
            }
        })
        .collect();

    let industries: BTreeSet<&str> = records
        .iter()
        .map(|r| r.industry.as_str())
        .filter(|i| !i.is_empty())
        .collect();

    let degrees = [Degree::Yes, Degree::No]
        .into_iter()
        .filter(|d| records.iter().any(|r| r.degree == Some(*d)))
        .map(|d| d.to_string())
        .collect();

    FilterOptions {
        countries: std::iter::once(ALL_COUNTRIES)
            .chain(countries)
            .map(str::to_string)
            .collect(),
        industries: industries.into_iter().map(str::to_string).collect(),
        degrees,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Five-number summary for a box chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryRange {
    pub industry: String,
    pub count: usize,
    /// `None` when no record in the industry reports a salary
    pub salary: Option<BoxStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleSalary {
    pub role: String,
    pub count: usize,
    pub average_salary: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub years_of_experience: u32,
    pub salary: f64,
}

/// Metrics and chart series for one filtered slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_entries: usize,
    /// Records contributing to the salary statistics
    pub salaried_entries: usize,
    pub average_salary: f64,
    pub median_salary: f64,
    pub min_salary: f64,
    pub max_salary: f64,
    pub unique_roles: usize,
    pub industries: Vec<IndustryRange>,
    pub degree_distribution: Vec<CategoryCount>,
    pub experience_buckets: Vec<CategoryCount>,
    pub salary_histogram: Vec<HistogramBin>,
    pub top_roles: Vec<RoleSalary>,
    pub scatter: Vec<ScatterPoint>,
}

impl Summary {
    pub fn compute(records: &[SalaryRecord]) -> Self {
        let mut salaries: Vec<f64> = records
            .iter()
            .filter_map(|r| r.monthly_gross_salary)
            .collect();
        salaries.sort_by(f64::total_cmp);

        let (average_salary, median_salary, min_salary, max_salary) = match (
            salaries.first(),
            salaries.last(),
        ) {
            (Some(&min), Some(&max)) => (
                salaries.iter().sum::<f64>() / salaries.len() as f64,
                quantile(&salaries, 0.5),
                min,
                max,
            ),
            _ => (0.0, 0.0, 0.0, 0.0),
        };

        let unique_roles = records
            .iter()
            .map(|r| r.role.as_str())
            .filter(|r| !r.is_empty())
            .collect::<BTreeSet<_>>()
            .len();

        let scatter = records
            .iter()
            .filter_map(|r| {
                Some(ScatterPoint {
                    years_of_experience: r.years_of_experience?,
                    salary: r.monthly_gross_salary?,
                })
            })
            .collect();

        Self {
            total_entries: records.len(),
            salaried_entries: salaries.len(),
            average_salary,
            median_salary,
            min_salary,
            max_salary,
            unique_roles,
            industries: industry_ranges(records),
            degree_distribution: degree_distribution(records),
            experience_buckets: experience_buckets(records),
            salary_histogram: histogram(&salaries, HISTOGRAM_BINS),
            top_roles: top_roles(records),
            scatter,
        }
    }
}

/// Linearly interpolated quantile of an ascending, non-empty slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn box_stats(values: &mut [f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    Some(BoxStats {
        min: values[0],
        q1: quantile(values, 0.25),
        median: quantile(values, 0.5),
        q3: quantile(values, 0.75),
        max: values[values.len() - 1],
    })
}

/// Group non-empty keys, most frequent first (ties by name)
fn ranked<'a, F>(records: &'a [SalaryRecord], key: F) -> Vec<(&'a str, Vec<&'a SalaryRecord>)>
where
    F: Fn(&'a SalaryRecord) -> &'a str,
{
    let mut groups: HashMap<&str, Vec<&SalaryRecord>> = HashMap::new();
    for record in records {
        let k = key(record);
        if !k.is_empty() {
            groups.entry(k).or_default().push(record);
        }
    }

    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));
    groups
}

fn industry_ranges(records: &[SalaryRecord]) -> Vec<IndustryRange> {
    ranked(records, |r| r.industry.as_str())
        .into_iter()
        .take(TOP_N)
        .map(|(industry, members)| {
            let mut salaries: Vec<f64> = members
                .iter()
                .filter_map(|r| r.monthly_gross_salary)
                .collect();
            IndustryRange {
                industry: industry.to_string(),
                count: members.len(),
                salary: box_stats(&mut salaries),
            }
        })
        .collect()
}

fn top_roles(records: &[SalaryRecord]) -> Vec<RoleSalary> {
    ranked(records, |r| r.role.as_str())
        .into_iter()
        .take(TOP_N)
        .map(|(role, members)| {
            let salaries: Vec<f64> = members
                .iter()
                .filter_map(|r| r.monthly_gross_salary)
                .collect();
            let average_salary = if salaries.is_empty() {
                None
            } else {
                Some(salaries.iter().sum::<f64>() / salaries.len() as f64)
            };
            RoleSalary {
                role: role.to_string(),
                count: members.len(),
                average_salary,
            }
        })
        .collect()
}

fn degree_distribution(records: &[SalaryRecord]) -> Vec<CategoryCount> {
    [Degree::Yes, Degree::No]
        .into_iter()
        .map(|d| CategoryCount {
            label: d.to_string(),
            count: records.iter().filter(|r| r.degree == Some(d)).count(),
        })
        .filter(|c| c.count > 0)
        .collect()
}

fn experience_buckets(records: &[SalaryRecord]) -> Vec<CategoryCount> {
    const BUCKETS: [(&str, u32, u32); 4] =
        [("0-2", 0, 2), ("3-5", 3, 5), ("6-10", 6, 10), ("10+", 11, u32::MAX)];

    BUCKETS
        .iter()
        .map(|(label, lo, hi)| CategoryCount {
            label: label.to_string(),
            count: records
                .iter()
                .filter_map(|r| r.years_of_experience)
                .filter(|y| (*lo..=*hi).contains(y))
                .count(),
        })
        .collect()
}

/// Equal-width bins over an ascending slice
///
/// A single-valued slice collapses into one zero-width bin.
fn histogram(sorted: &[f64], bins: usize) -> Vec<HistogramBin> {
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    if max <= min || bins == 0 {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: sorted.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in sorted {
        let index = (((value - min) / width).floor() as usize).min(bins - 1);
        out[index].count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn record(
        role: &str,
        location: &str,
        industry: &str,
        salary: Option<f64>,
        years: Option<u32>,
        degree: Option<Degree>,
    ) -> SalaryRecord {
        let mut r = SalaryRecord::empty(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        r.role = role.to_string();
        r.company_location = location.to_string();
        r.industry = industry.to_string();
        r.monthly_gross_salary = salary;
        r.years_of_experience = years;
        r.degree = degree;
        r
    }

    fn dataset() -> Vec<SalaryRecord> {
        vec![
            record("Accountant", "Lusaka", "Banking", Some(10000.0), Some(1), Some(Degree::Yes)),
            record("Accountant", "Lusaka", "Banking", Some(20000.0), Some(4), Some(Degree::Yes)),
            record("Engineer", "Kitwe", "Mining", Some(30000.0), Some(8), Some(Degree::No)),
            record("Nurse", "", "Health", None, Some(15), None),
        ]
    }

    #[test]
    fn test_empty_summary_is_zeroed() {
        let summary = Summary::compute(&[]);
        assert_eq!(summary.total_entries, 0);
        assert_eq!(summary.average_salary, 0.0);
        assert_eq!(summary.median_salary, 0.0);
        assert!(summary.industries.is_empty());
        assert!(summary.salary_histogram.is_empty());
        assert!(summary.experience_buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_summary_metrics() {
        let summary = Summary::compute(&dataset());

        assert_eq!(summary.total_entries, 4);
        assert_eq!(summary.salaried_entries, 3);
        assert_eq!(summary.average_salary, 20000.0);
        assert_eq!(summary.median_salary, 20000.0);
        assert_eq!(summary.min_salary, 10000.0);
        assert_eq!(summary.max_salary, 30000.0);
        assert_eq!(summary.unique_roles, 3);
        assert_eq!(summary.scatter.len(), 3);

        assert_eq!(summary.industries[0].industry, "Banking");
        assert_eq!(summary.industries[0].count, 2);
        let banking = summary.industries[0].salary.as_ref().unwrap();
        assert_eq!(banking.q1, 12500.0);
        assert_eq!(banking.median, 15000.0);
        let health = summary.industries.iter().find(|i| i.industry == "Health").unwrap();
        assert!(health.salary.is_none());

        assert_eq!(summary.top_roles[0].role, "Accountant");
        assert_eq!(summary.top_roles[0].average_salary, Some(15000.0));

        let buckets: Vec<usize> = summary.experience_buckets.iter().map(|b| b.count).collect();
        assert_eq!(buckets, vec![1, 1, 1, 1]);

        assert_eq!(
            summary.degree_distribution,
            vec![
                CategoryCount { label: "Yes".to_string(), count: 2 },
                CategoryCount { label: "No".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_histogram_bins() {
        let bins = histogram(&[0.0, 5.0, 10.0, 100.0], HISTOGRAM_BINS);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[1].count, 1);
        assert_eq!(bins[9].count, 1);
        assert_eq!(bins[9].end, 100.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 4);
    }

    #[test]
    fn test_histogram_single_value() {
        let bins = histogram(&[500.0, 500.0], HISTOGRAM_BINS);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
    }

    #[test]
    fn test_country_filter_wildcards() {
        let data = dataset();
        for wildcard in ["All Countries", "Unknown", ""] {
            let filter = RecordFilter {
                country: Some(wildcard.to_string()),
                ..Default::default()
            };
            assert_eq!(filter.apply(data.clone()).len(), 4);
        }

        let filter = RecordFilter {
            country: Some("lusaka".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(data).len(), 2);
    }

    #[test]
    fn test_range_filters_exclude_missing_values() {
        let filter = RecordFilter {
            min_salary: Some(15000.0),
            ..Default::default()
        };
        let kept = filter.apply(dataset());
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.monthly_gross_salary.is_some()));

        let filter = RecordFilter {
            min_experience: Some(3),
            max_experience: Some(10),
            ..Default::default()
        };
        assert_eq!(filter.apply(dataset()).len(), 2);
    }

    #[test]
    fn test_degree_filter() {
        let filter = RecordFilter {
            degree: Some("no".to_string()),
            ..Default::default()
        };
        assert!(filter.validate().is_ok());
        assert_eq!(filter.apply(dataset()).len(), 1);

        let bad = RecordFilter {
            degree: Some("maybe".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let filter = RecordFilter {
            min_salary: Some(5.0),
            max_salary: Some(1.0),
            ..Default::default()
        };
        assert!(filter.validate().is_err());
    }

    #[test]
    fn test_filter_options() {
        let options = filter_options(&dataset());
        assert_eq!(options.countries, vec!["All Countries", "Kitwe", "Lusaka", "Unknown"]);
        assert_eq!(options.industries, vec!["Banking", "Health", "Mining"]);
        assert_eq!(options.degrees, vec!["Yes", "No"]);

        let empty = filter_options(&[]);
        assert_eq!(empty.countries, vec!["All Countries"]);
    }

    #[test]
    fn test_sort_newest_first() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut data = dataset();
        for (i, r) in data.iter_mut().enumerate() {
            r.submission_date = base + Duration::days(i as i64);
        }
        sort_newest_first(&mut data);
        assert_eq!(data[0].role, "Nurse");
        assert_eq!(data[3].submission_date, base);
    }
}
