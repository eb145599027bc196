//! Canonical salary record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the submitter holds a degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Degree {
    Yes,
    No,
}

impl Degree {
    pub fn as_str(&self) -> &'static str {
        match self {
            Degree::Yes => "Yes",
            Degree::No => "No",
        }
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized salary submission
///
/// Text attributes default to an empty string and numeric attributes to
/// `None`; `submission_date` is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    pub role: String,
    pub company_location: String,
    /// Monthly gross salary in local currency (ZMW)
    pub monthly_gross_salary: Option<f64>,
    pub salary_gross_usd: Option<f64>,
    pub years_of_experience: Option<u32>,
    pub degree: Option<Degree>,
    /// Approximate number of employees
    pub company_size: Option<u32>,
    pub your_location: String,
    pub nationality: String,
    pub industry: String,
    pub submission_date: DateTime<Utc>,
    /// USD to local currency rate at submission time
    pub exchange_rate: Option<f64>,
}

impl SalaryRecord {
    /// Empty record stamped with `submission_date`
    pub fn empty(submission_date: DateTime<Utc>) -> Self {
        Self {
            role: String::new(),
            company_location: String::new(),
            monthly_gross_salary: None,
            salary_gross_usd: None,
            years_of_experience: None,
            degree: None,
            company_size: None,
            your_location: String::new(),
            nationality: String::new(),
            industry: String::new(),
            submission_date,
            exchange_rate: None,
        }
    }
}

/// Canonical attributes in declared column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Role,
    CompanyLocation,
    MonthlyGrossSalary,
    SalaryGrossUsd,
    YearsOfExperience,
    Degree,
    CompanySize,
    YourLocation,
    Nationality,
    Industry,
    SubmissionDate,
    ExchangeRate,
}

impl Field {
    /// All fields in the order they appear in the CSV header
    pub const ALL: [Field; 12] = [
        Field::Role,
        Field::CompanyLocation,
        Field::MonthlyGrossSalary,
        Field::SalaryGrossUsd,
        Field::YearsOfExperience,
        Field::Degree,
        Field::CompanySize,
        Field::YourLocation,
        Field::Nationality,
        Field::Industry,
        Field::SubmissionDate,
        Field::ExchangeRate,
    ];

    /// Fields a submission must provide
    pub const REQUIRED: [Field; 9] = [
        Field::Role,
        Field::CompanyLocation,
        Field::MonthlyGrossSalary,
        Field::YearsOfExperience,
        Field::Degree,
        Field::CompanySize,
        Field::YourLocation,
        Field::Nationality,
        Field::Industry,
    ];

    /// Column name used in the CSV header
    pub fn header(&self) -> &'static str {
        match self {
            Field::Role => "Role",
            Field::CompanyLocation => "Company location",
            Field::MonthlyGrossSalary => "Monthly Gross Salary (in ZMW)",
            Field::SalaryGrossUsd => "Salary Gross in USD",
            Field::YearsOfExperience => "Years of Experience",
            Field::Degree => "Degree",
            Field::CompanySize => "Approx. No. of employees in company",
            Field::YourLocation => "Your Country/ Location",
            Field::Nationality => "Nationality",
            Field::Industry => "Industry",
            Field::SubmissionDate => "Submission Date",
            Field::ExchangeRate => "Real-time USD ZMW exchange rate",
        }
    }

    /// Column name in the `salary_records` table
    pub fn column(&self) -> &'static str {
        match self {
            Field::Role => "role",
            Field::CompanyLocation => "company_location",
            Field::MonthlyGrossSalary => "monthly_gross_salary",
            Field::SalaryGrossUsd => "salary_gross_usd",
            Field::YearsOfExperience => "years_of_experience",
            Field::Degree => "degree",
            Field::CompanySize => "company_size",
            Field::YourLocation => "your_location",
            Field::Nationality => "nationality",
            Field::Industry => "industry",
            Field::SubmissionDate => "submission_date",
            Field::ExchangeRate => "exchange_rate",
        }
    }

    /// Human-readable label shown in validation errors
    pub fn label(&self) -> &'static str {
        match self {
            Field::Role => "Role",
            Field::CompanyLocation => "Company Location",
            Field::MonthlyGrossSalary => "Monthly Gross Salary",
            Field::SalaryGrossUsd => "Salary Gross in USD",
            Field::YearsOfExperience => "Years of Experience",
            Field::Degree => "Degree",
            Field::CompanySize => "Company Size",
            Field::YourLocation => "Your Location",
            Field::Nationality => "Nationality",
            Field::Industry => "Industry",
            Field::SubmissionDate => "Submission Date",
            Field::ExchangeRate => "Exchange Rate",
        }
    }
}
