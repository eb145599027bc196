//! Column alias table (contract version 1)
//!
//! Each canonical field lists the header names it has been stored or
//! submitted under, highest priority first. The first entry is always the
//! canonical CSV header. Changing this table changes which historical
//! datasets load cleanly; bump [`ALIAS_TABLE_VERSION`] when doing so.

use crate::record::Field;

pub const ALIAS_TABLE_VERSION: u32 = 1;

pub static ALIASES: &[(Field, &[&str])] = &[
    (Field::Role, &["Role", "role", "Job Title", "job_title"]),
    (
        Field::CompanyLocation,
        &[
            "Company location",
            "company_location",
            "Company location (Country)",
            "company_location_country",
            "Company Location",
        ],
    ),
    (
        Field::MonthlyGrossSalary,
        &[
            "Monthly Gross Salary (in ZMW)",
            "Monthly Gross Salary ZMW",
            "monthly_gross_salary_zmw",
            "Monthly Gross Salary",
            "monthly_gross_salary",
            "Monthly Salary (ZMW)",
        ],
    ),
    (
        Field::SalaryGrossUsd,
        &[
            "Salary Gross in USD",
            "Salary Gross in USD (leave blank if you get paid in ZMW)",
            "salary_gross_usd",
        ],
    ),
    (
        Field::YearsOfExperience,
        &["Years of Experience", "years_of_experience"],
    ),
    (Field::Degree, &["Degree", "Degree (or not)", "degree"]),
    (
        Field::CompanySize,
        &[
            "Approx. No. of employees in company",
            "approx_no_of_employees",
            "approx_employees",
            "company_size",
            "Company Size",
        ],
    ),
    (
        Field::YourLocation,
        &[
            "Your Country/ Location",
            "country_location",
            "your_country_location",
            "your_location",
            "Your Location",
        ],
    ),
    (Field::Nationality, &["Nationality", "nationality"]),
    (Field::Industry, &["Industry", "industry"]),
    (
        Field::SubmissionDate,
        &["Submission Date", "submission_date"],
    ),
    (
        Field::ExchangeRate,
        &[
            "Real-time USD ZMW exchange rate",
            "realtime_usd_zmw_rate",
            "exchange_rate",
        ],
    ),
];

/// Candidate header names for `field`, highest priority first
pub fn aliases_for(field: Field) -> &'static [&'static str] {
    ALIASES
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, names)| *names)
        .unwrap_or(&[])
}
