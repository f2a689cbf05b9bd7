// src/record.rs

use serde::{Deserialize, Serialize};

/// Placeholder for an indicator that could not be scraped.
pub const ABSENT: &str = "N/A";

/// Header of the raw CSV, in column order.
pub const RAW_COLUMNS: [&str; 11] = [
    "Country",
    "Life Expectancy",
    "Year (Life Expectancy)",
    "Population",
    "Year (Population)",
    "GDP (Current US$)",
    "Year (GDP)",
    "GDP Per Capita (Current US$)",
    "Year (GDP Per Capita)",
    "Access to Electricity (% Of Population)",
    "Year (Access Electricity)",
];

/// Header of the processed CSV, in column order.
pub const PROCESSED_COLUMNS: [&str; 11] = [
    "Country",
    "Life Expectancy",
    "Year (Life Expectancy)",
    "Population Normalized",
    "Year (Population)",
    "GDP Normalized (Current $US)",
    "Year (GDP)",
    "GDP Per Capita (Current US$)",
    "Year (GDP Per Capita)",
    "Access to Electricity (% Of Population)",
    "Year (Access Electricity)",
];

/// The five indicators scraped from every country page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    LifeExpectancy,
    Population,
    Gdp,
    GdpPerCapita,
    ElectricityAccess,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::LifeExpectancy,
        Indicator::Population,
        Indicator::Gdp,
        Indicator::GdpPerCapita,
        Indicator::ElectricityAccess,
    ];

    /// Anchor text identifying the indicator panel on a country page.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::LifeExpectancy => "Life expectancy at birth, total (years)",
            Indicator::Population => "Population, total",
            Indicator::Gdp => "GDP (current US$)",
            Indicator::GdpPerCapita => "GDP per capita (current US$)",
            Indicator::ElectricityAccess => "Access to electricity (% of population)",
        }
    }
}

/// One scraped row. Every value is kept as the text found on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Life Expectancy")]
    pub life_expectancy: String,
    #[serde(rename = "Year (Life Expectancy)")]
    pub life_expectancy_year: String,
    #[serde(rename = "Population")]
    pub population: String,
    #[serde(rename = "Year (Population)")]
    pub population_year: String,
    #[serde(rename = "GDP (Current US$)")]
    pub gdp: String,
    #[serde(rename = "Year (GDP)")]
    pub gdp_year: String,
    #[serde(rename = "GDP Per Capita (Current US$)")]
    pub gdp_per_capita: String,
    #[serde(rename = "Year (GDP Per Capita)")]
    pub gdp_per_capita_year: String,
    #[serde(rename = "Access to Electricity (% Of Population)")]
    pub electricity_access: String,
    #[serde(rename = "Year (Access Electricity)")]
    pub electricity_access_year: String,
}

impl CountryRecord {
    /// A record with every indicator set to [`ABSENT`].
    pub fn absent(country: impl Into<String>) -> Self {
        let na = || ABSENT.to_string();
        Self {
            country: country.into(),
            life_expectancy: na(),
            life_expectancy_year: na(),
            population: na(),
            population_year: na(),
            gdp: na(),
            gdp_year: na(),
            gdp_per_capita: na(),
            gdp_per_capita_year: na(),
            electricity_access: na(),
            electricity_access_year: na(),
        }
    }

    /// Mutable (value, year) pair for `indicator`.
    pub fn slot_mut(&mut self, indicator: Indicator) -> (&mut String, &mut String) {
        match indicator {
            Indicator::LifeExpectancy => (&mut self.life_expectancy, &mut self.life_expectancy_year),
            Indicator::Population => (&mut self.population, &mut self.population_year),
            Indicator::Gdp => (&mut self.gdp, &mut self.gdp_year),
            Indicator::GdpPerCapita => (&mut self.gdp_per_capita, &mut self.gdp_per_capita_year),
            Indicator::ElectricityAccess => (
                &mut self.electricity_access,
                &mut self.electricity_access_year,
            ),
        }
    }

    /// True when no indicator was found for this country.
    pub fn is_all_absent(&self) -> bool {
        [
            &self.life_expectancy,
            &self.population,
            &self.gdp,
            &self.gdp_per_capita,
            &self.electricity_access,
        ]
        .iter()
        .all(|v| v.as_str() == ABSENT)
    }
}

/// A row of the processed table. Field order is the processed CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Life Expectancy")]
    pub life_expectancy: i64,
    #[serde(rename = "Year (Life Expectancy)")]
    pub life_expectancy_year: i64,
    #[serde(rename = "Population Normalized")]
    pub population_normalized: i64,
    #[serde(rename = "Year (Population)")]
    pub population_year: i64,
    #[serde(rename = "GDP Normalized (Current $US)")]
    pub gdp_normalized: i64,
    #[serde(rename = "Year (GDP)")]
    pub gdp_year: i64,
    #[serde(rename = "GDP Per Capita (Current US$)")]
    pub gdp_per_capita: f64,
    #[serde(rename = "Year (GDP Per Capita)")]
    pub gdp_per_capita_year: i64,
    #[serde(rename = "Access to Electricity (% Of Population)")]
    pub electricity_access: f64,
    #[serde(rename = "Year (Access Electricity)")]
    pub electricity_access_year: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_record_has_sentinel_everywhere() {
        let rec = CountryRecord::absent("Chile");
        assert_eq!(rec.country, "Chile");
        assert!(rec.is_all_absent());
        assert_eq!(rec.electricity_access_year, ABSENT);
    }

    #[test]
    fn slot_mut_targets_matching_columns() {
        let mut rec = CountryRecord::absent("Chile");
        let (value, year) = rec.slot_mut(Indicator::Gdp);
        *value = "301.0".into();
        *year = "2022 billion".into();
        assert_eq!(rec.gdp, "301.0");
        assert_eq!(rec.gdp_year, "2022 billion");
        assert_eq!(rec.population, ABSENT);
        assert!(!rec.is_all_absent());
    }
}
