// src/process/mod.rs

use tracing::debug;

use crate::record::{CountryRecord, NormalizedRecord};

pub mod convert;
pub mod magnitude;

use convert::{float_to_int, to_float, to_float_grouped, to_int};
use magnitude::{normalize_magnitude, strip_magnitude};

/// Turn one raw row into its processed form.
///
/// GDP and population are scaled by the magnitude word in their year
/// column, the word is then stripped from the year, and every other column
/// is coerced to its numeric type (0 on failure).
pub fn normalize_record(raw: &CountryRecord) -> NormalizedRecord {
    let gdp = normalize_magnitude(&raw.gdp, &raw.gdp_year);
    let population = normalize_magnitude(&raw.population, &raw.population_year);

    NormalizedRecord {
        country: raw.country.clone(),
        life_expectancy: to_int(&raw.life_expectancy),
        life_expectancy_year: to_int(&raw.life_expectancy_year),
        population_normalized: float_to_int(population),
        population_year: to_int(&strip_magnitude(&raw.population_year)),
        gdp_normalized: float_to_int(gdp),
        gdp_year: to_int(&strip_magnitude(&raw.gdp_year)),
        gdp_per_capita: to_float_grouped(&raw.gdp_per_capita),
        gdp_per_capita_year: to_int(&raw.gdp_per_capita_year),
        electricity_access: to_float(&raw.electricity_access),
        electricity_access_year: to_int(&raw.electricity_access_year),
    }
}

/// Normalize a whole raw table, preserving row order.
pub fn process_table(raw: &[CountryRecord]) -> Vec<NormalizedRecord> {
    debug!(rows = raw.len(), "normalizing table");
    raw.iter().map(normalize_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ABSENT;

    fn peru() -> CountryRecord {
        CountryRecord {
            country: "Peru".into(),
            life_expectancy: "73.4".into(),
            life_expectancy_year: "2021".into(),
            population: "1,300".into(),
            population_year: "2020 (million)".into(),
            gdp: "242.6".into(),
            gdp_year: "2022 billion".into(),
            gdp_per_capita: "7,125.8".into(),
            gdp_per_capita_year: "2022".into(),
            electricity_access: "95.1".into(),
            electricity_access_year: "2021".into(),
        }
    }

    #[test]
    fn population_scaled_from_year_keyword() {
        let out = normalize_record(&peru());
        assert_eq!(out.population_normalized, 1_300_000_000);
        assert_eq!(out.population_year, 2020);
    }

    #[test]
    fn decimal_population_in_millions() {
        let mut rec = peru();
        rec.population = "1.3".into();
        let out = normalize_record(&rec);
        assert_eq!(out.population_normalized, 1_300_000);
        assert_eq!(out.population_year, 2020);
    }

    #[test]
    fn full_row_is_typed() {
        let out = normalize_record(&peru());
        assert_eq!(
            out,
            NormalizedRecord {
                country: "Peru".into(),
                life_expectancy: 73,
                life_expectancy_year: 2021,
                population_normalized: 1_300_000_000,
                population_year: 2020,
                gdp_normalized: 242_600_000_000,
                gdp_year: 2022,
                gdp_per_capita: 7125.8,
                gdp_per_capita_year: 2022,
                electricity_access: 95.1,
                electricity_access_year: 2021,
            }
        );
    }

    #[test]
    fn absent_values_become_zero() {
        let out = normalize_record(&CountryRecord::absent("Atlantis"));
        assert_eq!(out.country, "Atlantis");
        assert_eq!(out.life_expectancy, 0);
        assert_eq!(out.population_normalized, 0);
        assert_eq!(out.gdp_year, 0);
        assert_eq!(out.gdp_per_capita, 0.0);
        assert_eq!(out.electricity_access, 0.0);
        assert_eq!(CountryRecord::absent("x").gdp, ABSENT);
    }

    #[test]
    fn keeps_row_order_and_count() {
        let mut chile = peru();
        chile.country = "Chile".into();
        let out = process_table(&[peru(), chile, CountryRecord::absent("Peru")]);
        let names: Vec<_> = out.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["Peru", "Chile", "Peru"]);
        assert!(process_table(&[]).is_empty());
    }
}
