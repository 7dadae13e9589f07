use crate::reference::{self, MUNICIPALITIES};
use crate::types::{CrimeTypeId, IncidentRecord, Municipality};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use strum::IntoEnumIterator;

/// The full, immutable incident record set.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<IncidentRecord>,
    years: Vec<i32>,
}

impl Dataset {
    #[must_use]
    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    #[must_use]
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Builds the synthetic dataset: one record for every
/// municipality × year × month × crime type combination.
///
/// The grid is fixed; only the case counts are random. Passing a seed makes
/// the magnitudes reproducible.
#[derive(Debug, Clone)]
pub struct DatasetGenerator<'a> {
    municipalities: &'a [Municipality],
    years: Vec<i32>,
    seed: Option<u64>,
}

impl DatasetGenerator<'static> {
    /// Generator over the static municipality list and the three-year window
    /// ending at `current_year`.
    #[must_use]
    pub fn new(current_year: i32) -> Self {
        Self {
            municipalities: MUNICIPALITIES,
            years: reference::year_window(current_year),
            seed: None,
        }
    }
}

impl<'a> DatasetGenerator<'a> {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_municipalities<'b>(self, municipalities: &'b [Municipality]) -> DatasetGenerator<'b> {
        DatasetGenerator {
            municipalities,
            years: self.years,
            seed: self.seed,
        }
    }

    #[must_use]
    pub fn with_years(mut self, years: Vec<i32>) -> Self {
        self.years = years;
        self
    }

    pub fn generate(&self) -> Dataset {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let capacity = self.municipalities.len() * self.years.len() * 12 * CrimeTypeId::iter().len();
        let mut records = Vec::with_capacity(capacity);

        for municipality in self.municipalities {
            let population_factor = municipality.population as f64 / 100_000.0;
            let local_factor = municipality_factor(municipality.id);
            for &year in &self.years {
                for month in 1..=12u32 {
                    let seasonal = seasonal_variation(month);
                    for crime_type in CrimeTypeId::iter() {
                        let noise: f64 = rng.gen_range(0.7..1.3);
                        let expected =
                            base_rate(crime_type) * population_factor * seasonal * noise * local_factor;
                        // `expected` is never negative: every factor is positive.
                        let cases = expected.round().max(0.0) as u64;
                        records.push(IncidentRecord::new(municipality, year, month, crime_type, cases));
                    }
                }
            }
        }

        log::info!(
            "Generated {} incident records ({} municipalities, years {:?}, seed {:?})",
            records.len(),
            self.municipalities.len(),
            self.years,
            self.seed
        );

        Dataset {
            records,
            years: self.years.clone(),
        }
    }
}

/// Expected monthly cases per 100k inhabitants before variation.
fn base_rate(crime_type: CrimeTypeId) -> f64 {
    match crime_type {
        CrimeTypeId::Homicidio => 5.0,
        CrimeTypeId::Furto => 10.0,
        CrimeTypeId::Roubo => 30.0,
        CrimeTypeId::Estupro => 5.0,
        CrimeTypeId::LesaoCorporal => 40.0,
    }
}

/// Relative crime level per municipality; larger means more cases.
fn municipality_factor(id: u32) -> f64 {
    match id {
        1 => 1.7,
        2 | 7 | 8 => 1.0,
        3 => 1.1,
        4 | 15 => 0.5,
        5 | 6 => 0.6,
        9..=14 => 0.4,
        _ => 1.0,
    }
}

/// Sinusoidal yearly cycle in [0.7, 1.3], peaking in April.
fn seasonal_variation(month: u32) -> f64 {
    (f64::from(month - 1) * PI / 6.0).sin() * 0.3 + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn produces_complete_grid() {
        let dataset = DatasetGenerator::new(2026).with_seed(7).generate();
        assert_eq!(dataset.len(), MUNICIPALITIES.len() * 3 * 12 * 5);
        assert_eq!(dataset.years(), &[2024, 2025, 2026]);

        let ids: HashSet<&str> = dataset.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), dataset.len());
    }

    #[test]
    fn records_reference_known_data() {
        let dataset = DatasetGenerator::new(2026).with_seed(1).generate();
        for r in dataset.records() {
            let m = reference::municipality(r.municipality_id).unwrap();
            assert_eq!(r.population, m.population);
            assert!((1..=12).contains(&r.month));
        }
    }

    #[test]
    fn same_seed_same_magnitudes() {
        let a = DatasetGenerator::new(2026).with_seed(42).generate();
        let b = DatasetGenerator::new(2026).with_seed(42).generate();
        assert_eq!(a.records(), b.records());
    }

    #[test]
    fn custom_municipalities_and_years() {
        let towns = [Municipality {
            id: 1,
            name: "Vila",
            population: 1000,
            lat: 0.0,
            lng: 0.0,
        }];
        let dataset = DatasetGenerator::new(2026)
            .with_municipalities(&towns)
            .with_years(vec![2020])
            .with_seed(3)
            .generate();
        assert_eq!(dataset.len(), 12 * 5);
        assert!(!dataset.is_empty());
        assert!(dataset.records().iter().all(|r| r.year == 2020));
    }

    #[test]
    fn no_years_means_no_records() {
        let dataset = DatasetGenerator::new(2026).with_years(Vec::new()).generate();
        assert!(dataset.is_empty());
        assert!(dataset.years().is_empty());
    }

    #[test]
    fn seasonal_cycle_bounds() {
        for month in 1..=12 {
            let v = seasonal_variation(month);
            assert!((0.7..=1.3).contains(&v));
        }
        assert!((seasonal_variation(1) - 1.0).abs() < 1e-12);
    }
}
