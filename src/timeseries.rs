//! Dense monthly time series per crime type.
//!
//! The axis is materialised first with a zero for every crime type, then the
//! observations are folded into it by period lookup. A period with no
//! incidents is therefore always present and zero, never missing.

use crate::filter::FilterCriteria;
use crate::reference;
use crate::types::{CrimeCounts, CrimeTypeId, IncidentRecord, Period, TimeSeriesPoint};
use crate::util::period_label;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Anything that can be placed on the time axis. Each accessor returns
/// `None` when the underlying field is missing; such observations are skipped.
pub trait Observation {
    fn year(&self) -> Option<i32>;
    fn month(&self) -> Option<u32>;
    fn crime_type(&self) -> Option<CrimeTypeId>;
    fn cases(&self) -> Option<u64>;
}

impl Observation for IncidentRecord {
    fn year(&self) -> Option<i32> {
        Some(self.year)
    }

    fn month(&self) -> Option<u32> {
        Some(self.month)
    }

    fn crime_type(&self) -> Option<CrimeTypeId> {
        Some(self.crime_type)
    }

    fn cases(&self) -> Option<u64> {
        Some(self.cases)
    }
}

/// Loosely-typed observation as a chart collaborator may hand it over
/// (e.g. decoded from JSON). Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawObservation {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub crime_type: Option<String>,
    pub cases: Option<u64>,
}

impl Observation for RawObservation {
    fn year(&self) -> Option<i32> {
        self.year
    }

    fn month(&self) -> Option<u32> {
        self.month
    }

    fn crime_type(&self) -> Option<CrimeTypeId> {
        self.crime_type.as_deref()?.parse().ok()
    }

    fn cases(&self) -> Option<u64> {
        self.cases
    }
}

/// The complete set of periods a chart must show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodAxis {
    periods: Vec<Period>,
}

impl PeriodAxis {
    /// Builds the axis for the active year / month filter:
    ///
    /// - year only: the 12 months of that year
    /// - month only: that month in each year of the three-year window
    /// - both: that single month
    /// - neither: 12 months for each year of the window
    ///
    /// A month outside 1–12 is treated as absent.
    #[must_use]
    pub fn for_filter(year: Option<i32>, month: Option<u32>, current_year: i32) -> Self {
        let years = match year {
            Some(y) => vec![y],
            None => reference::year_window(current_year),
        };
        let months: Vec<u32> = match month.filter(|m| (1..=12).contains(m)) {
            Some(m) => vec![m],
            None => (1..=12).collect(),
        };

        let mut periods: Vec<Period> = years
            .iter()
            .flat_map(|&y| months.iter().filter_map(move |&m| Period::new(y, m)))
            .collect();
        periods.sort_unstable();
        periods.dedup();
        Self { periods }
    }

    #[must_use]
    pub fn from_criteria(criteria: &FilterCriteria, current_year: i32) -> Self {
        Self::for_filter(criteria.year, criteria.month, current_year)
    }

    /// Periods in chronological order.
    #[must_use]
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Sums cases per crime type for every period on `axis`.
///
/// Observations with a missing field or an invalid month are skipped, and
/// observations falling outside the axis are ignored. Neither is an error.
pub fn build_time_series<O: Observation>(observations: &[O], axis: &PeriodAxis) -> Vec<TimeSeriesPoint> {
    let mut series: BTreeMap<Period, CrimeCounts> =
        axis.periods().iter().map(|&p| (p, CrimeCounts::zeroed())).collect();

    let mut skipped = 0usize;
    let mut off_axis = 0usize;
    for obs in observations {
        let (Some(year), Some(month), Some(crime_type), Some(cases)) =
            (obs.year(), obs.month(), obs.crime_type(), obs.cases())
        else {
            skipped += 1;
            continue;
        };
        let Some(period) = Period::new(year, month) else {
            skipped += 1;
            continue;
        };
        match series.get_mut(&period) {
            Some(counts) => counts.add(crime_type, cases),
            None => off_axis += 1,
        }
    }

    if skipped > 0 || off_axis > 0 {
        log::debug!(
            "Time series: skipped {} malformed and {} off-axis observations",
            skipped,
            off_axis
        );
    }

    series
        .into_iter()
        .map(|(period, counts)| TimeSeriesPoint {
            period,
            label: period_label(period),
            counts,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_records;
    use crate::generator::DatasetGenerator;
    use strum::IntoEnumIterator;

    #[test]
    fn axis_shapes() {
        assert_eq!(PeriodAxis::for_filter(None, None, 2026).len(), 36);
        assert_eq!(PeriodAxis::for_filter(Some(2025), None, 2026).len(), 12);
        assert_eq!(PeriodAxis::for_filter(None, Some(3), 2026).len(), 3);
        assert_eq!(PeriodAxis::for_filter(Some(2025), Some(3), 2026).len(), 1);
        assert_eq!(PeriodAxis::for_filter(None, Some(13), 2026).len(), 36);
    }

    #[test]
    fn axis_is_chronological_without_gaps() {
        let axis = PeriodAxis::for_filter(None, None, 2026);
        let first = axis.periods()[0];
        let last = axis.periods()[axis.len() - 1];
        assert_eq!(first, Period::new(2024, 1).unwrap());
        assert_eq!(last, Period::new(2026, 12).unwrap());
        assert!(axis.periods().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn march_only_over_three_years_starts_at_zero() {
        let axis = PeriodAxis::for_filter(None, Some(3), 2026);
        let points = build_time_series::<IncidentRecord>(&[], &axis);
        let keys: Vec<String> = points.iter().map(|p| p.period.to_string()).collect();
        assert_eq!(keys, vec!["2024-03", "2025-03", "2026-03"]);
        assert!(points.iter().all(|p| p.counts == CrimeCounts::zeroed()));
    }

    #[test]
    fn sums_are_preserved_per_crime_type() {
        let dataset = DatasetGenerator::new(2026).with_seed(4).generate();
        let criteria = FilterCriteria { month: Some(6), ..FilterCriteria::default() };
        let filtered = filter_records(dataset.records(), &criteria);
        let axis = PeriodAxis::from_criteria(&criteria, 2026);
        let points = build_time_series(&filtered, &axis);

        assert_eq!(points.len(), 3);
        for crime_type in CrimeTypeId::iter() {
            let expected: u64 = filtered
                .iter()
                .filter(|r| r.crime_type == crime_type)
                .map(|r| r.cases)
                .sum();
            let actual: u64 = points.iter().map(|p| p.counts.get(crime_type)).sum();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn malformed_and_off_axis_observations_are_skipped() {
        let axis = PeriodAxis::for_filter(Some(2025), None, 2026);
        let observations = vec![
            RawObservation {
                year: Some(2025),
                month: Some(2),
                crime_type: Some("furto".into()),
                cases: Some(4),
            },
            RawObservation { year: None, month: Some(2), crime_type: Some("furto".into()), cases: Some(9) },
            RawObservation { year: Some(2025), month: Some(14), crime_type: Some("furto".into()), cases: Some(9) },
            RawObservation { year: Some(2025), month: Some(2), crime_type: Some("arson".into()), cases: Some(9) },
            RawObservation { year: Some(2025), month: Some(2), crime_type: Some("furto".into()), cases: None },
            RawObservation { year: Some(2019), month: Some(2), crime_type: Some("furto".into()), cases: Some(9) },
        ];
        let points = build_time_series(&observations, &axis);
        assert_eq!(points.len(), 12);
        assert_eq!(points[1].label, "02/25");
        assert_eq!(points[1].counts.get(CrimeTypeId::Furto), 4);
        let total: u64 = points.iter().map(|p| p.counts.total()).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn raw_observations_decode_from_json() {
        let json = r#"[{"year":2025,"month":1,"crimeType":"roubo","cases":3},{"month":1}]"#;
        let observations: Vec<RawObservation> = serde_json::from_str(json).unwrap();
        let axis = PeriodAxis::for_filter(Some(2025), Some(1), 2026);
        let points = build_time_series(&observations, &axis);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].counts.get(CrimeTypeId::Roubo), 3);
    }
}
