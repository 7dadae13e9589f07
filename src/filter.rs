//! Narrowing the record set by year, month, crime type and municipality.

use crate::types::{CrimeTypeId, IncidentRecord};
use crate::util::{parse_i32_safe, parse_u32_safe};
use serde::{Deserialize, Serialize};

/// Either every value of a dimension, or one specific value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Selection<T> {
    All,
    Specific(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Selection<T> {
    #[must_use]
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Specific(wanted) => wanted == value,
        }
    }
}

/// Filter criteria as the UI layer sends them: plain text, `"all"` or empty
/// meaning "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFilter {
    pub year: String,
    pub month: String,
    pub crime_type: String,
    pub municipality: String,
}

/// Typed filter criteria. `None` / [`Selection::All`] impose no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub year: Option<i32>,
    /// Always within 1–12 when present.
    pub month: Option<u32>,
    pub crime_type: Selection<CrimeTypeId>,
    pub municipality: Selection<u32>,
}

impl FilterCriteria {
    /// Parses UI text leniently. Empty, `"all"` or unparseable fields become
    /// "no constraint"; this never fails.
    #[must_use]
    pub fn from_raw(raw: &RawFilter) -> Self {
        let month = parse_u32_safe(Some(raw.month.as_str())).filter(|m| (1..=12).contains(m));
        if month.is_none() && !raw.month.trim().is_empty() {
            log::debug!("Ignoring month filter {:?}", raw.month);
        }

        Self {
            year: parse_i32_safe(Some(raw.year.as_str())),
            month,
            crime_type: parse_selection(&raw.crime_type, |s| s.parse::<CrimeTypeId>().ok()),
            municipality: parse_selection(&raw.municipality, |s| parse_u32_safe(Some(s))),
        }
    }

    #[must_use]
    pub fn matches(&self, record: &IncidentRecord) -> bool {
        if self.year.is_some_and(|y| y != record.year) {
            return false;
        }
        if self.month.is_some_and(|m| m != record.month) {
            return false;
        }
        self.crime_type.matches(&record.crime_type) && self.municipality.matches(&record.municipality_id)
    }
}

fn parse_selection<T>(text: &str, parse: impl Fn(&str) -> Option<T>) -> Selection<T> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("all") {
        return Selection::All;
    }
    match parse(text) {
        Some(value) => Selection::Specific(value),
        None => {
            log::debug!("Ignoring unparseable selection {:?}", text);
            Selection::All
        }
    }
}

/// Returns the records matching every specified dimension, in input order.
pub fn filter_records(records: &[IncidentRecord], criteria: &FilterCriteria) -> Vec<IncidentRecord> {
    let filtered: Vec<IncidentRecord> = records.iter().filter(|r| criteria.matches(r)).cloned().collect();
    log::debug!("Filter {:?} kept {} of {} records", criteria, filtered.len(), records.len());
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::DatasetGenerator;

    fn raw(year: &str, month: &str, crime_type: &str, municipality: &str) -> RawFilter {
        RawFilter {
            year: year.to_string(),
            month: month.to_string(),
            crime_type: crime_type.to_string(),
            municipality: municipality.to_string(),
        }
    }

    #[test]
    fn parses_ui_text() {
        let c = FilterCriteria::from_raw(&raw("2025", "3", "furto", "4"));
        assert_eq!(c.year, Some(2025));
        assert_eq!(c.month, Some(3));
        assert_eq!(c.crime_type, Selection::Specific(CrimeTypeId::Furto));
        assert_eq!(c.municipality, Selection::Specific(4));
    }

    #[test]
    fn bad_text_means_no_constraint() {
        let c = FilterCriteria::from_raw(&raw("twenty", "13", "arson", "x"));
        assert_eq!(c, FilterCriteria::default());

        let c = FilterCriteria::from_raw(&raw("", " ", "all", "ALL"));
        assert_eq!(c, FilterCriteria::default());
    }

    #[test]
    fn empty_criteria_keeps_everything_in_order() {
        let dataset = DatasetGenerator::new(2026).with_seed(5).generate();
        let out = filter_records(dataset.records(), &FilterCriteria::default());
        assert_eq!(out, dataset.records());
    }

    #[test]
    fn membership_matches_every_dimension() {
        let dataset = DatasetGenerator::new(2026).with_seed(5).generate();
        let criteria = FilterCriteria::from_raw(&raw("2025", "", "roubo", "1"));
        let out = filter_records(dataset.records(), &criteria);

        assert_eq!(out.len(), 12);
        for r in dataset.records() {
            let expected = r.year == 2025 && r.crime_type == CrimeTypeId::Roubo && r.municipality_id == 1;
            assert_eq!(out.contains(r), expected);
        }
    }

    #[test]
    fn input_is_not_mutated() {
        let dataset = DatasetGenerator::new(2026).with_seed(5).generate();
        let before = dataset.records().to_vec();
        let criteria = FilterCriteria {
            month: Some(2),
            ..FilterCriteria::default()
        };
        let _ = filter_records(dataset.records(), &criteria);
        assert_eq!(before, dataset.records());
    }
}
