use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tabled::Tabled;

/// Crime categories, in the order every aggregated output uses for its
/// columns and series.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CrimeTypeId {
    Homicidio,
    Furto,
    Roubo,
    Estupro,
    LesaoCorporal,
}

impl CrimeTypeId {
    /// Display name shown in the chart legend, table header and export.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Homicidio => "Homicídio",
            Self::Furto => "Furto",
            Self::Roubo => "Roubo",
            Self::Estupro => "Estupro",
            Self::LesaoCorporal => "Lesão Corporal",
        }
    }

    /// Series colour used by the chart.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Homicidio => "#dc2626",
            Self::Furto => "#ea580c",
            Self::Roubo => "#d97706",
            Self::Estupro => "#7c2d12",
            Self::LesaoCorporal => "#92400e",
        }
    }
}

/// Reference entry for a crime category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrimeType {
    pub id: CrimeTypeId,
    pub name: &'static str,
    pub color: &'static str,
}

impl From<CrimeTypeId> for CrimeType {
    fn from(id: CrimeTypeId) -> Self {
        Self {
            id,
            name: id.display_name(),
            color: id.color(),
        }
    }
}

/// Static reference data for one municipality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Municipality {
    pub id: u32,
    pub name: &'static str,
    pub population: u64,
    pub lat: f64,
    pub lng: f64,
}

/// One observation: case count for a municipality, year, month and crime type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    pub id: String,
    pub municipality_id: u32,
    pub year: i32,
    pub month: u32,
    pub crime_type: CrimeTypeId,
    pub cases: u64,
    /// Copied from the municipality when the record was generated.
    pub population: u64,
    /// Informational only; aggregators recompute rates from totals.
    pub rate: f64,
}

impl IncidentRecord {
    #[must_use]
    pub fn new(
        municipality: &Municipality,
        year: i32,
        month: u32,
        crime_type: CrimeTypeId,
        cases: u64,
    ) -> Self {
        Self {
            id: format!("{}-{}-{}-{}", municipality.id, year, month, crime_type),
            municipality_id: municipality.id,
            year,
            month,
            crime_type,
            cases,
            population: municipality.population,
            rate: crate::util::rate_per_100k(cases, municipality.population),
        }
    }
}

/// Case counts keyed by crime type. Every crime type is always present, so a
/// missing key and a zero are indistinguishable to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CrimeCounts(BTreeMap<CrimeTypeId, u64>);

impl CrimeCounts {
    #[must_use]
    pub fn zeroed() -> Self {
        Self(CrimeTypeId::iter().map(|id| (id, 0)).collect())
    }

    pub fn add(&mut self, crime_type: CrimeTypeId, cases: u64) {
        *self.0.entry(crime_type).or_insert(0) += cases;
    }

    #[must_use]
    pub fn get(&self, crime_type: CrimeTypeId) -> u64 {
        self.0.get(&crime_type).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Iterates in crime-type order.
    pub fn iter(&self) -> impl Iterator<Item = (CrimeTypeId, u64)> + '_ {
        self.0.iter().map(|(id, cases)| (*id, *cases))
    }
}

impl Default for CrimeCounts {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Scalar indicators shown on the KPI cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub total_cases: u64,
    pub homicides: u64,
    pub thefts: u64,
    pub rapes: u64,
    pub by_crime_type: CrimeCounts,
    pub rate_per_hundred_thousand: f64,
}

/// One row of the per-municipality table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MunicipalityRow {
    pub id: u32,
    pub name: String,
    pub population: u64,
    pub lat: f64,
    pub lng: f64,
    #[serde(flatten)]
    pub by_crime_type: CrimeCounts,
    pub total_cases: u64,
    pub rate: f64,
}

/// A calendar month on the time-series axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// Returns `None` for months outside 1–12.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One point of the dense time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeriesPoint {
    pub period: Period,
    /// Short `MM/YY` axis label.
    pub label: String,
    #[serde(flatten)]
    pub counts: CrimeCounts,
}

/// Flat export row. Header names are the localized column titles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct ExportRow {
    #[serde(rename = "Município")]
    #[tabled(rename = "Município")]
    pub municipality: String,
    #[serde(rename = "Ano")]
    #[tabled(rename = "Ano")]
    pub year: i32,
    #[serde(rename = "Mês")]
    #[tabled(rename = "Mês")]
    pub month: u32,
    #[serde(rename = "Tipo de Crime")]
    #[tabled(rename = "Tipo de Crime")]
    pub crime_type: String,
    #[serde(rename = "Número de Casos")]
    #[tabled(rename = "Número de Casos")]
    pub cases: u64,
    #[serde(rename = "População")]
    #[tabled(rename = "População")]
    pub population: u64,
    #[serde(rename = "Taxa por 100k hab")]
    #[tabled(rename = "Taxa por 100k hab")]
    pub rate: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crime_type_ids_use_snake_case() {
        assert_eq!(CrimeTypeId::LesaoCorporal.to_string(), "lesao_corporal");
        assert_eq!(
            "homicidio".parse::<CrimeTypeId>().unwrap(),
            CrimeTypeId::Homicidio
        );
        assert!("arson".parse::<CrimeTypeId>().is_err());
    }

    #[test]
    fn crime_counts_start_zeroed_in_order() {
        let counts = CrimeCounts::zeroed();
        let ids: Vec<CrimeTypeId> = counts.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, CrimeTypeId::iter().collect::<Vec<_>>());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn period_key_is_zero_padded() {
        let p = Period::new(2024, 3).unwrap();
        assert_eq!(p.to_string(), "2024-03");
        assert!(Period::new(2024, 0).is_none());
        assert!(Period::new(2024, 13).is_none());
    }

    #[test]
    fn record_id_is_composite() {
        let m = Municipality {
            id: 7,
            name: "Cabo de Santo Agostinho",
            population: 208_758,
            lat: -8.2112,
            lng: -35.0349,
        };
        let r = IncidentRecord::new(&m, 2025, 4, CrimeTypeId::Roubo, 12);
        assert_eq!(r.id, "7-2025-4-roubo");
        assert_eq!(r.population, 208_758);
    }
}
