//! Per-municipality table: subtotals by crime type, rate, search and ranking.

use crate::error::{DashboardError, Result};
use crate::types::{CrimeCounts, CrimeTypeId, IncidentRecord, Municipality, MunicipalityRow};
use crate::util::{rate_per_100k, round2};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Population,
    TotalCases,
    Rate,
    Crime(CrimeTypeId),
}

impl FromStr for SortKey {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "name" => Ok(Self::Name),
            "population" => Ok(Self::Population),
            "totalCases" => Ok(Self::TotalCases),
            "rate" => Ok(Self::Rate),
            other => other
                .parse::<CrimeTypeId>()
                .map(Self::Crime)
                .map_err(|_| DashboardError::UnknownSortKey(other.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Population => f.write_str("population"),
            Self::TotalCases => f.write_str("totalCases"),
            Self::Rate => f.write_str("rate"),
            Self::Crime(id) => f.write_str(id.as_ref()),
        }
    }
}

impl Serialize for SortKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(DashboardError::UnknownSortDirection(s.to_string())),
        }
    }
}

/// Active sort column and direction. Defaults to total cases, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::TotalCases,
            direction: SortDirection::Desc,
        }
    }
}

impl SortConfig {
    /// Header click: the active key flips direction, a new key starts
    /// descending.
    #[must_use]
    pub fn toggle(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Desc {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        Self { key, direction }
    }
}

/// Search and sort state owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TableRequest {
    pub search: String,
    pub sort: SortConfig,
}

/// Ranked table plus the "showing N of M" footer numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MunicipalityTable {
    pub rows: Vec<MunicipalityRow>,
    pub total_municipalities: usize,
}

/// One row per municipality, in reference order, zero-filled when a
/// municipality has no records.
///
/// # Errors
///
/// Returns [`DashboardError::UnknownMunicipality`] if a record references an
/// id that is not in `municipalities`.
pub fn aggregate_municipalities(
    records: &[IncidentRecord],
    municipalities: &[Municipality],
) -> Result<Vec<MunicipalityRow>> {
    let index: HashMap<u32, usize> = municipalities.iter().enumerate().map(|(i, m)| (m.id, i)).collect();
    let mut counts = vec![CrimeCounts::zeroed(); municipalities.len()];

    for r in records {
        let Some(&idx) = index.get(&r.municipality_id) else {
            log::warn!("Record {} references unknown municipality {}", r.id, r.municipality_id);
            return Err(DashboardError::UnknownMunicipality {
                municipality_id: r.municipality_id,
                record_id: r.id.clone(),
            });
        };
        counts[idx].add(r.crime_type, r.cases);
    }

    Ok(municipalities
        .iter()
        .zip(counts)
        .map(|(m, by_crime_type)| {
            let total_cases = by_crime_type.total();
            MunicipalityRow {
                id: m.id,
                name: m.name.to_string(),
                population: m.population,
                lat: m.lat,
                lng: m.lng,
                by_crime_type,
                total_cases,
                rate: round2(rate_per_100k(total_cases, m.population)),
            }
        })
        .collect())
}

/// Keeps rows whose name contains `term`, ignoring case. An empty term keeps
/// every row.
pub fn search_rows(rows: Vec<MunicipalityRow>, term: &str) -> Vec<MunicipalityRow> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| row.name.to_lowercase().contains(&needle))
        .collect()
}

enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
}

fn sort_value(row: &MunicipalityRow, key: SortKey) -> SortValue<'_> {
    match key {
        SortKey::Name => SortValue::Text(&row.name),
        SortKey::Population => SortValue::Number(row.population as f64),
        SortKey::TotalCases => SortValue::Number(row.total_cases as f64),
        SortKey::Rate => SortValue::Number(row.rate),
        SortKey::Crime(id) => SortValue::Number(row.by_crime_type.get(id) as f64),
    }
}

fn compare(a: &SortValue<'_>, b: &SortValue<'_>) -> Ordering {
    match (a, b) {
        (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
        (SortValue::Number(a), SortValue::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        // Both sides always come from the same key.
        _ => Ordering::Equal,
    }
}

pub fn sort_rows(rows: &mut [MunicipalityRow], sort: SortConfig) {
    rows.sort_by(|a, b| {
        let ord = compare(&sort_value(a, sort.key), &sort_value(b, sort.key));
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

/// Aggregate, search, then sort.
///
/// # Errors
///
/// Propagates [`aggregate_municipalities`] errors.
pub fn build_table(
    records: &[IncidentRecord],
    municipalities: &[Municipality],
    request: &TableRequest,
) -> Result<MunicipalityTable> {
    let rows = aggregate_municipalities(records, municipalities)?;
    let mut rows = search_rows(rows, &request.search);
    sort_rows(&mut rows, request.sort);
    Ok(MunicipalityTable {
        rows,
        total_municipalities: municipalities.len(),
    })
}
