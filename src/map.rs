//! Marker data for the incidence map.

use crate::error::{DashboardError, Result};
use crate::filter::Selection;
use crate::types::{CrimeTypeId, IncidentRecord, Municipality};
use crate::util::{rate_per_100k, round2};
use serde::Serialize;
use std::collections::HashMap;

/// Smallest marker radius, in pixels.
pub const MIN_RADIUS: f64 = 5.0;
/// Radius of the marker with the highest rate.
pub const MAX_RADIUS: f64 = 25.0;

/// Colour bucket of a marker, relative to the highest rate on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IntensityLevel {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl IntensityLevel {
    #[must_use]
    pub fn from_intensity(intensity: f64) -> Self {
        if intensity > 0.8 {
            Self::VeryHigh
        } else if intensity > 0.6 {
            Self::High
        } else if intensity > 0.4 {
            Self::Medium
        } else if intensity > 0.2 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    /// Legend label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryHigh => "Muito Alto",
            Self::High => "Alto",
            Self::Medium => "Médio",
            Self::Low => "Baixo",
            Self::VeryLow => "Muito Baixo",
        }
    }

    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::VeryHigh => "#dc2626",
            Self::High => "#ef4444",
            Self::Medium => "#f97316",
            Self::Low => "#eab308",
            Self::VeryLow => "#22c55e",
        }
    }

    /// Legend order, highest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::VeryHigh, Self::High, Self::Medium, Self::Low, Self::VeryLow]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub municipality_id: u32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub population: u64,
    pub total_cases: u64,
    pub rate: f64,
    /// `rate / max rate`, in [0, 1].
    pub intensity: f64,
    pub level: IntensityLevel,
    pub color: &'static str,
    pub radius: f64,
}

/// Lat/lng extent the map should be fitted to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// One marker per municipality. Only records of `crime_type` are counted
/// (all records for [`Selection::All`]).
///
/// When every rate is zero all markers get intensity 0 rather than dividing
/// by zero.
///
/// # Errors
///
/// Returns [`DashboardError::UnknownMunicipality`] if a record references an
/// id that is not in `municipalities`.
pub fn map_markers(
    records: &[IncidentRecord],
    municipalities: &[Municipality],
    crime_type: Selection<CrimeTypeId>,
) -> Result<Vec<MapMarker>> {
    let mut totals: HashMap<u32, u64> = municipalities.iter().map(|m| (m.id, 0)).collect();
    for r in records.iter().filter(|r| crime_type.matches(&r.crime_type)) {
        let Some(total) = totals.get_mut(&r.municipality_id) else {
            return Err(DashboardError::UnknownMunicipality {
                municipality_id: r.municipality_id,
                record_id: r.id.clone(),
            });
        };
        *total += r.cases;
    }

    let rated: Vec<(&Municipality, u64, f64)> = municipalities
        .iter()
        .map(|m| {
            let total = totals.get(&m.id).copied().unwrap_or(0);
            (m, total, round2(rate_per_100k(total, m.population)))
        })
        .collect();
    let max_rate = rated.iter().map(|(_, _, rate)| *rate).fold(0.0_f64, f64::max);

    Ok(rated
        .into_iter()
        .map(|(m, total_cases, rate)| {
            let intensity = if max_rate > 0.0 { rate / max_rate } else { 0.0 };
            let level = IntensityLevel::from_intensity(intensity);
            MapMarker {
                municipality_id: m.id,
                name: m.name.to_string(),
                lat: m.lat,
                lng: m.lng,
                population: m.population,
                total_cases,
                rate,
                intensity,
                level,
                color: level.color(),
                radius: (intensity * MAX_RADIUS).max(MIN_RADIUS),
            }
        })
        .collect())
}

/// Bounding box of every municipality, or `None` for an empty list.
#[must_use]
pub fn map_bounds(municipalities: &[Municipality]) -> Option<MapBounds> {
    let first = municipalities.first()?;
    let init = MapBounds {
        south: first.lat,
        west: first.lng,
        north: first.lat,
        east: first.lng,
    };
    Some(municipalities.iter().fold(init, |b, m| MapBounds {
        south: b.south.min(m.lat),
        west: b.west.min(m.lng),
        north: b.north.max(m.lat),
        east: b.east.max(m.lng),
    }))
}
