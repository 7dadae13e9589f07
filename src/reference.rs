//! Static reference data: municipalities, crime types and month labels.
//!
//! These lists are read-only for the whole process lifetime. The crime type
//! list follows the declaration order of [`CrimeTypeId`].
use crate::types::{CrimeType, CrimeTypeId, Municipality};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use strum::IntoEnumIterator;

pub static MUNICIPALITIES: &[Municipality] = &[
    Municipality { id: 1, name: "Recife", population: 1_653_461, lat: -8.0476, lng: -34.8770 },
    Municipality { id: 2, name: "Jaboatão dos Guararapes", population: 706_867, lat: -8.1130, lng: -35.0151 },
    Municipality { id: 3, name: "Olinda", population: 393_115, lat: -8.0089, lng: -34.8553 },
    Municipality { id: 4, name: "Caruaru", population: 367_217, lat: -8.2766, lng: -35.9819 },
    Municipality { id: 5, name: "Petrolina", population: 354_317, lat: -9.3891, lng: -40.5030 },
    Municipality { id: 6, name: "Paulista", population: 329_117, lat: -7.9407, lng: -34.8728 },
    Municipality { id: 7, name: "Cabo de Santo Agostinho", population: 208_758, lat: -8.2112, lng: -35.0349 },
    Municipality { id: 8, name: "Camaragibe", population: 162_551, lat: -8.0207, lng: -35.0371 },
    Municipality { id: 9, name: "Garanhuns", population: 140_577, lat: -8.8920, lng: -36.4955 },
    Municipality { id: 10, name: "Vitória de Santo Antão", population: 140_389, lat: -8.1186, lng: -35.2936 },
    Municipality { id: 11, name: "Igarassu", population: 117_019, lat: -7.8347, lng: -34.9058 },
    Municipality { id: 12, name: "São Lourenço da Mata", population: 114_079, lat: -8.0022, lng: -35.0198 },
    Municipality { id: 13, name: "Santa Cruz do Capibaribe", population: 108_251, lat: -7.9571, lng: -36.2071 },
    Municipality { id: 14, name: "Abreu e Lima", population: 105_050, lat: -7.9064, lng: -34.8967 },
    Municipality { id: 15, name: "Ipojuca", population: 102_492, lat: -8.3996, lng: -35.0623 },
];

/// pt-BR month names, January first.
pub static MONTH_NAMES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];

pub const ALL_MONTHS_LABEL: &str = "Todos os meses";
pub const ALL_YEARS_LABEL: &str = "Todos os anos";

/// Number of years covered by the dataset and the default chart window.
pub const YEAR_WINDOW: i32 = 3;

static TOTAL_POPULATION: Lazy<u64> = Lazy::new(|| total_population(MUNICIPALITIES));

static MUNICIPALITY_INDEX: Lazy<HashMap<u32, &'static Municipality>> =
    Lazy::new(|| MUNICIPALITIES.iter().map(|m| (m.id, m)).collect());

/// All crime types in display order.
#[must_use]
pub fn crime_types() -> Vec<CrimeType> {
    CrimeTypeId::iter().map(CrimeType::from).collect()
}

#[must_use]
pub fn municipality(id: u32) -> Option<&'static Municipality> {
    MUNICIPALITY_INDEX.get(&id).copied()
}

/// Sum of population over the static municipality list.
#[must_use]
pub fn static_total_population() -> u64 {
    *TOTAL_POPULATION
}

#[must_use]
pub fn total_population(municipalities: &[Municipality]) -> u64 {
    municipalities.iter().map(|m| m.population).sum()
}

#[must_use]
pub fn month_label(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(idx).copied()
}

/// The current year and the two preceding ones, oldest first.
#[must_use]
pub fn year_window(current_year: i32) -> Vec<i32> {
    ((current_year - YEAR_WINDOW + 1)..=current_year).collect()
}

/// Caption for the active year/month selection, e.g. `2025 · Março` or
/// `Todos os anos · Todos os meses`.
#[must_use]
pub fn window_caption(year: Option<i32>, month: Option<u32>) -> String {
    let year = year.map_or_else(|| ALL_YEARS_LABEL.to_string(), |y| y.to_string());
    let month = month.and_then(month_label).unwrap_or(ALL_MONTHS_LABEL);
    format!("{year} · {month}")
}
