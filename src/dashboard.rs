//! One-call evaluation of every dashboard panel for a single request.
//!
//! Each panel reads only the filtered record set; nothing is cached between
//! calls.

use crate::error::Result;
use crate::filter::{filter_records, FilterCriteria};
use crate::kpi::calculate_kpis;
use crate::map::{map_bounds, map_markers, MapBounds, MapMarker};
use crate::municipality::{build_table, MunicipalityTable, SortConfig, TableRequest};
use crate::timeseries::{build_time_series, PeriodAxis};
use crate::types::{IncidentRecord, KpiSummary, Municipality, TimeSeriesPoint};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub criteria: FilterCriteria,
    pub sort: SortConfig,
    pub search: String,
    pub record_count: usize,
    pub kpis: KpiSummary,
    pub table: MunicipalityTable,
    pub time_series: Vec<TimeSeriesPoint>,
    pub markers: Vec<MapMarker>,
    pub bounds: Option<MapBounds>,
}

/// Filters `records` once and feeds the result to every aggregator.
///
/// # Errors
///
/// Fails when a record references a municipality missing from
/// `municipalities`.
pub fn snapshot(
    records: &[IncidentRecord],
    municipalities: &[Municipality],
    criteria: &FilterCriteria,
    table: &TableRequest,
    current_year: i32,
) -> Result<DashboardSnapshot> {
    let filtered = filter_records(records, criteria);
    let axis = PeriodAxis::from_criteria(criteria, current_year);

    Ok(DashboardSnapshot {
        criteria: *criteria,
        sort: table.sort,
        search: table.search.clone(),
        record_count: filtered.len(),
        kpis: calculate_kpis(&filtered, municipalities),
        table: build_table(&filtered, municipalities, table)?,
        time_series: build_time_series(&filtered, &axis),
        markers: map_markers(&filtered, municipalities, criteria.crime_type)?,
        bounds: map_bounds(municipalities),
    })
}
