//! Aggregation engine behind the Pernambuco crime-incidence dashboard.
//!
//! A synthetic incident grid is generated once ([`generator`]), narrowed by
//! the user's filters ([`filter`]), and each dashboard panel derives its own
//! view from the filtered records: KPI cards ([`kpi`]), the municipality
//! ranking ([`municipality`]), the dense monthly chart ([`timeseries`]), the
//! map markers ([`map`]) and the CSV export ([`export`]). All aggregation
//! functions are pure.

pub mod dashboard;
pub mod error;
pub mod export;
pub mod filter;
pub mod generator;
pub mod kpi;
pub mod map;
pub mod municipality;
pub mod output;
pub mod reference;
pub mod timeseries;
pub mod types;
pub mod util;

pub use error::{DashboardError, Result};
pub use filter::{filter_records, FilterCriteria, RawFilter, Selection};
pub use generator::{Dataset, DatasetGenerator};
pub use types::{CrimeCounts, CrimeType, CrimeTypeId, IncidentRecord, Municipality, Period};
