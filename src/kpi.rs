use crate::reference;
use crate::types::{CrimeCounts, CrimeTypeId, IncidentRecord, KpiSummary, Municipality};
use crate::util::{rate_per_100k, round2};

/// Reduces a record subset to the KPI cards.
///
/// The rate denominator is the population of the whole `municipalities`
/// reference list, not of the municipalities present in `records`, so it is
/// never zero for a real reference list.
pub fn calculate_kpis(records: &[IncidentRecord], municipalities: &[Municipality]) -> KpiSummary {
    let mut by_crime_type = CrimeCounts::zeroed();
    for r in records {
        by_crime_type.add(r.crime_type, r.cases);
    }
    let total_cases = by_crime_type.total();
    let population = reference::total_population(municipalities);

    KpiSummary {
        total_cases,
        homicides: by_crime_type.get(CrimeTypeId::Homicidio),
        thefts: by_crime_type.get(CrimeTypeId::Furto),
        rapes: by_crime_type.get(CrimeTypeId::Estupro),
        by_crime_type,
        rate_per_hundred_thousand: round2(rate_per_100k(total_cases, population)),
    }
}
