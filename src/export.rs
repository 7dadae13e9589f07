use crate::error::{DashboardError, Result};
use crate::types::{ExportRow, IncidentRecord, Municipality};
use crate::util::round2;
use chrono::NaiveDate;
use csv::WriterBuilder;
use std::collections::HashMap;
use std::path::Path;

/// Localized header row, in column order.
pub const EXPORT_HEADERS: [&str; 7] = [
    "Município",
    "Ano",
    "Mês",
    "Tipo de Crime",
    "Número de Casos",
    "População",
    "Taxa por 100k hab",
];

/// Projects each record onto a flat export row. No aggregation happens here.
///
/// # Errors
///
/// Returns [`DashboardError::UnknownMunicipality`] when a record's
/// municipality cannot be named.
pub fn export_rows(records: &[IncidentRecord], municipalities: &[Municipality]) -> Result<Vec<ExportRow>> {
    let names: HashMap<u32, &str> = municipalities.iter().map(|m| (m.id, m.name)).collect();
    records
        .iter()
        .map(|r| {
            let name = names
                .get(&r.municipality_id)
                .ok_or_else(|| DashboardError::UnknownMunicipality {
                    municipality_id: r.municipality_id,
                    record_id: r.id.clone(),
                })?;
            Ok(ExportRow {
                municipality: (*name).to_string(),
                year: r.year,
                month: r.month,
                crime_type: r.crime_type.display_name().to_string(),
                cases: r.cases,
                population: r.population,
                rate: format!("{:.2}", round2(r.rate)),
            })
        })
        .collect()
}

/// Renders the export as CSV text. The header row is always written, even for
/// an empty subset; fields containing delimiters, quotes or newlines are
/// quoted.
///
/// # Errors
///
/// Fails on an unknown municipality or a serialization error.
pub fn export_csv(records: &[IncidentRecord], municipalities: &[Municipality]) -> Result<String> {
    let rows = export_rows(records, municipalities)?;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    wtr.write_record(EXPORT_HEADERS)?;
    for row in &rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| DashboardError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Writes the export to `path`.
///
/// # Errors
///
/// Fails like [`export_csv`], or when the file cannot be written.
pub fn write_export(
    path: impl AsRef<Path>,
    records: &[IncidentRecord],
    municipalities: &[Municipality],
) -> Result<()> {
    let csv = export_csv(records, municipalities)?;
    std::fs::write(path.as_ref(), csv)?;
    log::info!("Exported {} records to {}", records.len(), path.as_ref().display());
    Ok(())
}

/// `violencia_pe_YYYY-MM-DD.csv`
#[must_use]
pub fn default_export_filename(date: NaiveDate) -> String {
    format!("violencia_pe_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CrimeTypeId;
    use csv::ReaderBuilder;

    fn towns() -> [Municipality; 2] {
        [
            Municipality { id: 1, name: "Recife", population: 1_653_461, lat: 0.0, lng: 0.0 },
            Municipality { id: 2, name: "Vila \"Nova\", Norte", population: 3000, lat: 0.0, lng: 0.0 },
        ]
    }

    #[test]
    fn header_and_rows() {
        let towns = towns();
        let records = vec![IncidentRecord::new(&towns[0], 2025, 3, CrimeTypeId::LesaoCorporal, 120)];
        let csv = export_csv(&records, &towns).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Município,Ano,Mês,Tipo de Crime,Número de Casos,População,Taxa por 100k hab")
        );
        assert_eq!(lines.next(), Some("Recife,2025,3,Lesão Corporal,120,1653461,7.26"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn rate_ties_round_half_up() {
        let town = Municipality { id: 1, name: "Vila", population: 800_000, lat: 0.0, lng: 0.0 };
        let records = vec![IncidentRecord::new(&town, 2025, 1, CrimeTypeId::Homicidio, 1)];
        let rows = export_rows(&records, &[town]).unwrap();
        assert_eq!(rows[0].rate, "0.13");
    }

    #[test]
    fn empty_subset_still_has_header() {
        let csv = export_csv(&[], &towns()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn quoted_names_round_trip() {
        let towns = towns();
        let records = vec![
            IncidentRecord::new(&towns[1], 2024, 12, CrimeTypeId::Homicidio, 1),
            IncidentRecord::new(&towns[0], 2026, 1, CrimeTypeId::Furto, 0),
        ];
        let csv = export_csv(&records, &towns).unwrap();
        assert!(csv.contains("\"Vila \"\"Nova\"\", Norte\""));

        let mut rdr = ReaderBuilder::new().from_reader(csv.as_bytes());
        let parsed: Vec<ExportRow> = rdr.deserialize().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(parsed, export_rows(&records, &towns).unwrap());
        assert_eq!(parsed[0].municipality, "Vila \"Nova\", Norte");
        assert_eq!(parsed[0].rate, "33.33");
        assert_eq!(parsed[1].rate, "0.00");
    }

    #[test]
    fn unknown_municipality_fails_loudly() {
        let stranger = Municipality { id: 9, name: "X", population: 1, lat: 0.0, lng: 0.0 };
        let records = vec![IncidentRecord::new(&stranger, 2025, 1, CrimeTypeId::Roubo, 1)];
        assert!(matches!(
            export_csv(&records, &towns()),
            Err(DashboardError::UnknownMunicipality { municipality_id: 9, .. })
        ));
    }

    #[test]
    fn filename_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(default_export_filename(date), "violencia_pe_2026-10-19.csv");
    }
}
