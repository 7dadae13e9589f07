use crate::error::Result;
use crate::map::{IntensityLevel, MapMarker};
use crate::types::{CrimeTypeId, KpiSummary, MunicipalityRow, TimeSeriesPoint};
use crate::util::{format_int, format_number, format_rate};
use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::builder::Builder;
use tabled::{settings::Style, Table, Tabled};

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Markdown preview of the first `max_rows` rows of any `Tabled` slice.
pub fn render_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn render_kpis(kpis: &KpiSummary) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Indicador", "Valor"]);
    builder.push_record(["Total de Ocorrências".to_string(), format_int(kpis.total_cases)]);
    builder.push_record(["Homicídios".to_string(), format_int(kpis.homicides)]);
    builder.push_record(["Furtos".to_string(), format_int(kpis.thefts)]);
    builder.push_record(["Estupros".to_string(), format_int(kpis.rapes)]);
    builder.push_record([
        "Taxa por 100k hab".to_string(),
        format_number(kpis.rate_per_hundred_thousand, 2),
    ]);
    builder.build().with(Style::markdown()).to_string()
}

/// The municipality table has one column per crime type, so it is built
/// row by row instead of through `#[derive(Tabled)]`.
pub fn render_municipality_rows(rows: &[MunicipalityRow], max_rows: usize) -> String {
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    let mut builder = Builder::default();
    let mut header = vec![
        "Município".to_string(),
        "População".to_string(),
        "Total".to_string(),
        "Taxa/100k".to_string(),
    ];
    header.extend(CrimeTypeId::iter().map(|c| c.display_name().to_string()));
    builder.push_record(header);

    for row in rows.iter().take(max_rows) {
        let mut record = vec![
            row.name.clone(),
            format_int(row.population),
            row.total_cases.to_string(),
            format!("{:.2}", row.rate),
        ];
        record.extend(row.by_crime_type.iter().map(|(_, n)| n.to_string()));
        builder.push_record(record);
    }
    builder.build().with(Style::markdown()).to_string()
}

pub fn render_time_series(points: &[TimeSeriesPoint]) -> String {
    let mut builder = Builder::default();
    let mut header = vec!["Período".to_string()];
    header.extend(CrimeTypeId::iter().map(|c| c.display_name().to_string()));
    builder.push_record(header);

    for point in points {
        let mut record = vec![point.label.clone()];
        record.extend(point.counts.iter().map(|(_, n)| n.to_string()));
        builder.push_record(record);
    }
    builder.build().with(Style::markdown()).to_string()
}

pub fn render_markers(markers: &[MapMarker]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Município", "Casos", "Taxa/100k", "Intensidade", "Raio"]);
    for m in markers {
        builder.push_record([
            m.name.clone(),
            m.total_cases.to_string(),
            format_rate(m.rate),
            m.level.label().to_string(),
            format!("{:.1}", m.radius),
        ]);
    }
    let legend: Vec<String> = IntensityLevel::all()
        .iter()
        .map(|level| format!("{} {}", level.color(), level.label()))
        .collect();
    format!(
        "{}\n\nLegenda: {}",
        builder.build().with(Style::markdown()),
        legend.join(" | ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kpi::calculate_kpis;
    use crate::reference::MUNICIPALITIES;
    use crate::timeseries::{build_time_series, PeriodAxis};
    use crate::types::IncidentRecord;

    #[test]
    fn kpi_table_uses_pt_br_grouping() {
        let records = vec![IncidentRecord::new(&MUNICIPALITIES[0], 2025, 1, CrimeTypeId::Furto, 1234)];
        let out = render_kpis(&calculate_kpis(&records, MUNICIPALITIES));
        assert!(out.contains("1.234"));
        assert!(out.contains("Taxa por 100k hab"));
    }

    #[test]
    fn time_series_table_has_row_per_period() {
        let axis = PeriodAxis::for_filter(Some(2025), None, 2026);
        let points = build_time_series::<IncidentRecord>(&[], &axis);
        let out = render_time_series(&points);
        // header + separator + 12 periods
        assert_eq!(out.lines().count(), 14);
        assert!(out.contains("12/25"));
    }

    #[test]
    fn marker_table_ends_with_legend() {
        let markers = crate::map::map_markers(&[], MUNICIPALITIES, crate::filter::Selection::All).unwrap();
        let out = render_markers(&markers);
        let legend = out.lines().last().unwrap();
        assert_eq!(
            legend,
            "Legenda: #dc2626 Muito Alto | #ef4444 Alto | #f97316 Médio | #eab308 Baixo | #22c55e Muito Baixo"
        );
        assert!(out.contains("Recife"));
    }

    #[test]
    fn empty_rows_render_placeholder() {
        assert_eq!(render_municipality_rows(&[], 5), "(no rows)");
    }
}
